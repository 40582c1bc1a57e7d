//! Storefront endpoints of the backend API.

use chickyen_core::http::{ApiError, RestClient};
use chickyen_core::{Customer, CustomerDetails, Email, Product};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde::de::IgnoredAny;
use tracing::instrument;

use crate::config::StorefrontConfig;

/// A successful customer sign-in.
pub struct CustomerLogin {
    pub token: SecretString,
    pub customer: Customer,
}

impl std::fmt::Debug for CustomerLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerLogin")
            .field("token", &"[REDACTED]")
            .field("customer", &self.customer)
            .finish()
    }
}

/// Wire shape of `POST /customers/login`.
#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    customer: Customer,
}

/// Body of the login and signup calls.
#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Client for the public and customer endpoints.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    rest: RestClient,
}

impl StorefrontClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API URL is unusable or the HTTP client fails
    /// to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        Ok(Self {
            rest: RestClient::new(&config.api_url, config.http_timeout)?,
        })
    }

    /// Wrap an existing transport.
    #[must_use]
    pub const fn from_rest(rest: RestClient) -> Self {
        Self { rest }
    }

    /// List the public menu (`GET /products/public`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn public_products(&self) -> Result<Vec<Product>, ApiError> {
        self.rest.get(&["products", "public"], None).await
    }

    /// Sign a customer in (`POST /customers/login`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend refuses the
    /// credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<CustomerLogin, ApiError> {
        let body = Credentials {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        let response: LoginResponse = self.rest.post(&["customers", "login"], None, &body).await?;
        Ok(CustomerLogin {
            token: SecretString::from(response.token),
            customer: response.customer,
        })
    }

    /// Register a customer account (`POST /customers/signup`).
    ///
    /// The response body is not used; the account becomes usable through a
    /// subsequent login.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend refuses the
    /// signup.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn signup(&self, email: &Email, password: &SecretString) -> Result<(), ApiError> {
        let body = Credentials {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        let _: IgnoredAny = self.rest.post(&["customers", "signup"], None, &body).await?;
        Ok(())
    }

    /// Save delivery details for the token's customer
    /// (`PUT /customers/details`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is refused.
    #[instrument(skip(self, token, details))]
    pub async fn update_details(
        &self,
        token: &SecretString,
        details: &CustomerDetails,
    ) -> Result<Customer, ApiError> {
        self.rest
            .put(&["customers", "details"], Some(token), details)
            .await
    }
}
