//! Staff endpoints of the backend API.
//!
//! Every call except [`AdminClient::login`] carries the staff bearer token.
//! Mutations ignore the response body; the console re-fetches the affected
//! collection afterwards.

use chickyen_core::http::{ApiError, RestClient};
use chickyen_core::{
    ActivityLog, Customer, Email, LocationId, LocationInput, Order, OrderId, OrderStatus,
    PickupLocation, Product, ProductId, ProductInput, StaffAccount, StaffId, StaffInput,
    StaffUser, StatusUpdate,
};
use secrecy::{ExposeSecret, SecretString};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use crate::config::AdminConfig;

/// A successful staff sign-in.
pub struct StaffLogin {
    pub token: SecretString,
    pub user: StaffUser,
}

impl std::fmt::Debug for StaffLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaffLogin")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    user: StaffUser,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Client for the staff endpoints.
#[derive(Debug, Clone)]
pub struct AdminClient {
    rest: RestClient,
}

impl AdminClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API URL is unusable or the HTTP client fails
    /// to build.
    pub fn new(config: &AdminConfig) -> Result<Self, ApiError> {
        Ok(Self {
            rest: RestClient::new(&config.api_url, config.http_timeout)?,
        })
    }

    /// Wrap an existing transport.
    #[must_use]
    pub const fn from_rest(rest: RestClient) -> Self {
        Self { rest }
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Sign a staff member in (`POST /auth/login`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the credentials are refused.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &SecretString) -> Result<StaffLogin, ApiError> {
        let body = Credentials {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        let response: LoginResponse = self.rest.post(&["auth", "login"], None, &body).await?;
        Ok(StaffLogin {
            token: SecretString::from(response.token),
            user: response.user,
        })
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// `GET /orders/all`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn orders(&self, token: &SecretString) -> Result<Vec<Order>, ApiError> {
        self.rest.get(&["orders", "all"], Some(token)).await
    }

    /// `PUT /orders/status/:id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend refuses the move.
    #[instrument(skip(self, token), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        token: &SecretString,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .rest
            .put(&["orders", "status", id.as_str()], Some(token), &StatusUpdate { status })
            .await?;
        Ok(())
    }

    /// Navigable invoice link (`GET /orders/invoice/:id?token=`).
    ///
    /// The token rides in the query string because the link is opened, not
    /// fetched.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path.
    pub fn invoice_url(&self, token: &SecretString, id: &OrderId) -> Result<Url, ApiError> {
        self.rest
            .signed_url(&["orders", "invoice", id.as_str()], token)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// `GET /products`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn products(&self, token: &SecretString) -> Result<Vec<Product>, ApiError> {
        self.rest.get(&["products"], Some(token)).await
    }

    /// `POST /products/add`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the input is rejected.
    #[instrument(skip(self, token, input), fields(name = %input.name))]
    pub async fn create_product(
        &self,
        token: &SecretString,
        input: &ProductInput,
    ) -> Result<(), ApiError> {
        let _: IgnoredAny = self.rest.post(&["products", "add"], Some(token), input).await?;
        Ok(())
    }

    /// `PUT /products/:id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the input is rejected.
    #[instrument(skip(self, token, input), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        token: &SecretString,
        id: &ProductId,
        input: &ProductInput,
    ) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .rest
            .put(&["products", id.as_str()], Some(token), input)
            .await?;
        Ok(())
    }

    /// `DELETE /products/:id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn delete_product(&self, token: &SecretString, id: &ProductId) -> Result<(), ApiError> {
        let _: IgnoredAny = self.rest.delete(&["products", id.as_str()], Some(token)).await?;
        Ok(())
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// `GET /customers/all`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn customers(&self, token: &SecretString) -> Result<Vec<Customer>, ApiError> {
        self.rest.get(&["customers", "all"], Some(token)).await
    }

    // =========================================================================
    // Pickup locations
    // =========================================================================

    /// `GET /locations/pickup-points`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn pickup_points(&self, token: &SecretString) -> Result<Vec<PickupLocation>, ApiError> {
        self.rest
            .get(&["locations", "pickup-points"], Some(token))
            .await
    }

    /// `POST /locations/pickup-points`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the input is rejected.
    #[instrument(skip(self, token, input), fields(name = %input.name))]
    pub async fn add_pickup_point(
        &self,
        token: &SecretString,
        input: &LocationInput,
    ) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .rest
            .post(&["locations", "pickup-points"], Some(token), input)
            .await?;
        Ok(())
    }

    /// `DELETE /locations/pickup-points/:id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(location_id = %id))]
    pub async fn delete_pickup_point(
        &self,
        token: &SecretString,
        id: &LocationId,
    ) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .rest
            .delete(&["locations", "pickup-points", id.as_str()], Some(token))
            .await?;
        Ok(())
    }

    // =========================================================================
    // Staff
    // =========================================================================

    /// `GET /auth/users`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn staff(&self, token: &SecretString) -> Result<Vec<StaffAccount>, ApiError> {
        self.rest.get(&["auth", "users"], Some(token)).await
    }

    /// `POST /auth/register-staff`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the input is rejected.
    #[instrument(skip(self, token, input), fields(email = %input.email, role = %input.role))]
    pub async fn register_staff(
        &self,
        token: &SecretString,
        input: &StaffInput,
    ) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .rest
            .post(&["auth", "register-staff"], Some(token), input)
            .await?;
        Ok(())
    }

    /// `PUT /auth/update-staff/:id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the input is rejected.
    #[instrument(skip(self, token, input), fields(staff_id = %id))]
    pub async fn update_staff(
        &self,
        token: &SecretString,
        id: &StaffId,
        input: &StaffInput,
    ) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .rest
            .put(&["auth", "update-staff", id.as_str()], Some(token), input)
            .await?;
        Ok(())
    }

    /// `DELETE /auth/delete-staff/:id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(staff_id = %id))]
    pub async fn delete_staff(&self, token: &SecretString, id: &StaffId) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .rest
            .delete(&["auth", "delete-staff", id.as_str()], Some(token))
            .await?;
        Ok(())
    }

    // =========================================================================
    // Activity logs
    // =========================================================================

    /// `GET /logs/all`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn activity_logs(&self, token: &SecretString) -> Result<Vec<ActivityLog>, ApiError> {
        self.rest.get(&["logs", "all"], Some(token)).await
    }

    /// `DELETE /logs/clear`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn clear_logs(&self, token: &SecretString) -> Result<(), ApiError> {
        let _: IgnoredAny = self.rest.delete(&["logs", "clear"], Some(token)).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{delete, get, put};
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use super::*;

    async fn spawn(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/api")).unwrap()
    }

    fn bearer(headers: &HeaderMap) -> String {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned()
    }

    async fn client(router: Router) -> (AdminClient, Url) {
        let base = spawn(router).await;
        let client = AdminClient::from_rest(RestClient::new(&base, None).unwrap());
        (client, base)
    }

    #[tokio::test]
    async fn test_status_update_body_and_path() {
        let router = Router::new().route(
            "/api/orders/status/{id}",
            put(
                |Path(id): Path<String>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    assert_eq!(bearer(&headers), "Bearer staff-tok");
                    Json(json!({ "id": id, "status": body["status"] }))
                },
            ),
        );
        let (client, _) = client(router).await;
        client
            .update_order_status(
                &SecretString::from("staff-tok"),
                &OrderId::new("o1"),
                OrderStatus::OutForDelivery,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_rejected_status_update_carries_message() {
        let router = Router::new().route(
            "/api/orders/status/{id}",
            put(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "Order already delivered"})),
                )
            }),
        );
        let (client, _) = client(router).await;
        let err = client
            .update_order_status(
                &SecretString::from("t"),
                &OrderId::new("o1"),
                OrderStatus::Verified,
            )
            .await
            .unwrap_err();
        assert_eq!(err.backend_message(), Some("Order already delivered"));
    }

    #[tokio::test]
    async fn test_lists_and_deletes() {
        let router = Router::new()
            .route(
                "/api/products",
                get(|| async {
                    Json(json!([{
                        "_id": "p1", "name": "Mango", "price": 180,
                        "weight": "250g", "spiceLevel": 2, "stock": 4
                    }]))
                }),
            )
            .route(
                "/api/auth/delete-staff/{id}",
                delete(|Path(id): Path<String>| async move {
                    if id == "s1" {
                        (StatusCode::OK, Json(json!({"message": "deleted"})))
                    } else {
                        (StatusCode::NOT_FOUND, Json(json!({"error": "No such staff"})))
                    }
                }),
            )
            .route("/api/logs/clear", delete(|| async { StatusCode::NO_CONTENT }));
        let (client, _) = client(router).await;
        let token = SecretString::from("t");

        let products = client.products(&token).await.unwrap();
        assert_eq!(products.len(), 1);
        assert!(products.first().unwrap().is_low_stock());

        client.delete_staff(&token, &StaffId::new("s1")).await.unwrap();
        let err = client
            .delete_staff(&token, &StaffId::new("s2"))
            .await
            .unwrap_err();
        assert_eq!(err.backend_message(), Some("No such staff"));

        client.clear_logs(&token).await.unwrap();
    }

    #[tokio::test]
    async fn test_invoice_url_carries_token() {
        let (client, base) = client(Router::new()).await;
        let url = client
            .invoice_url(&SecretString::from("abc"), &OrderId::new("o 1"))
            .unwrap();
        assert!(url.as_str().starts_with(base.as_str()));
        assert!(url.path().ends_with("/orders/invoice/o%201"));
        assert_eq!(url.query(), Some("token=abc"));
    }

    #[tokio::test]
    async fn test_forbidden_is_unauthorized() {
        let router = Router::new().route(
            "/api/customers/all",
            get(|| async { (StatusCode::FORBIDDEN, Json(json!({"error": "Admins only"}))) }),
        );
        let (client, _) = client(router).await;
        let err = client.customers(&SecretString::from("t")).await.unwrap_err();
        assert!(err.is_unauthorized());
    }
}
