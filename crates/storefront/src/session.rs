//! Customer session: login, two-step signup, logout and the login gate.
//!
//! The session lives in three store slots: the bearer token, the customer
//! record returned at login, and the page to return to after a forced login.

use chickyen_core::http::ApiError;
use chickyen_core::{CART_SLOT, Customer, CustomerDetails, Email, KeyValueStore, SharedStore};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::api::StorefrontClient;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::views::{ProfileHeaderView, render_profile_header};

/// Bearer token slot.
pub const TOKEN_SLOT: &str = "customerToken";
/// Customer record slot.
pub const USER_SLOT: &str = "customerUser";
/// Return destination recorded by the login gate.
pub const REDIRECT_SLOT: &str = "redirectAfterLogin";

/// Where login lands when nothing was recorded, and where logout lands.
pub const DEFAULT_DESTINATION: &str = "index.html";
/// The login page the gate sends anonymous customers to.
pub const LOGIN_PAGE: &str = "login.html";
/// Where a finished signup lands.
pub const MENU_PAGE: &str = "menu.html";

/// Outcome of a successful login or signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
    pub customer: Customer,
    pub destination: String,
}

/// First signup step done; the details step still needs the credentials.
///
/// Credentials stay in memory and are never written to the store.
pub struct PendingSignup {
    email: Email,
    password: SecretString,
}

impl PendingSignup {
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }
}

impl std::fmt::Debug for PendingSignup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingSignup")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Customer authentication state backed by the store.
#[derive(Clone)]
pub struct CustomerSession {
    store: SharedStore,
    client: StorefrontClient,
}

impl CustomerSession {
    #[must_use]
    pub fn new(store: SharedStore, client: StorefrontClient) -> Self {
        Self { store, client }
    }

    /// The stored bearer token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn token(&self) -> Result<Option<SecretString>> {
        Ok(self
            .store
            .get(TOKEN_SLOT)?
            .filter(|t| !t.is_empty())
            .map(SecretString::from))
    }

    /// The stored customer record, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn current_customer(&self) -> Result<Option<Customer>> {
        Ok(self.store.load_json(USER_SLOT)?)
    }

    /// Header badge for the current state.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn header(&self) -> Result<ProfileHeaderView> {
        let has_token = self.token()?.is_some();
        let customer = self.current_customer()?;
        Ok(render_profile_header(has_token, customer.as_ref()))
    }

    /// Gate a page behind login.
    ///
    /// With no token, records `return_to` for the next login and fails with
    /// `LoginRequired`; the caller then shows [`LOGIN_PAGE`].
    ///
    /// # Errors
    ///
    /// Returns `LoginRequired` when signed out, or a store error.
    pub fn require_login(&self, return_to: &str) -> Result<SecretString> {
        if let Some(token) = self.token()? {
            return Ok(token);
        }
        self.store.set(REDIRECT_SLOT, return_to)?;
        Err(AppError::LoginRequired)
    }

    /// Sign in and store the session.
    ///
    /// Consumes the recorded return destination, defaulting to
    /// [`DEFAULT_DESTINATION`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidEmail` before any request for a malformed address,
    /// `InvalidCredentials` when the backend refuses the pair, or the
    /// backend's own rejection message.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<SignedIn> {
        let email = Email::parse(email)?;
        let login = self
            .client
            .login(&email, password)
            .await
            .map_err(refused_as_invalid)?;

        self.store.set(TOKEN_SLOT, login.token.expose_secret())?;
        self.store.save_json(USER_SLOT, &login.customer)?;
        set_sentry_user(&login.customer.id, Some(&login.customer.email));

        let destination = match self.store.get(REDIRECT_SLOT)? {
            Some(stored) if !stored.is_empty() => stored,
            _ => DEFAULT_DESTINATION.to_string(),
        };
        self.store.remove(REDIRECT_SLOT)?;

        tracing::info!(customer_id = %login.customer.id, "Customer signed in");
        Ok(SignedIn {
            customer: login.customer,
            destination,
        })
    }

    /// First signup step: register the account.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEmail` for a malformed address, or the backend's
    /// rejection.
    #[instrument(skip(self, password))]
    pub async fn signup(&self, email: &str, password: SecretString) -> Result<PendingSignup> {
        let email = Email::parse(email)?;
        self.client.signup(&email, &password).await?;
        tracing::info!(email = %email, "Customer account registered");
        Ok(PendingSignup { email, password })
    }

    /// Second signup step: save delivery details and store the session.
    ///
    /// Reuses a stored token; otherwise signs in with the pending
    /// credentials first.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for a blank field, `InvalidCredentials` if the
    /// implicit login is refused, or the backend's rejection.
    #[instrument(skip(self, pending, details), fields(email = %pending.email))]
    pub async fn complete_signup(
        &self,
        pending: PendingSignup,
        details: CustomerDetails,
    ) -> Result<SignedIn> {
        for (field, value) in [
            ("name", &details.name),
            ("phone", &details.phone),
            ("address", &details.address),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::BadRequest(format!("{field} is required")));
            }
        }

        let token = match self.token()? {
            Some(token) => token,
            None => {
                self.client
                    .login(&pending.email, &pending.password)
                    .await
                    .map_err(refused_as_invalid)?
                    .token
            }
        };

        let customer = self.client.update_details(&token, &details).await?;

        self.store.set(TOKEN_SLOT, token.expose_secret())?;
        self.store.save_json(USER_SLOT, &customer)?;
        set_sentry_user(&customer.id, Some(&customer.email));

        tracing::info!(customer_id = %customer.id, "Customer details saved");
        Ok(SignedIn {
            customer,
            destination: MENU_PAGE.to_string(),
        })
    }

    /// Forget the session and the cart. Returns where to go next.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn logout(&self) -> Result<&'static str> {
        self.store.remove(TOKEN_SLOT)?;
        self.store.remove(USER_SLOT)?;
        self.store.remove(CART_SLOT)?;
        clear_sentry_user();
        tracing::info!("Customer signed out");
        Ok(DEFAULT_DESTINATION)
    }
}

/// A refused login reads as bad credentials unless the backend said more.
fn refused_as_invalid(err: ApiError) -> AppError {
    match err {
        ApiError::Unauthorized { .. } => AppError::InvalidCredentials,
        ApiError::Rejected { ref message, .. } if message.is_empty() => {
            AppError::InvalidCredentials
        }
        other => AppError::Api(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{post, put};
    use axum::{Json, Router};
    use chickyen_core::MemoryStore;
    use chickyen_core::http::RestClient;
    use serde_json::{Value, json};
    use url::Url;

    use super::*;

    async fn spawn(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/api")).unwrap()
    }

    fn stub(logins: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/api/customers/login",
                post(move |Json(body): Json<Value>| {
                    let logins = logins.clone();
                    async move {
                        logins.fetch_add(1, Ordering::SeqCst);
                        if body["password"] == "secret" {
                            (
                                StatusCode::OK,
                                Json(json!({
                                    "token": "tok-1",
                                    "customer": {"_id": "c1", "email": body["email"]}
                                })),
                            )
                        } else {
                            (
                                StatusCode::UNAUTHORIZED,
                                Json(json!({"error": "Invalid credentials"})),
                            )
                        }
                    }
                }),
            )
            .route(
                "/api/customers/signup",
                post(|Json(body): Json<Value>| async move {
                    if body["email"] == "taken@example.com" {
                        (
                            StatusCode::BAD_REQUEST,
                            Json(json!({"error": "Email already registered"})),
                        )
                    } else {
                        (StatusCode::CREATED, Json(json!({"message": "ok"})))
                    }
                }),
            )
            .route(
                "/api/customers/details",
                put(|headers: HeaderMap, Json(body): Json<Value>| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_owned();
                    if auth != "Bearer tok-1" {
                        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "no token"})));
                    }
                    (
                        StatusCode::OK,
                        Json(json!({
                            "_id": "c1",
                            "email": "asha@example.com",
                            "name": body["name"],
                            "phone": body["phone"],
                            "address": body["address"],
                        })),
                    )
                }),
            )
    }

    async fn session() -> (CustomerSession, SharedStore, Arc<AtomicUsize>) {
        let logins = Arc::new(AtomicUsize::new(0));
        let base = spawn(stub(logins.clone())).await;
        let client = StorefrontClient::from_rest(RestClient::new(&base, None).unwrap());
        let store: SharedStore = Arc::new(MemoryStore::new());
        (CustomerSession::new(store.clone(), client), store, logins)
    }

    fn details() -> CustomerDetails {
        CustomerDetails {
            name: "Asha".to_string(),
            phone: "9876543210".to_string(),
            address: "12 MG Road".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_consumes_redirect() {
        let (session, store, _) = session().await;
        assert!(matches!(
            session.require_login("checkout.html"),
            Err(AppError::LoginRequired)
        ));
        assert_eq!(
            store.get(REDIRECT_SLOT).unwrap().as_deref(),
            Some("checkout.html")
        );

        let signed_in = session
            .login("asha@example.com", &SecretString::from("secret"))
            .await
            .unwrap();
        assert_eq!(signed_in.destination, "checkout.html");
        assert!(store.get(REDIRECT_SLOT).unwrap().is_none());
        assert_eq!(store.get(TOKEN_SLOT).unwrap().as_deref(), Some("tok-1"));
        assert!(session.require_login("checkout.html").is_ok());

        let again = session
            .login("asha@example.com", &SecretString::from("secret"))
            .await
            .unwrap();
        assert_eq!(again.destination, DEFAULT_DESTINATION);
    }

    #[tokio::test]
    async fn test_bad_password_is_invalid_credentials() {
        let (session, store, _) = session().await;
        let err = session
            .login("asha@example.com", &SecretString::from("wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        assert_eq!(err.user_message(), "Login failed");
        assert!(store.get(TOKEN_SLOT).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_email_never_calls_backend() {
        let (session, _, logins) = session().await;
        let err = session
            .login("not-an-email", &SecretString::from("secret"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidEmail(_)));
        assert_eq!(logins.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_two_step_signup() {
        let (session, store, logins) = session().await;
        let pending = session
            .signup("asha@example.com", SecretString::from("secret"))
            .await
            .unwrap();
        assert!(store.get(TOKEN_SLOT).unwrap().is_none());
        assert!(!format!("{pending:?}").contains("secret"));

        let signed_in = session.complete_signup(pending, details()).await.unwrap();
        assert_eq!(signed_in.destination, MENU_PAGE);
        assert_eq!(signed_in.customer.phone.as_deref(), Some("9876543210"));
        assert_eq!(logins.load(Ordering::SeqCst), 1);

        let stored = session.current_customer().unwrap().unwrap();
        assert_eq!(stored.address.as_deref(), Some("12 MG Road"));
        assert!(matches!(
            session.header().unwrap(),
            ProfileHeaderView::SignedIn { initial: 'A', .. }
        ));
    }

    #[tokio::test]
    async fn test_signup_rejection_passes_through() {
        let (session, _, _) = session().await;
        let err = session
            .signup("taken@example.com", SecretString::from("secret"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Email already registered");
    }

    #[tokio::test]
    async fn test_blank_details_refused() {
        let (session, _, logins) = session().await;
        let pending = session
            .signup("asha@example.com", SecretString::from("secret"))
            .await
            .unwrap();
        let mut blank = details();
        blank.phone = "  ".to_string();
        let err = session.complete_signup(pending, blank).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "phone is required"));
        assert_eq!(logins.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_cart() {
        let (session, store, _) = session().await;
        session
            .login("asha@example.com", &SecretString::from("secret"))
            .await
            .unwrap();
        store.set(CART_SLOT, "[]").unwrap();

        assert_eq!(session.logout().unwrap(), DEFAULT_DESTINATION);
        assert!(store.get(TOKEN_SLOT).unwrap().is_none());
        assert!(store.get(USER_SLOT).unwrap().is_none());
        assert!(store.get(CART_SLOT).unwrap().is_none());
        assert_eq!(session.header().unwrap(), ProfileHeaderView::SignedOut);
    }
}
