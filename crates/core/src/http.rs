//! JSON-over-HTTP transport shared by the storefront and admin clients.
//!
//! Requests go to a fixed base URL plus path segments. Segments are
//! percent-encoded, so ids can never change the route. A bearer token is
//! attached when one is supplied.
//!
//! Response handling:
//! - 2xx parses the body as JSON (an empty body reads as `null`)
//! - 401 and 403 become [`ApiError::Unauthorized`]
//! - any other status becomes [`ApiError::Rejected`] carrying the backend's
//!   `error` or `message` text

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

/// Longest raw body excerpt kept in a [`ApiError::Rejected`] message.
const MAX_ERROR_BODY: usize = 200;

/// Errors from the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend refused the credentials (401/403).
    #[error("Unauthorized ({status})")]
    Unauthorized { status: u16 },

    /// The backend answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Rejected { status: u16, message: String },

    /// A success response whose body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot carry a path.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Whether this error should end the session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// The backend's own explanation, for errors that carry one.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Low-level REST client. Cheap to clone.
#[derive(Clone)]
pub struct RestClient {
    inner: Arc<RestClientInner>,
}

struct RestClientInner {
    client: reqwest::Client,
    base: Url,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base", &self.inner.base.as_str())
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Create a client for `base`. An optional `timeout` applies to every
    /// request; without one the platform defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` cannot carry path segments or the HTTP
    /// client fails to build.
    pub fn new(base: &Url, timeout: Option<Duration>) -> Result<Self, ApiError> {
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base.to_string()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(RestClientInner {
                client: builder.build()?,
                base: base.clone(),
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base
    }

    /// Resolve path segments against the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.inner.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// A navigable URL carrying `token` as a query parameter, for resources
    /// opened outside the client (invoices).
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path.
    pub fn signed_url(&self, segments: &[&str], token: &SecretString) -> Result<Url, ApiError> {
        let mut url = self.endpoint(segments)?;
        url.query_pairs_mut()
            .append_pair("token", token.expose_secret());
        Ok(url)
    }

    /// `GET` a JSON resource.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        token: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        self.send(Method::GET, segments, token, None::<&()>).await
    }

    /// `POST` a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post<B, T>(
        &self,
        segments: &[&str],
        token: Option<&SecretString>,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, segments, token, Some(body)).await
    }

    /// `PUT` a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn put<B, T>(
        &self,
        segments: &[&str],
        token: Option<&SecretString>,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, segments, token, Some(body)).await
    }

    /// `DELETE` a resource.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn delete<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        token: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        self.send(Method::DELETE, segments, token, None::<&()>)
            .await
    }

    #[instrument(
        skip(self, token, body),
        fields(path = %segments.join("/"), authenticated = token.is_some())
    )]
    async fn send<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&SecretString>,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let mut request = self.inner.client.request(method, url);
        if let Some(token) = token {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(status = status.as_u16(), "Backend refused credentials");
            return Err(ApiError::Unauthorized {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let message = rejection_message(status, &text);
            warn!(status = status.as_u16(), %message, "Backend rejected request");
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        debug!(status = status.as_u16(), bytes = text.len(), "Backend responded");
        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        Ok(serde_json::from_str(body)?)
    }
}

/// Pull a human-readable message out of an error body.
fn rejection_message(status: StatusCode, body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(serde_json::Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_owned();
    }
    trimmed.chars().take(MAX_ERROR_BODY).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde::Deserialize;
    use serde::de::IgnoredAny;
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

    fn stub() -> Router {
        Router::new()
            .route(
                "/api/whoami",
                get(|headers: HeaderMap| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("none")
                        .to_owned();
                    Json(json!({ "auth": auth }))
                }),
            )
            .route(
                "/api/products/{id}",
                get(|Path(id): Path<String>| async move { Json(json!({ "id": id })) }),
            )
            .route(
                "/api/echo",
                post(|Json(body): Json<Value>| async move { Json(body) }),
            )
            .route(
                "/api/locked",
                get(|| async { (AxumStatus::FORBIDDEN, Json(json!({"error": "nope"}))) }),
            )
            .route(
                "/api/invalid",
                post(|| async {
                    (
                        AxumStatus::UNPROCESSABLE_ENTITY,
                        Json(json!({"error": "Stock must be positive"})),
                    )
                }),
            )
            .route(
                "/api/broken",
                get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "database down") }),
            )
            .route("/api/empty", get(|| async { AxumStatus::NO_CONTENT }))
    }

    #[derive(Debug, Deserialize)]
    struct Auth {
        auth: String,
    }

    #[tokio::test]
    async fn test_bearer_header_only_with_token() {
        let client = RestClient::new(&spawn(stub()).await, None).unwrap();

        let anon: Auth = client.get(&["whoami"], None).await.unwrap();
        assert_eq!(anon.auth, "none");

        let token = SecretString::from("tok-1");
        let authed: Auth = client.get(&["whoami"], Some(&token)).await.unwrap();
        assert_eq!(authed.auth, "Bearer tok-1");
    }

    #[tokio::test]
    async fn test_ids_are_escaped_as_one_segment() {
        let client = RestClient::new(&spawn(stub()).await, None).unwrap();
        let value: Value = client.get(&["products", "a/b c"], None).await.unwrap();
        assert_eq!(value["id"], "a/b c");
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let client = RestClient::new(&spawn(stub()).await, None).unwrap();
        let value: Value = client
            .post(&["echo"], None, &json!({"status": "Packed"}))
            .await
            .unwrap();
        assert_eq!(value["status"], "Packed");
    }

    #[tokio::test]
    async fn test_forbidden_is_unauthorized() {
        let client = RestClient::new(&spawn(stub()).await, None).unwrap();
        let err = client.get::<Value>(&["locked"], None).await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_rejection_carries_backend_message() {
        let client = RestClient::new(&spawn(stub()).await, None).unwrap();
        let err = client
            .post::<_, Value>(&["invalid"], None, &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 422, .. }));
        assert_eq!(err.backend_message(), Some("Stock must be positive"));

        let err = client.get::<Value>(&["broken"], None).await.unwrap_err();
        assert_eq!(err.backend_message(), Some("database down"));
    }

    #[tokio::test]
    async fn test_empty_success_body() {
        let client = RestClient::new(&spawn(stub()).await, None).unwrap();
        let _: IgnoredAny = client.get(&["empty"], None).await.unwrap();
    }

    #[test]
    fn test_endpoint_and_signed_url() {
        let base = Url::parse("http://localhost:5000/api/").unwrap();
        let client = RestClient::new(&base, None).unwrap();
        assert_eq!(
            client.endpoint(&["orders", "all"]).unwrap().as_str(),
            "http://localhost:5000/api/orders/all"
        );

        let token = SecretString::from("t&k");
        assert_eq!(
            client
                .signed_url(&["orders", "invoice", "66a1"], &token)
                .unwrap()
                .as_str(),
            "http://localhost:5000/api/orders/invoice/66a1?token=t%26k"
        );
    }

    #[test]
    fn test_rejects_non_hierarchical_base() {
        let base = Url::parse("mailto:orders@chickyen.in").unwrap();
        assert!(matches!(
            RestClient::new(&base, None),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }
}
