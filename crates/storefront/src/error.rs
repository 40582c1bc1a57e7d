//! Unified error handling with Sentry integration.
//!
//! Every storefront operation returns `Result<T, AppError>`. Front ends call
//! [`AppError::report`] once when an error reaches the user, then show
//! [`AppError::user_message`].

use chickyen_core::http::ApiError;
use chickyen_core::{EmailError, StoreError};
use thiserror::Error;

/// Shown for failures the customer cannot act on.
const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again.";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Local state could not be read or written.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Email failed local validation.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The backend refused the email/password pair.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The action needs a signed-in customer.
    #[error("Login required")]
    LoginRequired,

    /// Checkout with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Add-to-cart on a sold-out product.
    #[error("Out of stock: {0}")]
    OutOfStock(String),

    /// No product with the requested id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether this is an infrastructure failure worth tracking.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Store(_)
                | Self::Api(
                    ApiError::Http(_) | ApiError::Parse(_) | ApiError::InvalidBaseUrl(_)
                )
        )
    }

    /// Capture server errors to Sentry and log them.
    pub fn report(&self) {
        if self.is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::debug!(error = %self, "Storefront request refused");
        }
    }

    /// Text safe to show the customer.
    ///
    /// Backend validation messages pass through verbatim; internal details
    /// do not.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Rejected { message, .. }) => message.clone(),
            Self::Api(ApiError::Unauthorized { .. }) | Self::LoginRequired => {
                "Please log in to continue.".to_string()
            }
            Self::Api(_) | Self::Store(_) => SERVER_ERROR_MESSAGE.to_string(),
            Self::InvalidEmail(err) => err.to_string(),
            Self::InvalidCredentials => "Login failed".to_string(),
            Self::EmptyCart => "Your jar is empty...".to_string(),
            Self::OutOfStock(name) => format!("{name} is sold out"),
            Self::NotFound(what) => format!("{what} not found"),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the signed-in customer.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}
