//! Unified error handling for the admin console.

use chickyen_core::http::ApiError;
use chickyen_core::{EmailError, OrderStatus, StaffUser, StoreError};
use thiserror::Error;

/// Application-level error type for the admin console.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Local session storage failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Email failed local validation.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The backend refused the staff email/password pair.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No usable staff session; nothing was fetched.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The backend refused the token mid-session; the session was torn down.
    #[error("Session expired")]
    SessionExpired,

    /// Signed in, but the role does not allow this.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Owner accounts are never edited or deleted from the console.
    #[error("Protected account: {0}")]
    ProtectedAccount(String),

    /// The cached order does not allow the requested move.
    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    /// The screen changed while the data was in flight.
    #[error("Superseded by a newer screen")]
    Superseded,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from the operator.
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

    /// Whether the operator has to sign in again.
    #[must_use]
    pub const fn needs_login(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::SessionExpired)
    }

    /// Capture server errors to Sentry and log them.
    pub fn report(&self) {
        if self.is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin console error"
            );
        } else {
            tracing::warn!(error = %self, "Admin action refused");
        }
    }

    /// Text safe to show the operator.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Rejected { message, .. }) => message.clone(),
            Self::Api(ApiError::Unauthorized { .. }) | Self::SessionExpired => {
                "Session expired. Please log in again.".to_string()
            }
            Self::Unauthorized(_) => "Unauthorized Access! Please login as Admin.".to_string(),
            Self::Api(_) | Self::Store(_) => "Server error. Please try again.".to_string(),
            Self::InvalidEmail(err) => err.to_string(),
            Self::InvalidCredentials => "Login failed".to_string(),
            Self::ProtectedAccount(name) => format!("{name} is a protected account."),
            Self::Forbidden(what) => format!("Only the owner can {what}."),
            Self::InvalidTransition { from, to } => {
                format!("A {from} order cannot be moved to {to}.")
            }
            Self::Superseded => "This view was replaced by a newer one.".to_string(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from the signed-in staff member.
pub fn set_sentry_user(user: &StaffUser) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: user.id.as_ref().map(ToString::to_string),
            email: user.email.clone(),
            username: user.name.clone(),
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
