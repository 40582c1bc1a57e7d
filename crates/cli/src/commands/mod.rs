//! Subcommand implementations.

use std::io::{self, BufRead, Write};

use chickyen_core::http::ApiError;
use thiserror::Error;

pub mod admin;
pub mod render;
pub mod shop;

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Storefront(#[from] chickyen_storefront::AppError),

    #[error(transparent)]
    Admin(#[from] chickyen_admin::AppError),

    #[error("Configuration error: {0}")]
    StorefrontConfig(#[from] chickyen_storefront::ConfigError),

    #[error("Configuration error: {0}")]
    AdminConfig(#[from] chickyen_admin::ConfigError),

    /// The HTTP client could not be built.
    #[error("Client setup failed: {0}")]
    Client(#[from] ApiError),

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    /// A confirmed status change was refused; already reported.
    #[error("{0}")]
    UpdateFailed(String),
}

impl CliError {
    /// Report to Sentry where the underlying layer wants it, then return the
    /// text to show.
    pub fn report(&self) -> String {
        match self {
            Self::Storefront(err) => {
                err.report();
                err.user_message()
            }
            Self::Admin(err) => {
                err.report();
                err.user_message()
            }
            Self::UpdateFailed(message) => message.clone(),
            other => {
                tracing::error!(error = %other, "Command failed");
                other.to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Ask a yes/no question on the terminal. Anything but `y`/`yes` is a no.
pub fn confirm(title: &str, message: &str) -> Result<bool> {
    let mut out = io::stdout().lock();
    writeln!(out, "{title}")?;
    write!(out, "{message} [y/N] ")?;
    out.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
