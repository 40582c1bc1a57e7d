//! Chickyen Admin library.
//!
//! The staff console as a library: front ends (the `chickyen admin` CLI, or
//! anything else) drive an [`AdminConsole`] and draw the view models it
//! returns.
//!
//! # Security
//!
//! The console only opens over a stored staff session whose role is `admin`
//! or `owner`. Staff management and clearing the activity log are further
//! restricted to the owner, and owner accounts cannot be edited or removed.
//! A token the backend refuses ends the session on the spot.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod components;
pub mod config;
pub mod console;
pub mod error;
pub mod guard;
pub mod orders;
pub mod views;

pub use api::{AdminClient, StaffLogin};
pub use config::{AdminConfig, ConfigError};
pub use console::{AdminConsole, EditMode, Fetched, Landing, ScreenTicket, StaffForm, Tab};
pub use error::{AppError, Result};
pub use guard::{StaffSession, authorize, sign_in, sign_out};
pub use orders::{LowStockAlert, PendingStatusChange, StatusChanged, StatusPrompt, Tone};
