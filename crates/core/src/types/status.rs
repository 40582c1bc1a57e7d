//! Status enums for orders and staff accounts.
//!
//! # Order workflow
//!
//! ```text
//! Processing ──► Verified ──► Packed ──► Out for Delivery ──► Delivered
//!     │
//!     └────────► Cancelled
//! ```
//!
//! The backend enforces the workflow; the client only offers the transitions
//! listed here and re-fetches to observe the result.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Processing,
    Verified,
    Packed,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status in workflow order.
    pub const ALL: [Self; 6] = [
        Self::Processing,
        Self::Verified,
        Self::Packed,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Statuses that count toward the order totals and daily revenue cards.
    pub const REVENUE_ELIGIBLE: [Self; 4] = [
        Self::Verified,
        Self::Packed,
        Self::OutForDelivery,
        Self::Delivered,
    ];

    /// Statuses still moving through the workflow.
    pub const PENDING: [Self; 4] = [
        Self::Processing,
        Self::Verified,
        Self::Packed,
        Self::OutForDelivery,
    ];

    /// The wire / display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Processing => "Processing",
            Self::Verified => "Verified",
            Self::Packed => "Packed",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// The forward step of the workflow, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Processing => Some(Self::Verified),
            Self::Verified => Some(Self::Packed),
            Self::Packed => Some(Self::OutForDelivery),
            Self::OutForDelivery => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    /// Transitions an admin may request from this status.
    #[must_use]
    pub fn transitions(self) -> Vec<Self> {
        let mut targets: Vec<Self> = self.next().into_iter().collect();
        if self == Self::Processing {
            targets.push(Self::Cancelled);
        }
        targets
    }

    /// Whether `target` is a legal next status.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target) || (self == Self::Processing && target == Self::Cancelled)
    }

    /// Whether the order counts toward revenue totals.
    #[must_use]
    pub fn is_revenue_eligible(self) -> bool {
        Self::REVENUE_ELIGIBLE.contains(&self)
    }

    /// Whether the order is still in the workflow.
    #[must_use]
    pub fn is_pending(self) -> bool {
        Self::PENDING.contains(&self)
    }

    /// Terminal statuses accept no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    /// Accepts the wire label or a kebab/snake variant (`out-for-delivery`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|status| status.label().to_lowercase() == normalized)
            .ok_or_else(|| UnknownStatus(s.to_owned()))
    }
}

/// Staff role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Runs the store; manages staff and clears logs. Protected from edits.
    Owner,
    /// Day-to-day order and catalog management.
    Admin,
}

impl StaffRole {
    /// Owner-only operations check this.
    #[must_use]
    pub const fn is_owner(self) -> bool {
        matches!(self, Self::Owner)
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid staff role: {s}")),
        }
    }
}
