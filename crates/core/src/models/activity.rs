//! Staff activity log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of `GET /logs/all`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    #[serde(default)]
    pub action_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub admin_name: String,
    pub timestamp: DateTime<Utc>,
}

impl ActivityLog {
    #[must_use]
    pub fn kind(&self) -> ActivityKind {
        ActivityKind::from_action_type(&self.action_type)
    }
}

/// Icon category of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Login,
    Order,
    Staff,
    Product,
    Other,
}

impl ActivityKind {
    /// Categorize a free-text action type.
    ///
    /// Checked in order LOGIN, ORDER, STAFF, PRODUCT with later matches
    /// winning, so `PRODUCT` outranks everything and `LOGIN` ranks lowest.
    #[must_use]
    pub fn from_action_type(action_type: &str) -> Self {
        [
            ("LOGIN", Self::Login),
            ("ORDER", Self::Order),
            ("STAFF", Self::Staff),
            ("PRODUCT", Self::Product),
        ]
        .into_iter()
        .filter(|(needle, _)| action_type.contains(needle))
        .map(|(_, kind)| kind)
        .last()
        .unwrap_or(Self::Other)
    }

    /// Short tag used by the terminal renderer.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Login => "[login]",
            Self::Order => "[order]",
            Self::Staff => "[staff]",
            Self::Product => "[product]",
            Self::Other => "[info]",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence() {
        assert_eq!(
            ActivityKind::from_action_type("STAFF_LOGIN"),
            ActivityKind::Staff
        );
        assert_eq!(
            ActivityKind::from_action_type("ORDER_PRODUCT_SYNC"),
            ActivityKind::Product
        );
        assert_eq!(
            ActivityKind::from_action_type("ORDER_STATUS"),
            ActivityKind::Order
        );
        assert_eq!(ActivityKind::from_action_type("LOGIN"), ActivityKind::Login);
    }

    #[test]
    fn test_unknown_is_other() {
        assert_eq!(ActivityKind::from_action_type("BACKUP"), ActivityKind::Other);
        assert_eq!(ActivityKind::from_action_type(""), ActivityKind::Other);
    }
}
