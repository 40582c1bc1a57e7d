//! Staff management screen.

use chickyen_core::StaffAccount;

use crate::guard::StaffSession;

pub const DELETE_STAFF_PROMPT: &str = "Are you sure you want to remove this staff member?";
pub const PROTECTED_BADGE: &str = "Protected Account";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffCard {
    pub id: String,
    pub name: String,
    pub role: String,
    pub email: String,
    /// Edit and delete controls; owners only, never on owner accounts.
    pub editable: bool,
    pub badge: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffView {
    pub title: &'static str,
    pub description: &'static str,
    /// "+ Register New Staff" is shown to owners only.
    pub can_register: bool,
    pub cards: Vec<StaffCard>,
}

#[must_use]
pub fn render_staff(accounts: &[StaffAccount], viewer: &StaffSession) -> StaffView {
    let is_owner = viewer.is_owner();
    StaffView {
        title: "Staff Management",
        description: if is_owner {
            "Manage your team access."
        } else {
            "View authorized personnel."
        },
        can_register: is_owner,
        cards: accounts
            .iter()
            .map(|account| StaffCard {
                id: account.id.to_string(),
                name: account.name.clone(),
                role: account.role.to_string(),
                email: account.email.clone(),
                editable: is_owner && !account.is_protected(),
                badge: account.is_protected().then_some(PROTECTED_BADGE),
            })
            .collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use chickyen_core::{KeyValueStore, MemoryStore, SharedStore, StaffId, StaffRole};

    use super::*;
    use crate::guard::{TOKEN_SLOT, USER_SLOT, authorize};

    fn viewer(role: &str) -> StaffSession {
        let store: SharedStore = Arc::new(MemoryStore::new());
        store.set(TOKEN_SLOT, "t").unwrap();
        store.set(USER_SLOT, &format!(r#"{{"role":"{role}"}}"#)).unwrap();
        authorize(&store).unwrap()
    }

    fn accounts() -> Vec<StaffAccount> {
        vec![
            StaffAccount {
                id: StaffId::new("s0"),
                name: "Ravi".to_string(),
                email: "ravi@chickyen.in".to_string(),
                role: StaffRole::Owner,
            },
            StaffAccount {
                id: StaffId::new("s1"),
                name: "Meera".to_string(),
                email: "meera@chickyen.in".to_string(),
                role: StaffRole::Admin,
            },
        ]
    }

    #[test]
    fn test_owner_view() {
        let view = render_staff(&accounts(), &viewer("owner"));
        assert_eq!(view.description, "Manage your team access.");
        assert!(view.can_register);
        assert!(!view.cards[0].editable);
        assert_eq!(view.cards[0].badge, Some(PROTECTED_BADGE));
        assert!(view.cards[1].editable);
        assert_eq!(view.cards[1].role, "admin");
    }

    #[test]
    fn test_admin_view_is_read_only() {
        let view = render_staff(&accounts(), &viewer("admin"));
        assert_eq!(view.description, "View authorized personnel.");
        assert!(!view.can_register);
        assert!(view.cards.iter().all(|c| !c.editable));
    }
}
