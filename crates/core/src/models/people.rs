//! Customers and staff accounts.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{CustomerId, StaffId, StaffRole};

/// A storefront customer as returned by login, signup and the admin
/// customer list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "_id", alias = "id")]
    pub id: CustomerId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Customer {
    /// Name for headers and tables; falls back to the email address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(self.email.as_str())
    }

    /// Whether the delivery profile still needs a name, phone and address.
    #[must_use]
    pub fn needs_details(&self) -> bool {
        [&self.name, &self.phone, &self.address]
            .into_iter()
            .any(|field| field.as_deref().is_none_or(|v| v.trim().is_empty()))
    }
}

/// Body of `PUT /customers/details`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// A row of `GET /auth/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffAccount {
    #[serde(rename = "_id")]
    pub id: StaffId,
    pub name: String,
    pub email: String,
    pub role: StaffRole,
}

impl StaffAccount {
    /// Owner accounts cannot be edited or deleted from the console.
    #[must_use]
    pub const fn is_protected(&self) -> bool {
        self.role.is_owner()
    }
}

/// Body of `POST /auth/register-staff` and `PUT /auth/update-staff/:id`.
///
/// The password is only sent when creating an account.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct StaffInput {
    pub name: String,
    pub email: String,
    pub role: StaffRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl fmt::Debug for StaffInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaffInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// The signed-in staff member as stored in the admin session.
///
/// `role` is kept as free text: the login endpoint is shared and may return
/// roles the console does not admit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffUser {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<StaffId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: String,
}

impl StaffUser {
    /// The role, if it is one the console admits.
    #[must_use]
    pub fn staff_role(&self) -> Option<StaffRole> {
        self.role.parse().ok()
    }

    /// Name shown in the console header.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Staff")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_accepts_either_id_key() {
        let a: Customer = serde_json::from_str(r#"{"_id":"c1","email":"a@x.in"}"#).unwrap();
        let b: Customer = serde_json::from_str(r#"{"id":"c1","email":"a@x.in"}"#).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.display_name(), "a@x.in");
        assert!(a.needs_details());
    }

    #[test]
    fn test_customer_with_full_details() {
        let c: Customer = serde_json::from_str(
            r#"{"_id":"c1","name":"Ravi","email":"r@x.in","phone":"99","address":"Hyd"}"#,
        )
        .unwrap();
        assert!(!c.needs_details());
        assert_eq!(c.display_name(), "Ravi");
    }

    #[test]
    fn test_staff_input_omits_password_on_update() {
        let input = StaffInput {
            name: "Meena".to_owned(),
            email: "m@x.in".to_owned(),
            role: StaffRole::Admin,
            password: None,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "admin");
    }

    #[test]
    fn test_staff_input_debug_redacts_password() {
        let input = StaffInput {
            name: "Meena".to_owned(),
            email: "m@x.in".to_owned(),
            role: StaffRole::Admin,
            password: Some("hunter2".to_owned()),
        };
        let debug = format!("{input:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_staff_user_role_gate() {
        let owner: StaffUser = serde_json::from_str(r#"{"role":"owner","name":"Lata"}"#).unwrap();
        let customer: StaffUser = serde_json::from_str(r#"{"role":"customer"}"#).unwrap();
        assert_eq!(owner.staff_role(), Some(StaffRole::Owner));
        assert_eq!(customer.staff_role(), None);
        assert_eq!(customer.display_name(), "Staff");
    }
}
