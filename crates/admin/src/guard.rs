//! Staff session guard.
//!
//! The console only opens over a session that passes [`authorize`]: a
//! non-empty token, a readable user record, and a role of `admin` or `owner`.
//! The check is purely local, so a rejected session never reaches the network.

use chickyen_core::http::ApiError;
use chickyen_core::{Email, KeyValueStore, SharedStore, StaffAccount, StaffRole, StaffUser};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::api::AdminClient;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};

/// Bearer token slot.
pub const TOKEN_SLOT: &str = "token";
/// Staff user record slot.
pub const USER_SLOT: &str = "user";
/// Where a refused or ended session sends the operator.
pub const LOGIN_PAGE: &str = "admin-login.html";

/// A staff session that passed the guard.
#[derive(Clone)]
pub struct StaffSession {
    token: SecretString,
    user: StaffUser,
    role: StaffRole,
}

impl std::fmt::Debug for StaffSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaffSession")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .field("role", &self.role)
            .finish()
    }
}

impl StaffSession {
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    #[must_use]
    pub const fn user(&self) -> &StaffUser {
        &self.user
    }

    #[must_use]
    pub const fn role(&self) -> StaffRole {
        self.role
    }

    #[must_use]
    pub const fn is_owner(&self) -> bool {
        self.role.is_owner()
    }

    /// Refuse `action` unless the session belongs to the owner.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-owners.
    pub fn require_owner(&self, action: &str) -> Result<()> {
        if self.is_owner() {
            Ok(())
        } else {
            Err(AppError::Forbidden(action.to_string()))
        }
    }

    /// Refuse edits to another staff account unless the session is the
    /// owner's and the account is not itself an owner.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-owners and `ProtectedAccount` for owner
    /// accounts.
    pub fn ensure_editable(&self, account: &StaffAccount, action: &str) -> Result<()> {
        self.require_owner(action)?;
        if account.is_protected() {
            return Err(AppError::ProtectedAccount(account.name.clone()));
        }
        Ok(())
    }
}

/// Check the stored session.
///
/// # Errors
///
/// Returns `Unauthorized` when the token or user record is missing or
/// unreadable, or the role is not admitted.
pub fn authorize(store: &SharedStore) -> Result<StaffSession> {
    let token = store
        .get(TOKEN_SLOT)?
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Unauthorized("no session token".to_string()))?;
    let user: StaffUser = store
        .load_json(USER_SLOT)?
        .ok_or_else(|| AppError::Unauthorized("no staff record".to_string()))?;
    let role = admitted_role(&user)?;

    Ok(StaffSession {
        token: SecretString::from(token),
        user,
        role,
    })
}

/// Sign in and store the session.
///
/// Accounts whose role the console does not admit are refused before
/// anything is stored.
///
/// # Errors
///
/// Returns `InvalidEmail`, `InvalidCredentials`, `Unauthorized` for a
/// non-staff role, or a transport error.
#[instrument(skip(client, store, password))]
pub async fn sign_in(
    client: &AdminClient,
    store: &SharedStore,
    email: &str,
    password: &SecretString,
) -> Result<StaffSession> {
    let email = Email::parse(email)?;
    let login = client
        .login(&email, password)
        .await
        .map_err(|err| match err {
            ApiError::Unauthorized { .. } => AppError::InvalidCredentials,
            other => AppError::Api(other),
        })?;
    let role = admitted_role(&login.user)?;

    store.set(TOKEN_SLOT, login.token.expose_secret())?;
    store.save_json(USER_SLOT, &login.user)?;
    set_sentry_user(&login.user);
    tracing::info!(role = %role, staff = login.user.display_name(), "Staff signed in");

    Ok(StaffSession {
        token: login.token,
        user: login.user,
        role,
    })
}

/// End the session by clearing the whole admin store. Returns where to go.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn sign_out(store: &SharedStore) -> Result<&'static str> {
    store.clear()?;
    clear_sentry_user();
    tracing::info!("Staff signed out");
    Ok(LOGIN_PAGE)
}

fn admitted_role(user: &StaffUser) -> Result<StaffRole> {
    user.staff_role().ok_or_else(|| {
        AppError::Unauthorized(format!("role `{}` cannot use the console", user.role))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chickyen_core::{MemoryStore, StaffId};

    use super::*;

    fn store_with(token: Option<&str>, user: Option<&str>) -> SharedStore {
        let store: SharedStore = Arc::new(MemoryStore::new());
        if let Some(token) = token {
            store.set(TOKEN_SLOT, token).unwrap();
        }
        if let Some(user) = user {
            store.set(USER_SLOT, user).unwrap();
        }
        store
    }

    fn account(role: StaffRole) -> StaffAccount {
        StaffAccount {
            id: StaffId::new("s1"),
            name: "Ravi".to_string(),
            email: "ravi@chickyen.in".to_string(),
            role,
        }
    }

    #[test]
    fn test_missing_token_refused() {
        let store = store_with(None, Some(r#"{"role":"owner"}"#));
        assert!(matches!(authorize(&store), Err(AppError::Unauthorized(_))));

        let store = store_with(Some(""), Some(r#"{"role":"owner"}"#));
        assert!(matches!(authorize(&store), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_missing_or_corrupt_user_refused() {
        let store = store_with(Some("tok"), None);
        assert!(matches!(authorize(&store), Err(AppError::Unauthorized(_))));

        let store = store_with(Some("tok"), Some("{{{"));
        assert!(matches!(authorize(&store), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_role_must_be_staff() {
        let store = store_with(Some("tok"), Some(r#"{"role":"customer"}"#));
        let err = authorize(&store).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref m) if m.contains("customer")));

        let store = store_with(Some("tok"), Some(r#"{"_id":"a1","name":"Meera","role":"admin"}"#));
        let session = authorize(&store).unwrap();
        assert_eq!(session.role(), StaffRole::Admin);
        assert_eq!(session.user().display_name(), "Meera");
        assert_eq!(session.token().expose_secret(), "tok");
        assert!(!format!("{session:?}").contains("tok\""));
    }

    #[test]
    fn test_owner_policies() {
        let admin = authorize(&store_with(Some("t"), Some(r#"{"role":"admin"}"#))).unwrap();
        let owner = authorize(&store_with(Some("t"), Some(r#"{"role":"owner"}"#))).unwrap();

        assert!(matches!(admin.require_owner("clear logs"), Err(AppError::Forbidden(_))));
        assert!(owner.require_owner("clear logs").is_ok());

        assert!(matches!(
            admin.ensure_editable(&account(StaffRole::Admin), "edit staff"),
            Err(AppError::Forbidden(_))
        ));
        assert!(owner.ensure_editable(&account(StaffRole::Admin), "edit staff").is_ok());
        assert!(matches!(
            owner.ensure_editable(&account(StaffRole::Owner), "edit staff"),
            Err(AppError::ProtectedAccount(ref name)) if name == "Ravi"
        ));
    }

    #[test]
    fn test_sign_out_clears_everything() {
        let store = store_with(Some("t"), Some(r#"{"role":"admin"}"#));
        store.set("unrelated", "x").unwrap();
        assert_eq!(sign_out(&store).unwrap(), LOGIN_PAGE);
        assert!(store.get("unrelated").unwrap().is_none());
        assert!(authorize(&store).is_err());
    }
}
