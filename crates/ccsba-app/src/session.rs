//! Session and access control.
//!
//! Identity is two keys in the shared store: an opaque role token under
//! `authToken` and the current email under `userEmail`.  The login policy is
//! the fixed-passphrase scheme; [`Authenticator`] is the seam for
//! swapping in the hashed-credential module (`ccsba-auth`) without touching
//! the session contract.

use std::sync::Arc;

use ccsba_shared::constants::{
    ADMIN_PASSPHRASE, AUTH_TOKEN_KEY, MEMBER_PASSPHRASE, OPERATOR_EMAILS, USER_EMAIL_KEY,
};
use ccsba_shared::{DomainError, Role};
use ccsba_store::Store;

use crate::error::Result;

/// Process-wide identity context, established at login and torn down at
/// logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    pub role: Role,
}

impl Session {
    pub fn is_admin_tier(&self) -> bool {
        self.role.is_admin_tier()
    }
}

/// Credential verification seam.  The default implementation is the fixed
/// passphrase tier scheme; `ccsba-auth` provides a hashed alternative.
pub trait Authenticator: Send + Sync {
    /// Verify `password` for `email`, returning the session role.
    /// Must fail with [`DomainError::InvalidCredentials`] without revealing
    /// whether the email exists.
    fn authenticate(&self, store: &Store, email: &str, password: &str) -> Result<Role>;
}

/// The platform's placeholder credential scheme.  Policy, first match wins:
///
/// 1. operator address + admin passphrase        -> admin
/// 2. admin-flagged credential + admin passphrase -> admin (board member)
/// 3. credential with matching custom password    -> member
/// 4. non-admin credential + member passphrase    -> member
/// 5. otherwise                                   -> invalid credentials
pub struct PassphraseAuthenticator;

impl Authenticator for PassphraseAuthenticator {
    fn authenticate(&self, store: &Store, email: &str, password: &str) -> Result<Role> {
        if OPERATOR_EMAILS.contains(&email) && password == ADMIN_PASSPHRASE {
            return Ok(Role::Admin);
        }

        let credential = store.find_credential(email)?;

        if let Some(cred) = &credential {
            if cred.is_admin && password == ADMIN_PASSPHRASE {
                return Ok(Role::BoardMember);
            }
            if cred.custom_password.as_deref() == Some(password) {
                return Ok(Role::Member);
            }
            if !cred.is_admin && password == MEMBER_PASSPHRASE {
                return Ok(Role::Member);
            }
        }

        Err(DomainError::InvalidCredentials.into())
    }
}

/// Owns login/logout and session restoration against the shared store.
pub struct SessionManager {
    store: Arc<Store>,
    authenticator: Box<dyn Authenticator>,
}

impl SessionManager {
    pub fn new(store: Arc<Store>) -> Self {
        Self::with_authenticator(store, Box::new(PassphraseAuthenticator))
    }

    pub fn with_authenticator(store: Arc<Store>, authenticator: Box<dyn Authenticator>) -> Self {
        Self {
            store,
            authenticator,
        }
    }

    /// Authenticate and persist the session identity keys.
    pub fn login(&self, email: &str, password: &str) -> Result<Session> {
        let role = self.authenticator.authenticate(&self.store, email, password)?;

        self.store.set(USER_EMAIL_KEY, &email)?;
        self.store.set(AUTH_TOKEN_KEY, &role.token())?;

        tracing::info!(email, ?role, "login");
        Ok(Session {
            email: email.to_string(),
            role,
        })
    }

    /// Rebuild the session from the stored identity keys at startup.
    ///
    /// The role is re-derived from the operator list and the credential's
    /// admin flag rather than trusted from the token alone, as the web
    /// client does on every app mount.
    pub fn restore(&self) -> Result<Option<Session>> {
        let token: Option<String> = self.store.get(AUTH_TOKEN_KEY)?;
        let email: Option<String> = self.store.get(USER_EMAIL_KEY)?;

        let (Some(token), Some(email)) = (token, email) else {
            return Ok(None);
        };

        let role = if OPERATOR_EMAILS.contains(&email.as_str()) {
            Role::Admin
        } else if self
            .store
            .find_credential(&email)?
            .is_some_and(|c| c.is_admin)
        {
            Role::BoardMember
        } else {
            Role::from_token(&token).unwrap_or(Role::Member)
        };

        Ok(Some(Session { email, role }))
    }

    /// Clear session state unconditionally.
    pub fn logout(&self) -> Result<()> {
        self.store.remove(AUTH_TOKEN_KEY)?;
        self.store.remove(USER_EMAIL_KEY)?;
        tracing::info!("logout");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn manager() -> SessionManager {
        SessionManager::new(Arc::new(Store::in_memory().unwrap()))
    }

    #[test]
    fn operator_logs_in_with_admin_passphrase() {
        let mgr = manager();
        let session = mgr.login("info@ctcannabisalliance.org", "THC").unwrap();
        assert_eq!(session.role, Role::Admin);
        assert!(session.is_admin_tier());
    }

    #[test]
    fn member_passphrase_works_only_for_provisioned_members() {
        let mgr = manager();
        mgr.store.add_credential("jane@x.com", false).unwrap();

        let session = mgr.login("jane@x.com", "CBD").unwrap();
        assert_eq!(session.role, Role::Member);

        // admin passphrase for a plain member fails
        let err = mgr.login("jane@x.com", "THC").unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::InvalidCredentials)
        ));

        // unknown emails get the same generic failure
        let err = mgr.login("nobody@x.com", "CBD").unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::InvalidCredentials)
        ));
    }

    #[test]
    fn board_member_gets_admin_tier() {
        let mgr = manager();
        mgr.store.add_credential("board@x.com", true).unwrap();

        let session = mgr.login("board@x.com", "THC").unwrap();
        assert_eq!(session.role, Role::BoardMember);
        assert!(session.is_admin_tier());
    }

    #[test]
    fn custom_password_beats_member_passphrase() {
        let mgr = manager();
        mgr.store.add_credential("jane@x.com", false).unwrap();
        mgr.store.set_custom_password("jane@x.com", "s3cret").unwrap();

        assert_eq!(mgr.login("jane@x.com", "s3cret").unwrap().role, Role::Member);
        // the fixed member passphrase still works (rule 4 remains reachable)
        assert_eq!(mgr.login("jane@x.com", "CBD").unwrap().role, Role::Member);
    }

    #[test]
    fn restore_round_trips_and_logout_clears() {
        let mgr = manager();
        assert!(mgr.restore().unwrap().is_none());

        mgr.store.add_credential("board@x.com", true).unwrap();
        let session = mgr.login("board@x.com", "THC").unwrap();

        let restored = mgr.restore().unwrap().unwrap();
        assert_eq!(restored, session);

        mgr.logout().unwrap();
        assert!(mgr.restore().unwrap().is_none());
        // logout with no session is still fine
        mgr.logout().unwrap();
    }
}
