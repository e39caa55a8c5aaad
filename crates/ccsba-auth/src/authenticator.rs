//! Hashed-credential [`Authenticator`] implementation.
//!
//! Passwords are checked against the argon2 hashes in [`AuthDb`]; the
//! session role still comes from the shared store's operator list and
//! credential admin flags, so swapping authenticators does not change
//! anyone's tier.

use std::sync::Arc;

use ccsba_shared::constants::OPERATOR_EMAILS;
use ccsba_shared::{DomainError, Role};
use ccsba_store::Store;

use ccsba_app::session::Authenticator;

use crate::db::AuthDb;

pub struct TokenAuthenticator {
    db: Arc<AuthDb>,
}

impl TokenAuthenticator {
    pub fn new(db: Arc<AuthDb>) -> Self {
        Self { db }
    }
}

impl Authenticator for TokenAuthenticator {
    fn authenticate(&self, store: &Store, email: &str, password: &str) -> ccsba_app::Result<Role> {
        self.db
            .verify_login(email, password)
            .map_err(|_| DomainError::InvalidCredentials)?;

        if OPERATOR_EMAILS.contains(&email) {
            return Ok(Role::Admin);
        }
        let is_admin = store
            .find_credential(email)
            .map_err(ccsba_app::AppError::from)?
            .is_some_and(|c| c.is_admin);
        Ok(if is_admin {
            Role::BoardMember
        } else {
            Role::Member
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccsba_app::session::SessionManager;

    #[test]
    fn login_through_session_manager_uses_hashed_password() {
        let store = Arc::new(Store::in_memory().unwrap());
        store.add_credential("jane@x.com", false).unwrap();

        let db = Arc::new(AuthDb::in_memory().unwrap());
        db.create_user("jane@x.com", "hunter2").unwrap();

        let mgr = SessionManager::with_authenticator(
            store,
            Box::new(TokenAuthenticator::new(db)),
        );

        let session = mgr.login("jane@x.com", "hunter2").unwrap();
        assert_eq!(session.role, Role::Member);

        // the fixed passphrases no longer work under this scheme
        assert!(mgr.login("jane@x.com", "CBD").is_err());
    }

    #[test]
    fn admin_flag_still_grants_board_tier() {
        let store = Arc::new(Store::in_memory().unwrap());
        store.add_credential("board@x.com", true).unwrap();

        let db = Arc::new(AuthDb::in_memory().unwrap());
        db.create_user("board@x.com", "pw").unwrap();

        let auth = TokenAuthenticator::new(db);
        assert_eq!(
            auth.authenticate(&store, "board@x.com", "pw").unwrap(),
            Role::BoardMember
        );
    }
}
