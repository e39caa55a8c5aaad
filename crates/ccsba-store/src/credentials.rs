//! Credential repository: the `userCredentials` collection.

use chrono::Utc;

use ccsba_shared::constants::{ADMIN_PASSPHRASE, CREDENTIALS_KEY, MEMBER_PASSPHRASE};

use crate::error::{Result, StoreError};
use crate::models::Credential;
use crate::store::Store;

impl Store {
    pub fn all_credentials(&self) -> Result<Vec<Credential>> {
        self.get_or_default(CREDENTIALS_KEY)
    }

    /// Look up a credential by email.
    ///
    /// The comparison is case-sensitive, matching the web client's observed
    /// behavior (preserved, not silently normalized).
    pub fn find_credential(&self, email: &str) -> Result<Option<Credential>> {
        Ok(self
            .all_credentials()?
            .into_iter()
            .find(|cred| cred.email == email))
    }

    /// Provision a new account.  Fails with [`StoreError::DuplicateEmail`]
    /// if the email is already present; the collection is left unchanged.
    pub fn add_credential(&self, email: &str, is_admin: bool) -> Result<Credential> {
        let credential = Credential {
            email: email.to_string(),
            password: if is_admin {
                ADMIN_PASSPHRASE.to_string()
            } else {
                MEMBER_PASSPHRASE.to_string()
            },
            custom_password: None,
            is_admin,
            date_added: Utc::now(),
        };

        self.update::<Vec<Credential>, _, _>(CREDENTIALS_KEY, |creds| {
            if creds.iter().any(|c| c.email == email) {
                return Err(StoreError::DuplicateEmail);
            }
            creds.push(credential.clone());
            Ok(credential)
        })?
    }

    /// Re-key a credential to a new email.
    ///
    /// Only the credential record is re-keyed.  Profiles, posts, messages
    /// and notifications keep the old email, orphaning that history; this
    /// replicates the web client's behavior deliberately (see DESIGN.md).
    pub fn rename_credential(&self, old_email: &str, new_email: &str) -> Result<()> {
        self.update::<Vec<Credential>, _, _>(CREDENTIALS_KEY, |creds| {
            if new_email != old_email && creds.iter().any(|c| c.email == new_email) {
                return Err(StoreError::DuplicateEmail);
            }
            match creds.iter_mut().find(|c| c.email == old_email) {
                Some(cred) => {
                    cred.email = new_email.to_string();
                    Ok(())
                }
                None => Err(StoreError::NotFound(old_email.to_string())),
            }
        })?
    }

    /// Delete a credential.  Returns whether a record was removed.
    pub fn remove_credential(&self, email: &str) -> Result<bool> {
        self.update::<Vec<Credential>, _, _>(CREDENTIALS_KEY, |creds| {
            let before = creds.len();
            creds.retain(|c| c.email != email);
            creds.len() != before
        })
    }

    /// Set a member-chosen password.  Silent no-op when the email is
    /// unknown, matching the existing change-password flow.
    pub fn set_custom_password(&self, email: &str, password: &str) -> Result<bool> {
        self.update::<Vec<Credential>, _, _>(CREDENTIALS_KEY, |creds| {
            match creds.iter_mut().find(|c| c.email == email) {
                Some(cred) => {
                    cred.custom_password = Some(password.to_string());
                    true
                }
                None => false,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_duplicate_fails_and_size_unchanged() {
        let store = Store::in_memory().unwrap();
        store.add_credential("jane@x.com", false).unwrap();

        let err = store.add_credential("jane@x.com", true).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert_eq!(store.all_credentials().unwrap().len(), 1);
    }

    #[test]
    fn tier_passphrase_follows_admin_flag() {
        let store = Store::in_memory().unwrap();
        let member = store.add_credential("jane@x.com", false).unwrap();
        let board = store.add_credential("bob@x.com", true).unwrap();

        assert_eq!(member.password, "CBD");
        assert!(!member.is_admin);
        assert_eq!(board.password, "THC");
        assert!(board.is_admin);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let store = Store::in_memory().unwrap();
        store.add_credential("Jane@x.com", false).unwrap();

        assert!(store.find_credential("Jane@x.com").unwrap().is_some());
        assert!(store.find_credential("jane@x.com").unwrap().is_none());
    }

    #[test]
    fn rename_rekeys_credential_only() {
        let store = Store::in_memory().unwrap();
        store.add_credential("old@x.com", false).unwrap();
        store.rename_credential("old@x.com", "new@x.com").unwrap();

        assert!(store.find_credential("old@x.com").unwrap().is_none());
        assert!(store.find_credential("new@x.com").unwrap().is_some());

        let err = store.rename_credential("missing@x.com", "other@x.com").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn rename_to_existing_email_fails() {
        let store = Store::in_memory().unwrap();
        store.add_credential("a@x.com", false).unwrap();
        store.add_credential("b@x.com", false).unwrap();

        let err = store.rename_credential("a@x.com", "b@x.com").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[test]
    fn set_custom_password_unknown_email_is_noop() {
        let store = Store::in_memory().unwrap();
        assert!(!store.set_custom_password("nobody@x.com", "pw").unwrap());

        store.add_credential("jane@x.com", false).unwrap();
        assert!(store.set_custom_password("jane@x.com", "pw").unwrap());
        let cred = store.find_credential("jane@x.com").unwrap().unwrap();
        assert_eq!(cred.custom_password.as_deref(), Some("pw"));
    }
}
