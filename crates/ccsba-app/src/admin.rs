//! Admin console operations: provisioning, renaming, removing and
//! password-resetting member accounts.

use std::sync::Arc;

use tracing::info;

use ccsba_shared::constants::ADMIN_DISPLAY_NAME;
use ccsba_shared::{DomainError, NotificationKind};
use ccsba_store::{Credential, Store};

use crate::error::Result;
use crate::notify::NotificationEngine;

pub struct AdminEngine {
    store: Arc<Store>,
    notifications: NotificationEngine,
}

impl AdminEngine {
    pub fn new(store: Arc<Store>) -> Self {
        let notifications = NotificationEngine::new(store.clone());
        Self {
            store,
            notifications,
        }
    }

    /// Provision an account at the given tier and drop a system
    /// notification into the new member's tray.
    pub fn add_user(&self, email: &str, is_admin: bool) -> Result<Credential> {
        let email = email.trim();
        if email.is_empty() {
            return Err(DomainError::EmptyContent.into());
        }

        let credential = self.store.add_credential(email, is_admin)?;
        let text = if is_admin {
            "You have been added as a board member"
        } else {
            "Your account has been created"
        };
        self.notifications
            .notify(email, NotificationKind::System, text, ADMIN_DISPLAY_NAME, None)?;

        info!(email, is_admin, "provisioned account");
        Ok(credential)
    }

    pub fn list_users(&self) -> Result<Vec<Credential>> {
        Ok(self.store.all_credentials()?)
    }

    /// Re-key an account to a new email.  Only the credential moves;
    /// the old address's content history stays under the old key.
    pub fn rename_user(&self, old_email: &str, new_email: &str) -> Result<()> {
        let new_email = new_email.trim();
        if new_email.is_empty() {
            return Err(DomainError::EmptyContent.into());
        }
        self.store.rename_credential(old_email, new_email)?;
        info!(old_email, new_email, "renamed account");
        Ok(())
    }

    /// Remove an account.  Returns whether anything was deleted.
    pub fn delete_user(&self, email: &str) -> Result<bool> {
        let removed = self.store.remove_credential(email)?;
        if removed {
            info!(email, "deleted account");
        }
        Ok(removed)
    }

    /// Set a member-chosen password over the tier passphrase.  Unknown
    /// emails are a silent no-op.
    pub fn change_password(&self, email: &str, password: &str) -> Result<bool> {
        Ok(self.store.set_custom_password(email, password)?)
    }
}
