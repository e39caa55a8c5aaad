//! Profile engine: saves with denormalization propagation, and the member
//! directory.

use std::sync::Arc;

use ccsba_shared::constants::{ADMIN_DISPLAY_NAME, OPERATOR_EMAILS};
use ccsba_store::{Post, Profile, Store};

use crate::error::Result;
use crate::events::{AppEvent, EventBridge};

/// Directory card for one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberEntry {
    pub email: String,
    pub name: String,
    pub business_name: String,
    pub avatar: Option<String>,
    pub is_admin: bool,
}

pub struct ProfileEngine {
    store: Arc<Store>,
    bridge: EventBridge,
}

impl ProfileEngine {
    pub fn new(store: Arc<Store>, bridge: EventBridge) -> Self {
        Self { store, bridge }
    }

    pub fn profile(&self, email: &str) -> Result<Option<Profile>> {
        Ok(self.store.profile(email)?)
    }

    /// Profile shown when the owner has never saved one.
    pub fn profile_or_default(&self, email: &str) -> Result<Profile> {
        Ok(self.store.profile(email)?.unwrap_or(Profile {
            email: email.to_string(),
            phone_number: "999-999-9999".to_string(),
            ..Default::default()
        }))
    }

    /// Save the profile, rewrite the author snapshots embedded in the
    /// owner's historical posts and messages, and announce a
    /// `profileUpdate` so live views re-derive theirs.
    pub fn save(&self, profile: Profile) -> Result<()> {
        self.store.save_profile(&profile)?;
        self.bridge.publish(AppEvent::ProfileUpdate {
            email: profile.email.clone(),
            profile,
        });
        Ok(())
    }

    /// The owner's posts for the profile page, feed order.
    pub fn posts_by(&self, email: &str) -> Result<Vec<Post>> {
        Ok(self.store.posts_by(email)?)
    }

    /// Member directory: one card per provisioned credential (profiles
    /// resolved lazily), with the operator entries injected the way the
    /// web client hardcodes them, the viewer excluded, sorted by display
    /// name.
    pub fn member_directory(&self, viewer: &str) -> Result<Vec<MemberEntry>> {
        let mut entries = Vec::new();

        for cred in self.store.all_credentials()? {
            let profile = self.store.profile(&cred.email)?;
            entries.push(MemberEntry {
                email: cred.email.clone(),
                name: profile
                    .as_ref()
                    .map(|p| p.name.clone())
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| cred.email.clone()),
                business_name: profile
                    .as_ref()
                    .map(|p| p.business_name.clone())
                    .unwrap_or_default(),
                avatar: profile.and_then(|p| p.avatar),
                is_admin: cred.is_admin,
            });
        }

        // the second operator is reachable even when never provisioned
        if !entries.iter().any(|e| e.email == OPERATOR_EMAILS[1]) {
            let profile = self.store.profile(OPERATOR_EMAILS[1])?;
            entries.push(MemberEntry {
                email: OPERATOR_EMAILS[1].to_string(),
                name: profile
                    .as_ref()
                    .map(|p| p.name.clone())
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| "Mike".to_string()),
                business_name: profile
                    .as_ref()
                    .map(|p| p.business_name.clone())
                    .unwrap_or_default(),
                avatar: profile.and_then(|p| p.avatar),
                is_admin: true,
            });
        }

        if viewer != OPERATOR_EMAILS[0] {
            entries.push(MemberEntry {
                email: OPERATOR_EMAILS[0].to_string(),
                name: ADMIN_DISPLAY_NAME.to_string(),
                business_name: "Connecticut Cannabis Small Business Alliance".to_string(),
                avatar: None,
                is_admin: true,
            });
        }

        entries.retain(|e| e.email != viewer);
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}
