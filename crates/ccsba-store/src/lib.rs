//! # ccsba-store
//!
//! Local persistent storage for the CCSBA platform.
//!
//! The "backend" of the legacy web client is the browser's localStorage,
//! read and written directly by every component.  This crate keeps that
//! shape: a single [`Store`] handle exposes a JSON key-value adapter plus
//! typed repository helpers for each logical collection (credentials,
//! profiles, posts, messages, notifications).  Every mutation is a whole
//! collection read-modify-write against one key, serialized through the
//! store's connection lock so two interleaved mutations can no longer drop
//! each other's write.

pub mod credentials;
pub mod messages;
pub mod models;
pub mod notifications;
pub mod posts;
pub mod profiles;
pub mod store;

mod error;

pub use error::StoreError;
pub use models::*;
pub use store::Store;
