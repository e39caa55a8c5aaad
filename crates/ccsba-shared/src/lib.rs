//! # ccsba-shared
//!
//! Domain types, platform constants and the error taxonomy shared by every
//! crate in the workspace.  Nothing here touches storage or the network.

pub mod constants;
pub mod types;

mod error;

pub use error::DomainError;
pub use types::*;
