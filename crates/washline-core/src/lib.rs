//! # washline-core
//!
//! Core types, traits, and abstractions for the washline alert console.
//!
//! This crate provides the notification data model, the shared snapshot hub
//! that stream clients write to and alert consumers read from, and the
//! collaborator traits (credentials, clock) injected into the other crates.

pub mod defaults;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use events::NotificationHub;
pub use models::*;
pub use traits::*;
