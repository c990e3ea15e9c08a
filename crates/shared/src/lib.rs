//! # lmscript shared
//!
//! Common types used across all lmscript crates: errors, configuration,
//! credentials, inventory entities, module descriptors and the session context.

pub mod config;
pub mod credentials;
pub mod error;
pub mod inventory;
pub mod manifest;
pub mod module;
pub mod node;
pub mod script;
pub mod session;

// Re-exports
pub use config::*;
pub use credentials::*;
pub use error::*;
pub use inventory::*;
pub use manifest::*;
pub use module::*;
pub use node::*;
pub use script::*;
pub use session::*;
