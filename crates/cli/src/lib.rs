//! # lmscript CLI
//!
//! One-shot commands and the interactive tree browser on top of the
//! gateway, runner and modules crates.

pub mod commands;
pub mod context;
pub mod interactive;
pub mod logging;
pub mod navigator;

pub use context::AppContext;
pub use logging::LogControl;
pub use navigator::TreeNavigator;
