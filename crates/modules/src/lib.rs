//! # lmscript modules
//!
//! Module catalog browsing and pulling module definitions, with their
//! embedded scripts, to local files.

pub mod catalog;
pub mod extract;
pub mod pull;

pub use catalog::list_grouped;
pub use extract::{extract_scripts, ExtractedScript};
pub use pull::{module_dir, pull_module, write_module, PullReport, MANIFEST_FILE};
