//! Error types for lmscript

use thiserror::Error;

/// Error thrown when a portal label is not present in the credentials file
#[derive(Debug, Error)]
#[error("Portal '{portal}' not found in credentials file. Available portals: {}", available_portals.join(", "))]
pub struct PortalNotFoundError {
    pub portal: String,
    pub available_portals: Vec<String>,
}

/// General lmscript error type
#[derive(Debug, Error)]
pub enum ClientError {
    // ---- Local preconditions (nothing has been sent yet) ----
    #[error("No credentials file selected. Run `lmscript credentials use <file>` first")]
    NoCredentialsFile,

    #[error(transparent)]
    PortalNotFound(#[from] PortalNotFoundError),

    #[error("No active portal selected. Run `lmscript portal use <name>` first")]
    NoActivePortal,

    #[error("No active collector selected. Run `lmscript collector use` first")]
    NoActiveCollector,

    #[error("No active device selected. Run `lmscript device use` first")]
    NoActiveDevice,

    #[error("Unsupported script type '{0}'. Expected a .groovy or .ps1 file")]
    UnsupportedScriptType(String),

    #[error("Unknown module kind '{0}'")]
    UnknownModuleKind(String),

    // ---- Remote failures ----
    #[error("HTTP {status} from {path}: {body}")]
    Http {
        status: u16,
        path: String,
        body: String,
    },

    #[error("Request to {path} failed: {message}")]
    Transport { path: String, message: String },

    #[error("Unexpected response from {path}: {message}")]
    InvalidResponse { path: String, message: String },

    #[error("Collector {collector_id} accepted the script but returned no session id")]
    MissingSessionId { collector_id: u64 },

    // ---- Local IO / parsing ----
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ClientError {
    /// True for failures detected locally before any request was issued
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ClientError::NoCredentialsFile
                | ClientError::PortalNotFound(_)
                | ClientError::NoActivePortal
                | ClientError::NoActiveCollector
                | ClientError::NoActiveDevice
                | ClientError::UnsupportedScriptType(_)
                | ClientError::UnknownModuleKind(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
