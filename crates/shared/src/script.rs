//! Script engines supported by collectors

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Script engine a collector can execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptLanguage {
    #[default]
    Groovy,
    PowerShell,
}

impl ScriptLanguage {
    /// Execution-mode marker prefixed to a debug command
    pub fn marker(&self) -> &'static str {
        match self {
            ScriptLanguage::Groovy => "!groovy",
            ScriptLanguage::PowerShell => "!posh",
        }
    }

    /// File extension (without the dot)
    pub fn extension(&self) -> &'static str {
        match self {
            ScriptLanguage::Groovy => "groovy",
            ScriptLanguage::PowerShell => "ps1",
        }
    }

    /// Interpret a module's declared script type; Groovy when absent or unrecognised
    pub fn from_declared(script_type: Option<&str>) -> Self {
        match script_type.map(|s| s.trim().to_ascii_lowercase()) {
            Some(t) if t == "powershell" || t == "posh" || t == "ps1" => ScriptLanguage::PowerShell,
            _ => ScriptLanguage::Groovy,
        }
    }

    /// Pick the engine for a local script file from its extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "groovy" => Ok(ScriptLanguage::Groovy),
            "ps1" => Ok(ScriptLanguage::PowerShell),
            _ => Err(ClientError::UnsupportedScriptType(
                path.display().to_string(),
            )),
        }
    }
}
