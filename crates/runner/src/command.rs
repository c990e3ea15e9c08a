//! Debug command payload submitted to a collector

use serde_json::{json, Value};
use shared::{Result, ScriptLanguage};
use std::path::Path;

/// A script bound to the device it runs against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptCommand {
    language: ScriptLanguage,
    device_id: u64,
    script: String,
}

impl ScriptCommand {
    pub fn new(language: ScriptLanguage, device_id: u64, script: impl Into<String>) -> Self {
        Self {
            language,
            device_id,
            script: script.into(),
        }
    }

    /// Read a local script; the engine is chosen from the file extension
    pub fn from_file(path: &Path, device_id: u64) -> Result<Self> {
        let language = ScriptLanguage::from_path(path)?;
        let script = std::fs::read_to_string(path)?;
        Ok(Self::new(language, device_id, script))
    }

    pub fn language(&self) -> ScriptLanguage {
        self.language
    }

    pub fn device_id(&self) -> u64 {
        self.device_id
    }

    /// `<marker> hostId=<device>` header line followed by the script body
    pub fn command_line(&self) -> String {
        format!(
            "{} hostId={}\n{}",
            self.language.marker(),
            self.device_id,
            self.script
        )
    }

    pub fn payload(&self) -> Value {
        json!({ "cmd": self.command_line() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ClientError;

    #[test]
    fn test_groovy_payload() {
        let cmd = ScriptCommand::new(ScriptLanguage::Groovy, 42, "println 'hi'");
        assert_eq!(
            cmd.payload(),
            json!({ "cmd": "!groovy hostId=42\nprintln 'hi'" })
        );
    }

    #[test]
    fn test_powershell_marker() {
        let cmd = ScriptCommand::new(ScriptLanguage::PowerShell, 7, "Get-Date");
        assert!(cmd.command_line().starts_with("!posh hostId=7\n"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.ps1");
        std::fs::write(&path, "Write-Host ok").unwrap();

        let cmd = ScriptCommand::from_file(&path, 3).unwrap();
        assert_eq!(cmd.language(), ScriptLanguage::PowerShell);
        assert_eq!(cmd.device_id(), 3);
        assert!(cmd.command_line().ends_with("Write-Host ok"));
    }

    #[test]
    fn test_from_file_rejects_unknown_extension_before_reading() {
        let err = ScriptCommand::from_file(Path::new("/does/not/exist.sh"), 1).unwrap_err();
        assert!(matches!(err, ClientError::UnsupportedScriptType(_)));
    }
}
