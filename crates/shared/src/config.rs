//! Configuration types for lmscript

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Placeholder replaced by the portal's company name in `api_base_template`
pub const COMPANY_PLACEHOLDER: &str = "{company}";

/// Client configuration (`.lmscript/config.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Base URL of the REST API, with a `{company}` placeholder
    #[serde(default = "default_api_base_template")]
    pub api_base_template: String,

    /// Value sent in the `X-Version` header
    #[serde(default = "default_api_version")]
    pub api_version: u32,

    /// Items requested per page when listing resources
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Root directory for pulled modules
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Per-request timeout in seconds (transport default when unset)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_api_base_template() -> String {
    "https://{company}.logicmonitor.com/santaba/rest".to_string()
}

fn default_api_version() -> u32 {
    3
}

fn default_page_size() -> usize {
    1000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("modules")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_template: default_api_base_template(),
            api_version: default_api_version(),
            page_size: default_page_size(),
            output_dir: default_output_dir(),
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the API base URL for a company
    pub fn base_url(&self, company: &str) -> String {
        self.api_base_template
            .replace(COMPANY_PLACEHOLDER, company)
            .trim_end_matches('/')
            .to_string()
    }

    fn validate(&self) -> crate::Result<()> {
        if self.page_size == 0 {
            return Err(crate::ClientError::Config(
                "pageSize must be greater than zero".to_string(),
            ));
        }
        if !self.api_base_template.contains(COMPANY_PLACEHOLDER) {
            return Err(crate::ClientError::Config(format!(
                "apiBaseTemplate must contain {}",
                COMPANY_PLACEHOLDER
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_version, 3);
        assert_eq!(config.page_size, 1000);
        assert_eq!(
            config.base_url("acme"),
            "https://acme.logicmonitor.com/santaba/rest"
        );
    }

    #[test]
    fn test_config_parse_partial() {
        let json = r#"{ "pageSize": 250, "outputDir": "out" }"#;
        let config: ClientConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.page_size, 250);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.api_version, 3);
    }

    #[test]
    fn test_config_rejects_zero_page_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "pageSize": 0 }"#).unwrap();
        assert!(ClientConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load_or_default(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let config = ClientConfig {
            api_base_template: "http://localhost:8080/{company}/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url("acme"), "http://localhost:8080/acme");
    }
}
