//! Application context: configuration plus the persisted session

use gateway::PortalClient;
use shared::{ClientConfig, Result, SessionContext};
use std::path::{Path, PathBuf};

/// Workspace state directory
pub const STATE_DIR: &str = ".lmscript";

pub const CONFIG_FILE: &str = "config.json";

pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: ClientConfig,
    pub session: SessionContext,
    session_path: PathBuf,
}

impl AppContext {
    pub fn new(config: ClientConfig, session: SessionContext, session_path: PathBuf) -> Self {
        Self {
            config,
            session,
            session_path,
        }
    }

    /// Load config and session from `state_dir`; `config_path` overrides the config location
    pub fn load(state_dir: &Path, config_path: Option<&Path>) -> Result<Self> {
        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| state_dir.join(CONFIG_FILE));
        let config = ClientConfig::load_or_default(&config_path)?;
        let session_path = state_dir.join(SESSION_FILE);
        let session = SessionContext::load(&session_path)?;
        Ok(Self::new(config, session, session_path))
    }

    pub fn save(&self) -> Result<()> {
        self.session.save(&self.session_path)
    }

    pub fn session_path(&self) -> &Path {
        &self.session_path
    }

    /// Client for the active portal; credentials are re-read from disk
    pub fn portal_client(&self) -> Result<(String, PortalClient)> {
        let (portal, credentials) = self.session.active_credentials()?;
        let client = PortalClient::new(&self.config, &credentials)?;
        Ok((portal, client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ClientError;

    #[test]
    fn test_load_empty_state_dir() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::load(dir.path(), None).unwrap();
        assert_eq!(ctx.config, ClientConfig::default());
        assert_eq!(ctx.session, SessionContext::default());
        assert_eq!(ctx.session_path(), dir.path().join(SESSION_FILE));
    }

    #[test]
    fn test_load_config_override() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.json");
        std::fs::write(&config_path, r#"{ "pageSize": 50 }"#).unwrap();

        let ctx = AppContext::load(dir.path(), Some(&config_path)).unwrap();
        assert_eq!(ctx.config.page_size, 50);
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = AppContext::load(dir.path(), None).unwrap();
        ctx.session.select_portal("prod");
        ctx.save().unwrap();

        let reloaded = AppContext::load(dir.path(), None).unwrap();
        assert_eq!(reloaded.session.portal.as_deref(), Some("prod"));
    }

    #[test]
    fn test_portal_client_requires_credentials_file() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::load(dir.path(), None).unwrap();
        assert!(matches!(
            ctx.portal_client(),
            Err(ClientError::NoCredentialsFile)
        ));
    }
}
