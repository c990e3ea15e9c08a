//! lmscript portal command

use clap::{Args, Subcommand};
use shared::CredentialStore;

use super::{active_marker, print_success};
use crate::context::AppContext;

#[derive(Debug, Args)]
pub struct PortalCommand {
    #[command(subcommand)]
    pub command: PortalSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum PortalSubcommand {
    /// Make a portal from the credentials file active
    Use {
        /// Portal label as written in the credentials file
        name: String,
    },
    /// List portals, marking the active one
    List,
}

impl PortalCommand {
    pub async fn run(&self, ctx: &mut AppContext) -> anyhow::Result<()> {
        match &self.command {
            PortalSubcommand::Use { name } => {
                select_portal(ctx, name)?;
                print_success(&format!("Active portal: {}", name));
            }
            PortalSubcommand::List => {
                for name in portal_names(ctx)? {
                    let active = ctx.session.portal.as_deref() == Some(name.as_str());
                    println!("  {} {}", active_marker(active), name);
                }
            }
        }
        Ok(())
    }
}

/// Portal labels from the selected credentials file
pub fn portal_names(ctx: &AppContext) -> anyhow::Result<Vec<String>> {
    let store = CredentialStore::from_file(ctx.session.require_credentials_file()?)?;
    Ok(store.portal_names().into_iter().map(String::from).collect())
}

/// Validate `name` against the credentials file, then make it active
pub fn select_portal(ctx: &mut AppContext, name: &str) -> anyhow::Result<()> {
    let store = CredentialStore::from_file(ctx.session.require_credentials_file()?)?;
    store.get(name)?;
    ctx.session.select_portal(name);
    ctx.save()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{ClientConfig, ClientError, SessionContext};

    fn context_with_credentials(dir: &std::path::Path) -> AppContext {
        let file = dir.join("creds.json");
        std::fs::write(
            &file,
            r#"{
                "prod": { "accessId": "a", "accessKey": "k", "companyName": "acme" },
                "lab": { "accessId": "b", "accessKey": "k", "companyName": "acme-lab" }
            }"#,
        )
        .unwrap();
        let mut session = SessionContext::default();
        session.set_credentials_file(file);
        AppContext::new(ClientConfig::default(), session, dir.join("session.json"))
    }

    #[test]
    fn test_select_known_portal() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_with_credentials(dir.path());

        select_portal(&mut ctx, "lab").unwrap();

        assert_eq!(ctx.session.portal.as_deref(), Some("lab"));
        let saved = SessionContext::load(ctx.session_path()).unwrap();
        assert_eq!(saved.portal.as_deref(), Some("lab"));
    }

    #[test]
    fn test_select_unknown_portal_lists_available() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_with_credentials(dir.path());

        let err = select_portal(&mut ctx, "missing").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("missing"));
        assert!(message.contains("lab"));
        assert!(message.contains("prod"));
        assert!(ctx.session.portal.is_none());
    }

    #[test]
    fn test_select_without_credentials_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = AppContext::new(
            ClientConfig::default(),
            SessionContext::default(),
            dir.path().join("session.json"),
        );

        let err = select_portal(&mut ctx, "prod").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClientError>(),
            Some(ClientError::NoCredentialsFile)
        ));
    }

    #[test]
    fn test_portal_names_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_with_credentials(dir.path());
        assert_eq!(portal_names(&ctx).unwrap(), vec!["lab", "prod"]);
    }
}
