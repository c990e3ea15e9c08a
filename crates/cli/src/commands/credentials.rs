//! lmscript credentials command

use clap::{Args, Subcommand};
use shared::CredentialStore;
use std::path::PathBuf;

use super::{active_marker, print_success, print_warning};
use crate::context::AppContext;

#[derive(Debug, Args)]
pub struct CredentialsCommand {
    #[command(subcommand)]
    pub command: CredentialsSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum CredentialsSubcommand {
    /// Use a JSON or YAML credentials file
    Use {
        /// Path to the credentials file
        file: PathBuf,
    },
    /// List the portals in the selected credentials file
    List,
}

impl CredentialsCommand {
    pub async fn run(&self, ctx: &mut AppContext) -> anyhow::Result<()> {
        match &self.command {
            CredentialsSubcommand::Use { file } => use_credentials_file(ctx, file),
            CredentialsSubcommand::List => {
                let path = ctx.session.require_credentials_file()?;
                let store = CredentialStore::from_file(path)?;
                println!("Credentials file: {}", path.display());
                if store.is_empty() {
                    print_warning("No portals defined");
                }
                for (name, creds) in store.iter() {
                    let active = ctx.session.portal.as_deref() == Some(name);
                    println!(
                        "  {} {:<20} company={} accessId={}",
                        active_marker(active),
                        name,
                        creds.company_name,
                        creds.access_id
                    );
                }
                Ok(())
            }
        }
    }
}

/// Remember `file` as the credentials source; the active portal survives only if the file defines it
pub fn use_credentials_file(ctx: &mut AppContext, file: &std::path::Path) -> anyhow::Result<()> {
    let store = CredentialStore::from_file(file)?;
    let path = file.canonicalize().unwrap_or_else(|_| file.to_path_buf());

    ctx.session.set_credentials_file(path.clone());
    if let Some(portal) = ctx.session.portal.clone() {
        if store.get(&portal).is_err() {
            ctx.session.portal = None;
            ctx.session.collector = None;
            ctx.session.device = None;
            print_warning(&format!(
                "Portal '{}' is not defined in the new file and was deselected",
                portal
            ));
        }
    }
    ctx.save()?;

    print_success(&format!("Using credentials file {}", path.display()));
    println!("Portals: {}", store.portal_names().join(", "));
    Ok(())
}
