//! lmscript modules / pull commands

use clap::Args;
use console::style;
use gateway::ApiTransport;
use modules::{list_grouped, pull_module, PullReport};
use shared::ModuleKind;
use std::path::{Path, PathBuf};

use super::{print_success, print_warning};
use crate::context::AppContext;

#[derive(Debug, Args)]
pub struct ModulesCommand {
    /// Module kind, e.g. datasource, propertysource, eventsource
    pub kind: ModuleKind,
}

#[derive(Debug, Args)]
pub struct PullCommand {
    /// Module kind
    pub kind: ModuleKind,
    /// Module id
    pub id: u64,
    /// Output root; defaults to the configured output directory
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

impl ModulesCommand {
    pub async fn run(&self, ctx: &mut AppContext) -> anyhow::Result<()> {
        let (_, client) = ctx.portal_client()?;
        self.execute(ctx, &client).await
    }

    pub async fn execute<T>(&self, ctx: &AppContext, transport: &T) -> anyhow::Result<()>
    where
        T: ApiTransport + ?Sized,
    {
        let groups = list_grouped(transport, self.kind, ctx.config.page_size).await?;
        if groups.is_empty() {
            print_warning(&format!("No {}s found", self.kind));
            return Ok(());
        }
        for (group, members) in &groups {
            println!("{}", style(format!("{} ({})", group, members.len())).bold());
            for module in members {
                match module.display_name.as_deref().filter(|d| *d != module.name) {
                    Some(display) => println!("  #{:<8} {} ({})", module.id, module.name, display),
                    None => println!("  #{:<8} {}", module.id, module.name),
                }
            }
        }
        Ok(())
    }
}

impl PullCommand {
    pub async fn run(&self, ctx: &mut AppContext) -> anyhow::Result<()> {
        let (portal, client) = ctx.portal_client()?;
        let root = self.out.clone().unwrap_or_else(|| ctx.config.output_dir.clone());
        pull_and_report(&client, &root, &portal, self.kind, self.id).await?;
        Ok(())
    }
}

/// Pull one module and print what was written
pub async fn pull_and_report<T>(
    transport: &T,
    root: &Path,
    portal: &str,
    kind: ModuleKind,
    id: u64,
) -> anyhow::Result<PullReport>
where
    T: ApiTransport + ?Sized,
{
    let report = pull_module(transport, root, portal, kind, id).await?;
    print_success(&format!(
        "Pulled {} '{}' into {}",
        kind,
        report.manifest.name,
        report.dir.display()
    ));
    for file in report.files() {
        println!("    {}", file.display());
    }
    Ok(report)
}
