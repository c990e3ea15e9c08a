//! lmscript status / verbose commands

use clap::{Args, ValueEnum};
use console::style;

use super::print_success;
use crate::context::AppContext;
use crate::logging::LogControl;

#[derive(Debug, Args)]
pub struct StatusCommand {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Debug, Args)]
pub struct VerboseCommand {
    /// Turn verbose logging on or off
    pub state: Toggle,
}

impl StatusCommand {
    pub async fn run(&self, ctx: &mut AppContext) -> anyhow::Result<()> {
        print_status(ctx);
        Ok(())
    }
}

impl VerboseCommand {
    pub async fn run(&self, ctx: &mut AppContext, log: Option<&LogControl>) -> anyhow::Result<()> {
        let verbose = self.state == Toggle::On;
        set_verbose(ctx, log, verbose)?;
        print_success(&format!(
            "Verbose logging {}",
            if verbose { "on" } else { "off" }
        ));
        Ok(())
    }
}

/// Persist the verbose flag and apply it to the live subscriber
pub fn set_verbose(ctx: &mut AppContext, log: Option<&LogControl>, verbose: bool) -> anyhow::Result<()> {
    ctx.session.verbose = verbose;
    ctx.save()?;
    if let Some(log) = log {
        log.set_verbose(verbose);
    }
    Ok(())
}

pub fn print_status(ctx: &AppContext) {
    let unset = || style("(none)").dim().to_string();
    let session = &ctx.session;

    println!("{}", style("Session").bold());
    println!(
        "  Credentials: {}",
        session
            .credentials_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(unset)
    );
    println!("  Portal:      {}", session.portal.clone().unwrap_or_else(unset));
    println!(
        "  Collector:   {}",
        session.collector.as_ref().map(|c| c.label.clone()).unwrap_or_else(unset)
    );
    println!(
        "  Device:      {}",
        session.device.as_ref().map(|d| d.label.clone()).unwrap_or_else(unset)
    );
    println!("  Verbose:     {}", if session.verbose { "on" } else { "off" });

    println!("{}", style("Config").bold());
    println!("  API base:    {}", ctx.config.api_base_template);
    println!("  API version: {}", ctx.config.api_version);
    println!("  Page size:   {}", ctx.config.page_size);
    println!("  Output dir:  {}", ctx.config.output_dir.display());
}
