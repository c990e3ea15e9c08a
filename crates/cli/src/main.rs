//! lmscript - run collector scripts and pull modules from a monitoring portal
//!
//! Usage:
//!   lmscript                          - Start the interactive browser
//!   lmscript credentials use <file>   - Select a credentials file
//!   lmscript portal use <name>        - Select a portal
//!   lmscript collector use [id]       - Select a collector
//!   lmscript device use [id]          - Select a device
//!   lmscript run <script>             - Run a script on the selected device
//!   lmscript pull <kind> <id>         - Pull a module to local files

use clap::{Parser, Subcommand};
use cli::commands::{
    CollectorCommand, CollectorsCommand, CredentialsCommand, DeviceCommand, DevicesCommand,
    ModulesCommand, PortalCommand, PullCommand, RunCommand, StatusCommand, VerboseCommand,
};
use cli::context::{AppContext, STATE_DIR};
use cli::interactive::InteractiveCli;
use cli::logging::LogControl;
use console::style;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lmscript")]
#[command(about = "Run collector scripts and pull modules from a monitoring portal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbose logging for this invocation
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to <state-dir>/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the session and config
    #[arg(long, global = true, default_value = STATE_DIR)]
    state_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Select or inspect the credentials file
    Credentials(CredentialsCommand),
    /// Select or list portals
    Portal(PortalCommand),
    /// List collectors
    Collectors(CollectorsCommand),
    /// Select a collector
    Collector(CollectorCommand),
    /// List devices of the active collector
    Devices(DevicesCommand),
    /// Select a device
    Device(DeviceCommand),
    /// List modules of one kind, grouped
    Modules(ModulesCommand),
    /// Pull a module definition and its scripts
    Pull(PullCommand),
    /// Run a script on the active device
    Run(RunCommand),
    /// Show the current session
    Status(StatusCommand),
    /// Turn verbose logging on or off
    Verbose(VerboseCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut ctx = AppContext::load(&cli.state_dir, cli.config.as_deref())?;
    let log = LogControl::init(cli.verbose || ctx.session.verbose);

    match cli.command {
        Some(Commands::Credentials(cmd)) => cmd.run(&mut ctx).await,
        Some(Commands::Portal(cmd)) => cmd.run(&mut ctx).await,
        Some(Commands::Collectors(cmd)) => cmd.run(&mut ctx).await,
        Some(Commands::Collector(cmd)) => cmd.run(&mut ctx).await,
        Some(Commands::Devices(cmd)) => cmd.run(&mut ctx).await,
        Some(Commands::Device(cmd)) => cmd.run(&mut ctx).await,
        Some(Commands::Modules(cmd)) => cmd.run(&mut ctx).await,
        Some(Commands::Pull(cmd)) => cmd.run(&mut ctx).await,
        Some(Commands::Run(cmd)) => cmd.run(&mut ctx).await,
        Some(Commands::Status(cmd)) => cmd.run(&mut ctx).await,
        Some(Commands::Verbose(cmd)) => cmd.run(&mut ctx, Some(&log)).await,
        None => {
            // No subcommand - start the interactive browser
            let mut interactive = InteractiveCli::new(ctx).with_log(log);
            interactive.run().await
        }
    }
}
