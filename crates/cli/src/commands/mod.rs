//! CLI Commands

pub mod credentials;
pub mod inventory;
pub mod module;
pub mod portal;
pub mod run;
pub mod status;

pub use credentials::CredentialsCommand;
pub use inventory::{CollectorCommand, CollectorsCommand, DeviceCommand, DevicesCommand};
pub use module::{ModulesCommand, PullCommand};
pub use portal::PortalCommand;
pub use run::RunCommand;
pub use status::{StatusCommand, VerboseCommand};

use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;

/// Let the user pick one of `labels`; `None` when the prompt is dismissed
pub(crate) fn pick(prompt: &str, labels: &[String]) -> anyhow::Result<Option<usize>> {
    if labels.is_empty() {
        return Ok(None);
    }
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(labels)
        .default(0)
        .interact_opt()?;
    Ok(choice)
}

pub(crate) fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

pub(crate) fn print_warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), style(message).yellow());
}

/// `*` for the active entry, blank otherwise
pub(crate) fn active_marker(active: bool) -> console::StyledObject<&'static str> {
    if active {
        style("*").green().bold()
    } else {
        style(" ")
    }
}
