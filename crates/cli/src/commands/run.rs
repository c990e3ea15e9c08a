//! lmscript run command

use clap::Args;
use console::style;
use gateway::ApiTransport;
use indicatif::{ProgressBar, ProgressStyle};
use runner::{ExecutionOutcome, ExecutionState, PollPolicy, ScriptCommand, ScriptExecutor};
use shared::ExecutionTarget;
use std::path::PathBuf;
use std::time::Duration;

use super::print_warning;
use crate::context::AppContext;

#[derive(Debug, Args)]
pub struct RunCommand {
    /// Script file (.groovy or .ps1)
    pub file: PathBuf,
}

impl RunCommand {
    pub async fn run(&self, ctx: &mut AppContext) -> anyhow::Result<()> {
        // Local preconditions first; nothing is sent when they fail
        let target = ctx.session.require_target()?;
        let command = ScriptCommand::from_file(&self.file, target.device_id)?;
        let (_, client) = ctx.portal_client()?;

        let outcome = run_script(&client, target, &command, PollPolicy::default()).await?;
        print_outcome(&outcome);
        Ok(())
    }
}

/// Execute `command` on the target, showing a spinner while the session is polled
pub async fn run_script<T>(
    transport: &T,
    target: ExecutionTarget,
    command: &ScriptCommand,
    policy: PollPolicy,
) -> anyhow::Result<ExecutionOutcome>
where
    T: ApiTransport + ?Sized,
{
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message(format!(
        "Submitting {:?} script to collector #{}",
        command.language(),
        target.collector_id
    ));

    let executor = ScriptExecutor::new(transport).with_policy(policy);
    let result = executor
        .execute_with(target, command, |state| match state {
            ExecutionState::Submitted { session_id } => {
                spinner.set_message(format!("Session {} submitted", session_id))
            }
            ExecutionState::Polling {
                attempt,
                max_attempts,
            } => spinner.set_message(format!("Waiting for result ({}/{})", attempt, max_attempts)),
            _ => {}
        })
        .await;

    spinner.finish_and_clear();
    Ok(result?)
}

pub fn print_outcome(outcome: &ExecutionOutcome) {
    match outcome {
        ExecutionOutcome::Completed(result) => {
            let code = result
                .return_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "null".to_string());
            let marker = if result.return_code.unwrap_or(0) == 0 {
                style("✓").green().bold()
            } else {
                style("✗").red().bold()
            };
            println!("{} Script returned {}", marker, code);
            if !result.output.is_empty() {
                print!("{}", result.output);
                if !result.output.ends_with('\n') {
                    println!();
                }
            }
        }
        ExecutionOutcome::Cancelled { message } => print_warning(message),
        ExecutionOutcome::TimedOut {
            attempts,
            last_error,
        } => {
            print_warning(&format!(
                "No result after {} polls; the script may still be running on the collector",
                attempts
            ));
            if let Some(error) = last_error {
                print_warning(&format!("Last poll error: {}", error));
            }
        }
    }
}
