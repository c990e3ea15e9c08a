//! Interactive browser mode
//!
//! Walks the active portal as a tree (collector groups, collectors, devices
//! and the module catalog) and acts on the current node.

use console::style;
use gateway::ApiTransport;
use runner::{PollPolicy, ScriptCommand};
use shared::NavNode;
use std::io::{self, Write};
use std::path::Path;

use crate::commands::module::pull_and_report;
use crate::commands::portal::{portal_names, select_portal};
use crate::commands::run::{print_outcome, run_script};
use crate::commands::status::{print_status, set_verbose};
use crate::commands::{active_marker, print_success, print_warning};
use crate::context::AppContext;
use crate::logging::LogControl;
use crate::navigator::TreeNavigator;

/// Interactive CLI for browsing a portal
pub struct InteractiveCli {
    ctx: AppContext,
    navigator: Option<TreeNavigator>,
    transport: Option<Box<dyn ApiTransport>>,
    log: Option<LogControl>,
    poll_policy: PollPolicy,
}

impl InteractiveCli {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            navigator: None,
            transport: None,
            log: None,
            poll_policy: PollPolicy::default(),
        }
    }

    pub fn with_log(mut self, log: LogControl) -> Self {
        self.log = Some(log);
        self
    }

    /// Use `transport` instead of a client built from the credentials file
    pub fn with_transport(mut self, transport: impl ApiTransport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll_policy = policy;
        self
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> anyhow::Result<()> {
        println!("lmscript interactive mode");
        println!("Type /help for commands, /quit to exit");
        println!();

        loop {
            print!("{} > ", style(format!("[{}]", self.prompt())).cyan());
            io::stdout().flush()?;

            let mut input = String::new();
            if io::stdin().read_line(&mut input)? == 0 {
                break;
            }
            let input = input.trim();

            if input.is_empty() {
                continue;
            }

            if input.starts_with('/') {
                match self.handle_command(input).await {
                    Ok(true) => break,
                    Ok(false) => continue,
                    Err(e) => {
                        println!("{} {:#}", style("Error:").red().bold(), e);
                        continue;
                    }
                }
            }

            println!("Commands start with '/'. Type /help for the list");
        }

        Ok(())
    }

    fn prompt(&self) -> String {
        match (&self.navigator, self.ctx.session.portal.as_deref()) {
            (Some(navigator), _) => navigator.breadcrumb(),
            (None, Some(portal)) => portal.to_string(),
            (None, None) => "no portal".to_string(),
        }
    }

    /// Navigator and transport for the active portal, created on first use
    fn connect(&mut self) -> anyhow::Result<(&mut TreeNavigator, &dyn ApiTransport)> {
        if self.transport.is_none() {
            let (_, client) = self.ctx.portal_client()?;
            self.transport = Some(Box::new(client));
        }
        if self.navigator.is_none() {
            let portal = self.ctx.session.require_portal()?.to_string();
            self.navigator = Some(TreeNavigator::new(portal, self.ctx.config.page_size));
        }
        match (self.navigator.as_mut(), self.transport.as_deref()) {
            (Some(navigator), Some(transport)) => Ok((navigator, transport)),
            _ => anyhow::bail!("Not connected to a portal"),
        }
    }

    async fn handle_command(&mut self, input: &str) -> anyhow::Result<bool> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");
        let arg = parts.get(1).copied();

        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Goodbye!");
                return Ok(true);
            }
            "/help" | "/h" => print_help(),
            "/portals" => {
                for name in portal_names(&self.ctx)? {
                    let active = self.ctx.session.portal.as_deref() == Some(name.as_str());
                    println!("  {} {}", active_marker(active), name);
                }
            }
            "/portal" => match arg {
                Some(name) => {
                    select_portal(&mut self.ctx, name)?;
                    self.navigator = None;
                    self.transport = None;
                    print_success(&format!("Active portal: {}", name));
                }
                None => println!("Usage: /portal <name>"),
            },
            "/ls" => self.list().await?,
            "/cd" => match arg {
                Some("..") => self.up(),
                Some(index) => self.enter(index).await?,
                None => println!("Usage: /cd <number> | /cd .."),
            },
            "/up" => self.up(),
            "/use" => self.use_current()?,
            "/pull" => self.pull_current().await?,
            "/run" => match arg {
                Some(file) => self.run_file(Path::new(file)).await?,
                None => println!("Usage: /run <script file>"),
            },
            "/refresh" => {
                if let Some(navigator) = self.navigator.as_mut() {
                    navigator.refresh();
                }
                print_success("Cache cleared");
            }
            "/verbose" => {
                let verbose = match arg {
                    Some("on") => true,
                    Some("off") => false,
                    _ => !self.ctx.session.verbose,
                };
                set_verbose(&mut self.ctx, self.log.as_ref(), verbose)?;
                println!("Verbose logging {}", if verbose { "on" } else { "off" });
            }
            "/status" => print_status(&self.ctx),
            _ => {
                println!("Unknown command: {}", cmd);
            }
        }

        Ok(false)
    }

    async fn list(&mut self) -> anyhow::Result<()> {
        let (navigator, transport) = self.connect()?;
        let children = navigator.children(transport).await?;
        println!("{}", style(navigator.breadcrumb()).bold());
        if children.is_empty() {
            println!("  (empty)");
        }
        for (i, child) in children.iter().enumerate() {
            let suffix = if child.is_leaf() { "" } else { "/" };
            println!("  [{}] {}{}", i, child.label(), suffix);
        }
        Ok(())
    }

    async fn enter(&mut self, index: &str) -> anyhow::Result<()> {
        let index: usize = index
            .parse()
            .map_err(|_| anyhow::anyhow!("'{}' is not an entry number", index))?;
        let (navigator, transport) = self.connect()?;
        match navigator.enter(transport, index).await? {
            Some(node) => println!("{}", node.label()),
            None => print_warning(&format!("No entry [{}] here; /ls lists entries", index)),
        }
        Ok(())
    }

    fn up(&mut self) {
        if let Some(navigator) = self.navigator.as_mut() {
            navigator.up();
        }
    }

    /// Make the current collector or device the active one
    fn use_current(&mut self) -> anyhow::Result<()> {
        let Some(navigator) = self.navigator.as_ref() else {
            print_warning("Nothing selected; browse with /ls and /cd first");
            return Ok(());
        };

        match navigator.current() {
            NavNode::Collector { collector, .. } => {
                let collector = collector.clone();
                self.ctx.session.select_collector(&collector);
                print_success(&format!("Active collector: {}", collector.label()));
            }
            NavNode::Device { device, .. } => {
                let device = device.clone();
                if let Some(collector) = navigator.enclosing_collector().cloned() {
                    self.ctx.session.select_collector(&collector);
                }
                self.ctx.session.select_device(&device);
                print_success(&format!("Active device: {}", device.label()));
            }
            other => {
                print_warning(&format!("'{}' cannot be selected", other.label()));
                return Ok(());
            }
        }
        self.ctx.save()?;
        Ok(())
    }

    async fn pull_current(&mut self) -> anyhow::Result<()> {
        let root = self.ctx.config.output_dir.clone();
        let (navigator, transport) = self.connect()?;
        match navigator.current().clone() {
            NavNode::Module {
                portal,
                kind,
                module,
            } => {
                pull_and_report(transport, &root, &portal, kind, module.id).await?;
            }
            other => print_warning(&format!("'{}' is not a module", other.label())),
        }
        Ok(())
    }

    async fn run_file(&mut self, file: &Path) -> anyhow::Result<()> {
        let target = self.ctx.session.require_target()?;
        let command = ScriptCommand::from_file(file, target.device_id)?;
        let policy = self.poll_policy;
        let (_, transport) = self.connect()?;

        let outcome = run_script(transport, target, &command, policy).await?;
        print_outcome(&outcome);
        Ok(())
    }
}

fn print_help() {
    println!("Commands:");
    println!("  /ls              - List entries under the current node");
    println!("  /cd <n> | ..     - Enter entry n, or go up");
    println!("  /up              - Go to the parent node");
    println!("  /use             - Make the current collector or device active");
    println!("  /pull            - Pull the current module to local files");
    println!("  /run <file>      - Run a script on the active device");
    println!("  /refresh         - Forget cached listings");
    println!("  /portals         - List portals");
    println!("  /portal <name>   - Switch portal");
    println!("  /verbose [on|off] - Toggle verbose logging");
    println!("  /status          - Show current selection");
    println!("  /quit            - Exit");
}
