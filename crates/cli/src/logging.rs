//! Logging setup with a runtime verbose toggle

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

const CRATES: [&str; 5] = ["cli", "gateway", "runner", "modules", "shared"];

/// Filter directives for the given verbosity
pub fn directives(verbose: bool) -> String {
    if !verbose {
        return "warn".to_string();
    }
    let mut directives = vec!["warn".to_string()];
    directives.extend(CRATES.iter().map(|c| format!("{}=debug", c)));
    directives.join(",")
}

/// Handle for switching verbose logging on and off
pub struct LogControl {
    handle: reload::Handle<EnvFilter, Registry>,
    env_override: bool,
}

impl LogControl {
    /// Install the global subscriber; `RUST_LOG` wins over `verbose` when set
    pub fn init(verbose: bool) -> Self {
        let (filter, env_override) = match EnvFilter::try_from_default_env() {
            Ok(filter) => (filter, true),
            Err(_) => (EnvFilter::new(directives(verbose)), false),
        };
        let (filter, handle) = reload::Layer::new(filter);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .init();

        Self {
            handle,
            env_override,
        }
    }

    pub fn set_verbose(&self, verbose: bool) {
        if self.env_override {
            return;
        }
        if let Err(e) = self.handle.reload(EnvFilter::new(directives(verbose))) {
            eprintln!("Failed to change log level: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_directives() {
        assert_eq!(directives(false), "warn");
    }

    #[test]
    fn test_verbose_directives() {
        let d = directives(true);
        assert!(d.starts_with("warn,"));
        assert!(d.contains("runner=debug"));
        assert!(d.contains("gateway=debug"));
        assert!(EnvFilter::try_new(&d).is_ok());
    }
}
