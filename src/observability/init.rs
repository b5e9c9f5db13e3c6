//! Diagnostics subscriber
//!
//! SDK diagnostics are written to stderr. A host game usually owns stdout,
//! and the harness prints its reports and JSON there. Nothing here reaches
//! the backend; SDK errors bound for the backend go through the telemetry
//! processor instead.
//!
//! Hosts that already install their own subscriber should not call
//! [`init_logging`]: every SDK event carries a `rumbridge` target and is
//! picked up by whatever subscriber is in place.

use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// How SDK diagnostics are filtered and rendered.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level for `rumbridge` targets when no directive is given
    pub sdk_level: Level,
    /// Level for every other target when no directive is given
    pub host_level: Level,
    pub source_locations: bool,
    pub ansi: bool,
    /// One line per event
    pub compact: bool,
    /// Filter directive; takes precedence over `RUST_LOG`
    pub directive: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::harness(false)
    }
}

impl LoggingConfig {
    /// Harness binary: warnings only, SDK debug output when `verbose`.
    pub fn harness(verbose: bool) -> Self {
        Self {
            sdk_level: if verbose { Level::DEBUG } else { Level::WARN },
            host_level: Level::WARN,
            source_locations: verbose,
            ansi: true,
            compact: !verbose,
            directive: None,
        }
    }

    /// Embedded in a game that has no subscriber of its own.
    ///
    /// Game log files and in-engine consoles rarely render ANSI escapes.
    pub fn embedded() -> Self {
        Self {
            sdk_level: Level::INFO,
            host_level: Level::WARN,
            source_locations: false,
            ansi: false,
            compact: true,
            directive: None,
        }
    }

    fn default_directive(&self) -> String {
        format!(
            "{},rumbridge={}",
            self.host_level.as_str().to_ascii_lowercase(),
            self.sdk_level.as_str().to_ascii_lowercase()
        )
    }

    fn env_filter(&self) -> anyhow::Result<EnvFilter> {
        let directive = match &self.directive {
            Some(directive) => directive.clone(),
            None => match std::env::var(EnvFilter::DEFAULT_ENV) {
                Ok(from_env) if !from_env.trim().is_empty() => from_env,
                _ => self.default_directive(),
            },
        };
        Ok(EnvFilter::try_new(directive)?)
    }
}

/// Install the global subscriber.
///
/// Fails if the filter directive is invalid or the process already has a
/// global subscriber.
///
/// ```rust,ignore
/// use rumbridge::observability::{init_logging, LoggingConfig};
///
/// init_logging(&LoggingConfig::embedded())?;
/// ```
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = config.env_filter()?;

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi)
        .with_thread_names(true)
        .with_file(config.source_locations)
        .with_line_number(config.source_locations);
    let layer = if config.compact {
        layer.compact().boxed()
    } else {
        layer.boxed()
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
