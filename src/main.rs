//! rumbridge developer harness entry point

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};

use rumbridge::cli::commands::headers::{run_headers, HeadersOptions};
use rumbridge::cli::commands::simulate::run_simulate;
use rumbridge::observability::{init_logging, LoggingConfig};
use rumbridge::trace::TraceContextInjection;

#[derive(Parser)]
#[command(name = "rumbridge")]
#[command(author, version, about = "Telemetry dispatch core developer harness", long_about = None)]
struct Cli {
    /// Show SDK diagnostics
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the tracing headers injected into a request
    Headers {
        /// Request URL
        url: String,
        /// SDK configuration file
        #[arg(short, long, env = "RUMBRIDGE_CONFIG")]
        config: Option<PathBuf>,
        /// First party host, as PATTERN or PATTERN=TYPE[,TYPE...]
        #[arg(long = "host", value_name = "PATTERN=TYPES")]
        hosts: Vec<String>,
        /// Trace sample rate in percent
        #[arg(long)]
        sample_rate: Option<f64>,
        /// When to inject headers for unsampled traces (all, sampled)
        #[arg(long)]
        injection: Option<TraceContextInjection>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Drive simulated traffic through the work queue
    Simulate {
        /// SDK configuration file
        #[arg(short, long, env = "RUMBRIDGE_CONFIG")]
        config: Option<PathBuf>,
        /// Number of events to produce
        #[arg(short = 'n', long, default_value_t = 1000)]
        messages: usize,
        /// Number of producer threads
        #[arg(short, long, default_value_t = 4)]
        producers: usize,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&LoggingConfig::harness(cli.verbose))?;

    match cli.command {
        Some(Commands::Headers {
            url,
            config,
            hosts,
            sample_rate,
            injection,
            json,
        }) => {
            let options = HeadersOptions {
                config: config.as_deref(),
                hosts: &hosts,
                sample_rate,
                injection,
                json,
            };
            run_headers(&url, &options)?;
        }
        Some(Commands::Simulate {
            config,
            messages,
            producers,
        }) => {
            run_simulate(config.as_deref(), messages, producers)?;
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "rumbridge", &mut std::io::stdout());
        }
        None => {
            println!("rumbridge - telemetry dispatch core developer harness");
            println!("Run 'rumbridge --help' for usage");
        }
    }

    Ok(())
}
