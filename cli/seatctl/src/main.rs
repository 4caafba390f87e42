//! seatctl - run seat allocation scripts
//!
//! Reads one command per line from a script file (or stdin) and writes the
//! result of each command to an output file (or stdout).

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod error;

use seatctl::{run_script, Config, Endpoint, OutputFormat};

/// Run a seat allocation script.
#[derive(Debug, Parser)]
#[command(name = "seatctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Script to run, or `-` for stdin.
    input: PathBuf,

    /// Where to write results, or `-` for stdout.
    ///
    /// Defaults to the input path with `.txt` replaced by `_output.txt`.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (text or json).
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let mut config = Config::from_env()?;
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        Ok(config)
    }

    fn run(self) -> Result<()> {
        let config = self.config()?;
        init_tracing(&config);

        let input = Endpoint::from_arg(&self.input);
        let output = match &self.output {
            Some(path) => Endpoint::from_arg(path),
            None => Endpoint::default_output_for(&input),
        };

        let summary = run_script(&input, &output, config.format)?;
        tracing::debug!(?summary, "done");
        Ok(())
    }
}

fn init_tracing(config: &Config) {
    // Prefer RUST_LOG, fall back to SEATLINE_LOG_LEVEL / --log-level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into());
    let registry = tracing_subscriber::registry().with(filter);

    if config.log_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = cli.run() {
        error::print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
