#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use output::{OutputMode, resolve_output_mode};
use qhive_core::{BackendKind, ErrorCode, QhiveConfig, load_config};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "qhive: diversified top-K selection",
    long_about = None
)]
struct Cli {
    /// Enable debug logging for qhive crates.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML config file; a missing file means built-in defaults.
    #[arg(long, global = true, value_name = "PATH", default_value = "qhive.toml")]
    config: PathBuf,

    /// QUBO backend used when the QUBO path is enabled.
    #[arg(long, global = true, value_enum)]
    backend: Option<BackendArg>,

    /// Target selection size; overrides `[selection] k`.
    #[arg(long, global = true)]
    k: Option<usize>,

    /// Route selection through the QUBO backend.
    #[arg(long, global = true)]
    use_qaoa: bool,

    /// Output format: pretty, text, or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackendArg {
    Null,
    Exhaustive,
    Anneal,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Null => Self::Null,
            BackendArg::Exhaustive => Self::Exhaustive,
            BackendArg::Anneal => Self::Anneal,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Run the synthetic demo experiment",
        long_about = "Generate a seeded synthetic candidate set, select a diversified subset,\n\
                      and report NDCG@K, intent coverage and average redundancy.",
        after_help = "EXAMPLES:\n    # Default demo (12 candidates, 4 sub-intents, seed 42)\n    qhive run\n\n\
                      # Larger set through the annealing backend\n    qhive run --candidates 40 --k 8 --use-qaoa --backend anneal\n\n\
                      # Machine-readable output\n    qhive run --format json"
    )]
    Run(cmd::run::RunArgs),

    #[command(
        about = "Select from a JSON candidate file",
        long_about = "Read a candidate set (relevance, freshness, embeddings, intents) from JSON\n\
                      and print the selected indices with evaluation metrics.",
        after_help = "EXAMPLES:\n    # Select with defaults\n    qhive select --input candidates.json\n\n\
                      # Exact QUBO solve for a small set\n    qhive select --input candidates.json --use-qaoa --backend exhaustive"
    )]
    Select(cmd::select::SelectArgs),

    #[command(
        about = "Print the effective configuration",
        after_help = "EXAMPLES:\n    # Show defaults merged with qhive.toml\n    qhive config\n\n\
                      # With overrides applied\n    qhive config --k 5 --use-qaoa --backend anneal"
    )]
    Config,
}

impl Cli {
    /// Load the config file and apply flag overrides.
    fn effective_config(&self) -> Result<QhiveConfig> {
        let config = load_config(&self.config).with_context(|| {
            let code = ErrorCode::ConfigParseError;
            format!("[{code}] {}", code.message())
        })?;
        let config = self.apply_overrides(config);
        config.selection.validate().map_err(cmd::coded)?;
        Ok(config)
    }

    fn apply_overrides(&self, mut config: QhiveConfig) -> QhiveConfig {
        if let Some(k) = self.k {
            config.selection.k = k;
        }
        if self.use_qaoa {
            config.selection.use_qaoa = true;
        }
        if let Some(backend) = self.backend {
            config.backend.kind = backend.into();
        }
        config
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("QHIVE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "qhive=debug,info"
        } else {
            "qhive=info,warn"
        })
    });

    let format = env::var("QHIVE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = resolve_output_mode(cli.format);
    let config = cli.effective_config()?;
    debug!(config = %cli.config.display(), ?output, "resolved configuration");
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match &cli.command {
        Commands::Run(args) => cmd::run::run_demo(args, &config, output),
        Commands::Select(args) => cmd::select::run_select(args, &config, output),
        Commands::Config => cmd::config::run_config(&config, output),
    }
}
