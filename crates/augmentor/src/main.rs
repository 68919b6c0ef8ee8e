//! Augmentor CLI - Expand one example image into a zipped batch of augmentations.
//!
//! Augmentor decodes a single JPEG or PNG, applies randomized rotation, flip,
//! brightness and contrast (plus optional shift, shear and zoom) to produce N
//! variants, and writes them as `augmented_<i>.jpg` entries in a ZIP archive.
//!
//! # Usage
//!
//! ```bash
//! # Generate 20 variants into ./augmented_images.zip
//! augmentor generate photo.jpg
//!
//! # Reproducible run with the extended preset
//! augmentor generate photo.jpg -n 50 --seed 42 --preset extended -o out.zip
//!
//! # View configuration
//! augmentor config show
//! ```

use std::process::ExitCode;

use augmentor_core::{Config, PipelineError};
use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Augmentor - Expand one example image into a zipped batch of augmentations.
#[derive(Parser, Debug)]
#[command(name = "augmentor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an augmented archive from one image
    Generate(cli::generate::GenerateArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `augmentor config path`."
            );
            Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Augmentor v{}", augmentor_core::VERSION);

    match run(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::from(exit_status(&e))
        }
    }
}

/// Drive one command to completion on a fresh runtime.
fn run(command: Commands, config: Config) -> anyhow::Result<()> {
    let runtime = build_runtime()?;
    let result = runtime.block_on(async move {
        match command {
            Commands::Generate(args) => cli::generate::execute(args, config).await,
            Commands::Config(args) => cli::config::execute(args).await,
        }
    });

    // A generation abandoned on timeout can still hold a blocking thread.
    // Don't join it on the way out.
    runtime.shutdown_background();
    result
}

fn build_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}

/// Exit status for a failed command: 2 when the input was rejected, 1 otherwise.
fn exit_status(err: &anyhow::Error) -> u8 {
    let rejected_input = err.chain().any(|cause| {
        cause
            .downcast_ref::<PipelineError>()
            .is_some_and(PipelineError::is_input_error)
    });
    if rejected_input {
        2
    } else {
        1
    }
}
