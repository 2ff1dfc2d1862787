pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use self::commands::{generate, inspect};

#[derive(Parser)]
#[command(name = "fakt")]
#[command(about = "Generates configurable fakes for annotated Kotlin declarations", version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate fake implementations for annotated declarations
    Generate {
        /// Kotlin source files or directories to scan
        #[arg(short, long, required = true, num_args = 1..)]
        source: Vec<PathBuf>,

        /// Directory the generated sources are written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Comma-separated annotation FQNs replacing the default set
        #[arg(long)]
        fake_annotations: Option<String>,

        /// Metadata cache to consume before analysis
        #[arg(long)]
        metadata_cache_input: Option<PathBuf>,

        /// Metadata cache to produce after analysis
        #[arg(long)]
        metadata_cache_output: Option<PathBuf>,

        /// Report verbosity: QUIET, INFO, DEBUG or TRACE
        #[arg(long)]
        log_level: Option<String>,

        /// Shortcut for --log-level DEBUG
        #[arg(long, default_value_t = false)]
        debug: bool,

        /// Raw plugin options as key=value pairs (repeatable)
        #[arg(short = 'P', long = "plugin-option")]
        plugin_option: Vec<String>,
    },

    /// Run the front-end only and dump extracted metadata as JSON
    Inspect {
        /// Kotlin source files or directories to scan
        #[arg(short, long, num_args = 0..)]
        source: Vec<PathBuf>,

        /// Inspect a metadata cache file instead of parsing sources
        #[arg(long)]
        cache: Option<PathBuf>,

        /// Comma-separated annotation FQNs replacing the default set
        #[arg(long)]
        fake_annotations: Option<String>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            source,
            output_dir,
            fake_annotations,
            metadata_cache_input,
            metadata_cache_output,
            log_level,
            debug,
            plugin_option,
        } => generate::run(generate::GenerateArgs {
            source,
            output_dir,
            fake_annotations,
            metadata_cache_input,
            metadata_cache_output,
            log_level,
            debug,
            plugin_option,
        }),
        Commands::Inspect {
            source,
            cache,
            fake_annotations,
        } => inspect::run(source, cache, fake_annotations),
    }
}
