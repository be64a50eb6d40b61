//! ChanPak CLI - batch channel packing for game texture maps.
//!
//! This binary scans texture folders, groups source maps into sets, and
//! packs their channels into combined output textures.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

// Use modules from the library crate
use chanpak_cli::commands;

/// ChanPak - Texture Channel Packing Tool
#[derive(Parser)]
#[command(name = "chanpak")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a folder tree and pack texture channels per the configuration
    Pack {
        /// Input folder to process (overrides INPUT_FOLDER from the config)
        input: Option<String>,

        /// Path to the config file (default: ./chanpak.json)
        #[arg(short, long)]
        config: Option<String>,

        /// Show per-file details (rescales, defaults, resolutions)
        #[arg(short, long)]
        verbose: bool,
    },

    /// Check the configuration without touching any files
    Validate {
        /// Path to the config file (default: ./chanpak.json)
        #[arg(short, long)]
        config: Option<String>,

        /// List every packing mode with its channel sources
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Pack {
            input,
            config,
            verbose,
        } => commands::pack::run(input.as_deref(), config.as_deref(), verbose),
        Commands::Validate { config, verbose } => {
            commands::validate::run(config.as_deref(), verbose)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
