//! plamp CLI - tokenize, parse and check plamp modules

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing::{error, info};

mod commands;
mod config;

use commands::*;
use config::PlampConfig;

/// plamp CLI - tokenize, parse and check plamp modules
#[derive(Parser)]
#[command(name = "plamp")]
#[command(about = "plamp language front end")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (text, json), overrides the configuration
    #[arg(short, long, global = true)]
    format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the token sequence of a file
    Tokens {
        /// Input file
        input: PathBuf,
        /// Include whitespace and newline tokens
        #[arg(long)]
        trivia: bool,
    },

    /// Parse a file and print its syntax tree
    Parse {
        /// Input file
        input: PathBuf,
    },

    /// Type check a file
    Check {
        /// Input file
        input: PathBuf,
        /// Host descriptions file, overrides the configuration
        #[arg(short, long)]
        externals: Option<PathBuf>,
        /// Print the rewritten tree with inferred types
        #[arg(long)]
        tree: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;

    // Load configuration
    let config = PlampConfig::load(cli.config.as_deref())?;
    colored::control::set_override(config.output.color);

    let result = OutputFormat::resolve(cli.format.as_deref(), &config).and_then(|format| match cli.command {
        Commands::Tokens { input, trivia } => tokens_command(&input, format, trivia),
        Commands::Parse { input } => parse_command(&input, format),
        Commands::Check { input, externals, tree } => {
            let externals = externals.or_else(|| config.check.externals.clone());
            check_command(&input, format, externals.as_deref(), tree, config.check.warnings_as_errors)
        }
    });

    match result {
        Ok(Outcome::Clean) => {
            info!("Command completed successfully");
            Ok(())
        }
        Ok(Outcome::Failed) => std::process::exit(1),
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(2);
        }
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
