//! Command implementations for the plamp CLI

pub mod check;
pub mod parse;
pub mod tokens;

// Re-export command functions
pub use check::check_command;
pub use parse::parse_command;
pub use tokens::tokens_command;

use crate::config::PlampConfig;
use anyhow::{bail, Context, Result};
use colored::*;
use plamp_parser::{Diagnostic, Level};
use std::fs;
use std::path::Path;

/// How a command finished when it did not fail outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    /// Diagnostics that fail the command were reported
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Parse format from string
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "human" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => bail!("Unknown output format: {}", s),
        }
    }

    /// The command line flag wins over the configuration file
    pub fn resolve(flag: Option<&str>, config: &PlampConfig) -> Result<Self> {
        Self::from_str(flag.unwrap_or(&config.output.format))
    }
}

/// Read a source file, returning its text and the name used in diagnostics
pub fn read_source(path: &Path) -> Result<(String, String)> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file: {}", path.display()))?;
    Ok((text, path.display().to_string()))
}

pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        let level = match diagnostic.level {
            Level::Error => "error".red().bold(),
            Level::Warning => "warning".yellow().bold(),
            Level::Info => "info".cyan(),
        };
        println!(
            "{}:{}: {}[{}]: {}",
            diagnostic.file_name,
            diagnostic.start,
            level,
            diagnostic.code().dimmed(),
            diagnostic.message()
        );
    }
}

pub fn print_summary(diagnostics: &[Diagnostic]) {
    let count = |level| diagnostics.iter().filter(|d| d.level == level).count();
    let (errors, warnings, infos) = (count(Level::Error), count(Level::Warning), count(Level::Info));
    if errors == 0 && warnings == 0 {
        println!("{} No problems found", "✓".green());
    } else {
        println!(
            "{} {} error(s), {} warning(s), {} info",
            if errors > 0 { "✗".red() } else { "!".yellow() },
            errors,
            warnings,
            infos
        );
    }
}

/// Whether `diagnostics` fail the command
pub fn outcome(diagnostics: &[Diagnostic], warnings_as_errors: bool) -> Outcome {
    let failing = diagnostics
        .iter()
        .any(|d| d.level == Level::Error || (warnings_as_errors && d.level == Level::Warning));
    if failing {
        Outcome::Failed
    } else {
        Outcome::Clean
    }
}
