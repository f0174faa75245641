//! Type checking command

use super::{outcome, print_diagnostics, print_summary, read_source, Outcome, OutputFormat};
use anyhow::{Context, Result};
use plamp_checker::{check_source, ExternalSymbols, HostDescriptions, HostSymbols, NoExternalSymbols};
use plamp_parser::print_node_typed;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub fn check_command(
    input: &Path,
    format: OutputFormat,
    externals: Option<&Path>,
    tree: bool,
    warnings_as_errors: bool,
) -> Result<Outcome> {
    let host = externals.map(load_host).transpose()?;
    let externals: &dyn ExternalSymbols = match &host {
        Some(host) => host,
        None => &NoExternalSymbols,
    };

    let (text, file_name) = read_source(input)?;
    let checked = check_source(&text, &file_name, externals).context("Checker failed")?;
    info!(file = %file_name, diagnostics = checked.diagnostics.len(), "checked");

    match format {
        OutputFormat::Text => {
            if tree {
                println!("{}", print_node_typed(&checked.ast, checked.root));
            }
            print_diagnostics(&checked.diagnostics);
            print_summary(&checked.diagnostics);
        }
        OutputFormat::Json => {
            let mut report = serde_json::json!({ "diagnostics": checked.diagnostics });
            if tree {
                report["tree"] = print_node_typed(&checked.ast, checked.root).into();
            }
            println!("{}", serde_json::to_string_pretty(&report).context("Failed to serialize diagnostics")?);
        }
    }

    let result = outcome(&checked.diagnostics, warnings_as_errors);
    if result == Outcome::Failed && !checked.has_errors() {
        warn!(file = %file_name, "warnings are treated as errors");
    }
    Ok(result)
}

fn load_host(path: &Path) -> Result<HostSymbols> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read host descriptions: {}", path.display()))?;
    let descriptions = HostDescriptions::from_toml(&content)
        .with_context(|| format!("Failed to parse host descriptions: {}", path.display()))?;
    descriptions
        .resolve()
        .with_context(|| format!("Invalid host descriptions: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_host() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("host.toml");
        fs::write(&path, "types = [\"Canvas\"]\n").unwrap();
        let host = load_host(&path).unwrap();
        assert!(host.resolve_type(plamp_parser::Symbol::intern("Canvas")).is_some());
    }

    #[test]
    fn test_check_command_outcome() {
        let temp_dir = TempDir::new().unwrap();
        let clean = temp_dir.path().join("clean.plp");
        fs::write(&clean, "module m;\nfn int one() { return 1; }\n").unwrap();
        assert_eq!(check_command(&clean, OutputFormat::Json, None, true, false).unwrap(), Outcome::Clean);

        let broken = temp_dir.path().join("broken.plp");
        fs::write(&broken, "fn f() {}\n").unwrap();
        assert_eq!(check_command(&broken, OutputFormat::Text, None, false, false).unwrap(), Outcome::Failed);
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(check_command(&temp_dir.path().join("none.plp"), OutputFormat::Text, None, false, false).is_err());
    }
}
