//! Syntax tree command

use super::{outcome, print_diagnostics, read_source, Outcome, OutputFormat};
use anyhow::{Context, Result};
use plamp_parser::{parse, print_node};
use std::path::Path;

pub fn parse_command(input: &Path, format: OutputFormat) -> Result<Outcome> {
    let (text, file_name) = read_source(input)?;
    let parsed = parse(&text, &file_name).context("Parser failed")?;
    let tree = print_node(&parsed.ast, parsed.root);

    match format {
        OutputFormat::Text => {
            println!("{tree}");
            print_diagnostics(&parsed.diagnostics);
        }
        OutputFormat::Json => {
            let report = serde_json::json!({
                "tree": tree,
                "diagnostics": parsed.diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&report).context("Failed to serialize tree")?);
        }
    }

    Ok(outcome(&parsed.diagnostics, false))
}
