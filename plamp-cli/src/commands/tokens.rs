//! Token listing command

use super::{outcome, print_diagnostics, read_source, Outcome, OutputFormat};
use anyhow::{Context, Result};
use colored::*;
use plamp_parser::{tokenize, Token, TokenKind};
use std::path::Path;
use tracing::debug;

pub fn tokens_command(input: &Path, format: OutputFormat, trivia: bool) -> Result<Outcome> {
    let (text, file_name) = read_source(input)?;
    let (tokens, diagnostics) = tokenize(&text, &file_name);
    let shown: Vec<&Token> = tokens.iter().filter(|t| trivia || !t.is_trivia()).collect();
    debug!(total = tokens.len(), shown = shown.len(), "tokenized");

    match format {
        OutputFormat::Text => {
            for token in &shown {
                println!(
                    "{:>5}:{:<4} {:<12} {}",
                    token.start.row + 1,
                    token.start.column + 1,
                    category(&token.kind).cyan(),
                    token.kind
                );
            }
            print_diagnostics(&diagnostics);
        }
        OutputFormat::Json => {
            let report = serde_json::json!({
                "tokens": shown,
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&report).context("Failed to serialize tokens")?);
        }
    }

    Ok(outcome(&diagnostics, false))
}

fn category(kind: &TokenKind) -> &'static str {
    match kind {
        TokenKind::Word(_) => "word",
        TokenKind::Keyword(_) => "keyword",
        TokenKind::Literal(_) => "literal",
        TokenKind::Operator(_) => "operator",
        TokenKind::Punctuation(_) => "punctuation",
        TokenKind::WhiteSpace | TokenKind::Scope | TokenKind::Comment => "trivia",
        TokenKind::EndOfLine => "line",
        TokenKind::EndOfStatement => "statement",
        TokenKind::EndOfFile => "eof",
    }
}
