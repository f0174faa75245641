//! plamp Parser
//!
//! This crate turns plamp source text into a token sequence, an AST arena and
//! a node-keyed span table. Lexical and syntax problems are collected as
//! diagnostics; only internal invariant violations are returned as errors.

pub mod ast;
pub mod context;
pub mod cursor;
pub mod diagnostic;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod position;
pub mod printer;
pub mod symbol;
pub mod symbol_table;
pub mod token;
pub mod types;

// Re-export core types
pub use ast::{AssignOp, Ast, BinaryOp, ModulePath, Node, NodeId, NodeKind, OperatorCategory, UnaryOp};
pub use context::ParsingContext;
pub use cursor::{Cursor, TokenSequence};
pub use diagnostic::{Diagnostic, DiagnosticKind, Level};
pub use error::{InternalError, Result};
pub use lexer::tokenize;
pub use parser::Parser;
pub use position::FilePosition;
pub use printer::{print_node, print_node_typed};
pub use symbol::Symbol;
pub use symbol_table::SymbolTable;
pub use token::{LiteralValue, Token, TokenKind};
pub use types::PlampType;

use tracing::debug;

/// Everything parsing one source file produces
#[derive(Debug)]
pub struct ParseOutput {
    pub tokens: TokenSequence,
    pub ast: Ast,
    pub root: NodeId,
    pub symbols: SymbolTable,
    /// Tokenizer diagnostics followed by parser diagnostics
    pub diagnostics: Vec<Diagnostic>,
    pub file_name: String,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Tokenize and parse a whole source file
pub fn parse(text: &str, file_name: &str) -> Result<ParseOutput> {
    let (tokens, mut diagnostics) = tokenize(text, file_name);
    let mut parser = Parser::new();
    let mut ctx = ParsingContext::new(&tokens, file_name);
    let root = parser.parse_root(&mut ctx)?;
    diagnostics.extend(ctx.into_diagnostics());
    debug!(file = file_name, diagnostics = diagnostics.len(), "parsed source");

    let (ast, symbols) = parser.into_parts();
    Ok(ParseOutput {
        tokens,
        ast,
        root,
        symbols,
        diagnostics,
        file_name: file_name.to_string(),
    })
}

/// A single parsed expression
#[derive(Debug)]
pub struct ExpressionOutput {
    pub ast: Ast,
    /// `None` when no expression could be parsed
    pub root: Option<NodeId>,
    pub symbols: SymbolTable,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse `text` as one expression; anything after it is reported
pub fn parse_expression(text: &str) -> Result<ExpressionOutput> {
    const FILE_NAME: &str = "<expression>";
    let (tokens, mut diagnostics) = tokenize(text, FILE_NAME);
    let mut parser = Parser::new();
    let mut ctx = ParsingContext::new(&tokens, FILE_NAME);
    ctx.skip_lines();
    let root = parser.parse_expression_public(&mut ctx)?;
    if root.is_some() {
        ctx.skip_lines();
        if !ctx.is_at_end() {
            ctx.report_here(DiagnosticKind::ExpectedEndOfStatement);
        }
    }
    diagnostics.extend(ctx.into_diagnostics());

    let (ast, symbols) = parser.into_parts();
    Ok(ExpressionOutput { ast, root, symbols, diagnostics })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_collects_all_diagnostics() {
        let output = parse("module m;\nfn f() { x := \"open }", "m.plp").unwrap();
        let codes: Vec<_> = output.diagnostics.iter().map(|d| d.code()).collect();
        assert_eq!(codes, vec!["TOK1001", "PRS1001"]);
        assert!(output.has_errors());
    }

    #[test]
    fn test_parse_expression() {
        let output = parse_expression("1 + 2 * 3").unwrap();
        assert!(output.diagnostics.is_empty());
        assert_eq!(print_node(&output.ast, output.root.unwrap()), "Plus(1i, Multiply(2i, 3i))");
    }

    #[test]
    fn test_parse_expression_trailing_tokens() {
        let output = parse_expression("1 2").unwrap();
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].code(), "PRS1010");
    }
}
