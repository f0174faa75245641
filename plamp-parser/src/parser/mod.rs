//! Parser for plamp
//!
//! Recursive descent for declarations and statements, precedence climbing
//! (Pratt) for expressions. Every production has the shape
//! `try_parse_x(&mut self, ctx) -> Result<Option<NodeId>>`: `Ok(None)` is a
//! syntax failure already reported into `ctx`, `Err` is an internal error.
//!
//! Speculative productions run in a forked context and are merged only on
//! success. The arena and the symbol table are shared by every fork, so
//! nodes built on an abandoned branch stay allocated but unreachable.

mod declarations;
mod expressions;
mod statements;
mod types;

use crate::ast::{Ast, NodeId, NodeKind};
use crate::context::ParsingContext;
use crate::error::Result;
use crate::position::FilePosition;
use crate::symbol_table::SymbolTable;

/// Parser state: the node arena and the span table it fills
#[derive(Debug, Default)]
pub struct Parser {
    ast: Ast,
    symbols: SymbolTable,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn into_parts(self) -> (Ast, SymbolTable) {
        (self.ast, self.symbols)
    }

    /// Parse a single expression (public for testing and tooling)
    pub fn parse_expression_public(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<NodeId>> {
        self.try_parse_expression(ctx, 0)
    }

    /// Allocate a node spanning from `start` to the last consumed token and
    /// record it in the symbol table
    fn finish(&mut self, ctx: &ParsingContext<'_>, kind: NodeKind, start: FilePosition) -> Result<NodeId> {
        let end = ctx.previous_end().max(start);
        self.finish_at(kind, start, end)
    }

    fn finish_at(&mut self, kind: NodeKind, start: FilePosition, end: FilePosition) -> Result<NodeId> {
        let node = self.ast.alloc(kind);
        self.symbols.add_symbol(node, start, end)?;
        Ok(node)
    }
}
