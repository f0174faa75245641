//! Node-keyed source span table
//!
//! Every node the parser builds is recorded here with the span it was parsed
//! from, so later passes can attach diagnostics to arbitrary nodes without
//! carrying positions around in the tree.

use crate::ast::NodeId;
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::error::{InternalError, Result};
use crate::position::FilePosition;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    spans: HashMap<NodeId, (FilePosition, FilePosition)>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the span of `node`. Recording a node twice, or a reversed span,
    /// is an internal error.
    pub fn add_symbol(&mut self, node: NodeId, start: FilePosition, end: FilePosition) -> Result<()> {
        if start > end {
            return Err(InternalError::InvalidSpan { node, start, end });
        }
        if self.spans.contains_key(&node) {
            return Err(InternalError::DuplicateSymbol(node));
        }
        self.spans.insert(node, (start, end));
        Ok(())
    }

    pub fn try_symbol(&self, node: NodeId) -> Option<(FilePosition, FilePosition)> {
        self.spans.get(&node).copied()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.spans.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Move the span of `old` onto `new`; `old` is forgotten
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<()> {
        let (start, end) = self.spans.remove(&old).ok_or(InternalError::MissingSymbol(old))?;
        self.add_symbol(new, start, end)
    }

    /// Give `to` the span of `from`; both stay mapped
    pub fn copy_span(&mut self, from: NodeId, to: NodeId) -> Result<()> {
        let (start, end) = self.try_symbol(from).ok_or(InternalError::MissingSymbol(from))?;
        self.add_symbol(to, start, end)
    }

    /// The smallest span covering every node in `nodes`
    pub fn node_range(&self, nodes: &[NodeId]) -> Result<(FilePosition, FilePosition)> {
        let mut range: Option<(FilePosition, FilePosition)> = None;
        for &node in nodes {
            let (start, end) = self.try_symbol(node).ok_or(InternalError::MissingSymbol(node))?;
            range = Some(match range {
                Some((min, max)) => (min.min(start), max.max(end)),
                None => (start, end),
            });
        }
        range.ok_or(InternalError::EmptyNodeRange)
    }

    /// A diagnostic at the span of `node`
    pub fn exception_for_node(&self, node: NodeId, kind: DiagnosticKind, file_name: &str) -> Result<Diagnostic> {
        let (start, end) = self.try_symbol(node).ok_or(InternalError::MissingSymbol(node))?;
        Ok(Diagnostic::new(kind, start, end, file_name))
    }

    /// A diagnostic spanning every node in `nodes`
    pub fn exception_for_node_range(
        &self,
        nodes: &[NodeId],
        kind: DiagnosticKind,
        file_name: &str,
    ) -> Result<Diagnostic> {
        let (start, end) = self.node_range(nodes)?;
        Ok(Diagnostic::new(kind, start, end, file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u32, column: u32) -> FilePosition {
        FilePosition::new(row, column)
    }

    #[test]
    fn test_add_and_lookup() {
        let mut table = SymbolTable::new();
        let node = NodeId::from_raw(0);
        table.add_symbol(node, pos(0, 1), pos(0, 4)).unwrap();

        assert_eq!(table.try_symbol(node), Some((pos(0, 1), pos(0, 4))));
        assert_eq!(table.try_symbol(NodeId::from_raw(1)), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_double_insert_is_internal_error() {
        let mut table = SymbolTable::new();
        let node = NodeId::from_raw(0);
        table.add_symbol(node, pos(0, 0), pos(0, 1)).unwrap();
        assert_eq!(
            table.add_symbol(node, pos(0, 0), pos(0, 1)),
            Err(InternalError::DuplicateSymbol(node))
        );
    }

    #[test]
    fn test_reversed_span_is_internal_error() {
        let mut table = SymbolTable::new();
        let result = table.add_symbol(NodeId::from_raw(0), pos(1, 0), pos(0, 9));
        assert!(matches!(result, Err(InternalError::InvalidSpan { .. })));
    }

    #[test]
    fn test_replace_moves_span() {
        let mut table = SymbolTable::new();
        let old = NodeId::from_raw(0);
        let new = NodeId::from_raw(1);
        table.add_symbol(old, pos(2, 0), pos(2, 3)).unwrap();
        table.replace(old, new).unwrap();

        assert!(!table.contains(old));
        assert_eq!(table.try_symbol(new), Some((pos(2, 0), pos(2, 3))));
        assert_eq!(table.replace(old, new), Err(InternalError::MissingSymbol(old)));
    }

    #[test]
    fn test_copy_span_keeps_both() {
        let mut table = SymbolTable::new();
        let inner = NodeId::from_raw(0);
        let cast = NodeId::from_raw(1);
        table.add_symbol(inner, pos(0, 5), pos(0, 7)).unwrap();
        table.copy_span(inner, cast).unwrap();

        assert_eq!(table.try_symbol(inner), table.try_symbol(cast));
    }

    #[test]
    fn test_node_range() {
        let mut table = SymbolTable::new();
        let a = NodeId::from_raw(0);
        let b = NodeId::from_raw(1);
        table.add_symbol(a, pos(3, 4), pos(3, 8)).unwrap();
        table.add_symbol(b, pos(1, 2), pos(1, 6)).unwrap();

        assert_eq!(table.node_range(&[a, b]).unwrap(), (pos(1, 2), pos(3, 8)));
        assert_eq!(table.node_range(&[]), Err(InternalError::EmptyNodeRange));
        assert_eq!(
            table.node_range(&[a, NodeId::from_raw(9)]),
            Err(InternalError::MissingSymbol(NodeId::from_raw(9)))
        );
    }

    #[test]
    fn test_exception_for_node() {
        let mut table = SymbolTable::new();
        let node = NodeId::from_raw(0);
        table.add_symbol(node, pos(0, 0), pos(0, 3)).unwrap();

        let diagnostic = table
            .exception_for_node(node, DiagnosticKind::ModuleDefinitionMissing, "a.plp")
            .unwrap();
        assert_eq!(diagnostic.code(), "SEM1015");
        assert_eq!(diagnostic.end, pos(0, 3));
        assert!(table
            .exception_for_node(NodeId::from_raw(4), DiagnosticKind::ModuleDefinitionMissing, "a.plp")
            .is_err());
    }
}
