//! Abstract Syntax Tree definitions for plamp
//!
//! Nodes live in an arena and refer to each other by `NodeId`. Identity is
//! the id, never structural equality; the symbol table is keyed by it.
//! Rewriting passes replace a child by pointing the parent's slot at a new
//! id, which keeps traversal and mutation free of aliasing problems.

use crate::symbol::Symbol;
use crate::token::LiteralValue;
use crate::types::PlampType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable index of a node in an [`Ast`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub fn from_raw(raw: u32) -> Self {
        NodeId(raw)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Dotted module path (e.g. `std.io`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModulePath {
    pub segments: Vec<Symbol>,
}

impl ModulePath {
    pub fn new(segments: Vec<Symbol>) -> Self {
        ModulePath { segments }
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .segments
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&joined)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Equal,
    NotEqual,
    And,
    Or,
    BitwiseAnd,
    BitwiseOr,
    Xor,
}

/// Groups of binary operators that share a typing rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCategory {
    Arithmetic,
    Comparison,
    Equality,
    Logical,
    Bitwise,
}

impl BinaryOp {
    pub fn category(self) -> OperatorCategory {
        match self {
            BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => {
                OperatorCategory::Arithmetic
            }
            BinaryOp::Less | BinaryOp::LessOrEqual | BinaryOp::Greater | BinaryOp::GreaterOrEqual => {
                OperatorCategory::Comparison
            }
            BinaryOp::Equal | BinaryOp::NotEqual => OperatorCategory::Equality,
            BinaryOp::And | BinaryOp::Or => OperatorCategory::Logical,
            BinaryOp::BitwiseAnd | BinaryOp::BitwiseOr | BinaryOp::Xor => OperatorCategory::Bitwise,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Less => "<",
            BinaryOp::LessOrEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterOrEqual => ">=",
            BinaryOp::Equal => "=",
            BinaryOp::NotEqual => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::BitwiseAnd => "&",
            BinaryOp::BitwiseOr => "|",
            BinaryOp::Xor => "^",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Negate,
    Not,
    PrefixIncrement,
    PrefixDecrement,
    PostfixIncrement,
    PostfixDecrement,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
            UnaryOp::PrefixIncrement | UnaryOp::PostfixIncrement => "++",
            UnaryOp::PrefixDecrement | UnaryOp::PostfixDecrement => "--",
        }
    }
}

/// `:=` and its compound forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignOp {
    Assign,
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    BitwiseAnd,
    BitwiseOr,
    Xor,
}

impl AssignOp {
    /// The binary operator a compound assignment applies
    pub fn binary(self) -> Option<BinaryOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Plus => Some(BinaryOp::Plus),
            AssignOp::Minus => Some(BinaryOp::Minus),
            AssignOp::Multiply => Some(BinaryOp::Multiply),
            AssignOp::Divide => Some(BinaryOp::Divide),
            AssignOp::Modulo => Some(BinaryOp::Modulo),
            AssignOp::BitwiseAnd => Some(BinaryOp::BitwiseAnd),
            AssignOp::BitwiseOr => Some(BinaryOp::BitwiseOr),
            AssignOp::Xor => Some(BinaryOp::Xor),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => ":=",
            AssignOp::Plus => "+=",
            AssignOp::Minus => "-=",
            AssignOp::Multiply => "*=",
            AssignOp::Divide => "/=",
            AssignOp::Modulo => "%=",
            AssignOp::BitwiseAnd => "&=",
            AssignOp::BitwiseOr => "|=",
            AssignOp::Xor => "^=",
        }
    }
}

/// Every kind of node, with its typed children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Root {
        modules: Vec<NodeId>,
        imports: Vec<NodeId>,
        functions: Vec<NodeId>,
    },
    ModuleDef {
        path: ModulePath,
    },
    Import {
        path: ModulePath,
    },
    FuncDef {
        /// `None` means the function returns nothing
        return_type: Option<NodeId>,
        name: Symbol,
        params: Vec<NodeId>,
        body: NodeId,
    },
    Parameter {
        ty: NodeId,
        name: Symbol,
    },
    Body {
        statements: Vec<NodeId>,
    },
    Condition {
        predicate: NodeId,
        if_clause: NodeId,
        else_clause: Option<NodeId>,
    },
    While {
        predicate: NodeId,
        body: NodeId,
    },
    Return {
        value: Option<NodeId>,
    },
    Break,
    Continue,
    Call {
        name: Symbol,
        args: Vec<NodeId>,
    },
    ConstructorCall {
        ty: NodeId,
        args: Vec<NodeId>,
    },
    ArrayInit {
        element_ty: NodeId,
        length: NodeId,
    },
    Cast {
        to: NodeId,
        inner: NodeId,
        /// Type of `inner` once inference has seen it
        from: Option<PlampType>,
    },
    Member {
        name: Symbol,
    },
    MemberAccess {
        from: NodeId,
        member: Symbol,
    },
    IndexAccess {
        target: NodeId,
        index: NodeId,
    },
    VariableDefinition {
        ty: Option<NodeId>,
        name: Symbol,
    },
    Assign {
        op: AssignOp,
        target: NodeId,
        value: NodeId,
    },
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    Unary {
        op: UnaryOp,
        operand: NodeId,
    },
    Literal {
        value: LiteralValue,
    },
    /// A type as written: a name plus array suffixes, innermost first
    TypeRef {
        name: Symbol,
        dims: Vec<u8>,
    },
}

impl NodeKind {
    /// Short name of the variant, used in printing and internal errors
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Root { .. } => "Root",
            NodeKind::ModuleDef { .. } => "ModuleDef",
            NodeKind::Import { .. } => "Import",
            NodeKind::FuncDef { .. } => "FuncDef",
            NodeKind::Parameter { .. } => "Parameter",
            NodeKind::Body { .. } => "Body",
            NodeKind::Condition { .. } => "Condition",
            NodeKind::While { .. } => "While",
            NodeKind::Return { .. } => "Return",
            NodeKind::Break => "Break",
            NodeKind::Continue => "Continue",
            NodeKind::Call { .. } => "Call",
            NodeKind::ConstructorCall { .. } => "ConstructorCall",
            NodeKind::ArrayInit { .. } => "ArrayInit",
            NodeKind::Cast { .. } => "Cast",
            NodeKind::Member { .. } => "Member",
            NodeKind::MemberAccess { .. } => "MemberAccess",
            NodeKind::IndexAccess { .. } => "IndexAccess",
            NodeKind::VariableDefinition { .. } => "VariableDefinition",
            NodeKind::Assign { .. } => "Assign",
            NodeKind::Binary { .. } => "Binary",
            NodeKind::Unary { .. } => "Unary",
            NodeKind::Literal { .. } => "Literal",
            NodeKind::TypeRef { .. } => "TypeRef",
        }
    }

    /// Visit every child slot mutably, in source order
    pub fn for_each_child_mut(&mut self, mut f: impl FnMut(&mut NodeId)) {
        match self {
            NodeKind::Root { modules, imports, functions } => {
                modules.iter_mut().chain(imports.iter_mut()).chain(functions.iter_mut()).for_each(f)
            }
            NodeKind::FuncDef { return_type, params, body, .. } => {
                if let Some(ty) = return_type {
                    f(ty);
                }
                params.iter_mut().for_each(&mut f);
                f(body);
            }
            NodeKind::Parameter { ty, .. } => f(ty),
            NodeKind::Body { statements } => statements.iter_mut().for_each(f),
            NodeKind::Condition { predicate, if_clause, else_clause } => {
                f(predicate);
                f(if_clause);
                if let Some(clause) = else_clause {
                    f(clause);
                }
            }
            NodeKind::While { predicate, body } => {
                f(predicate);
                f(body);
            }
            NodeKind::Return { value } => {
                if let Some(value) = value {
                    f(value);
                }
            }
            NodeKind::Call { args, .. } => args.iter_mut().for_each(f),
            NodeKind::ConstructorCall { ty, args } => {
                f(ty);
                args.iter_mut().for_each(&mut f);
            }
            NodeKind::ArrayInit { element_ty, length } => {
                f(element_ty);
                f(length);
            }
            NodeKind::Cast { to, inner, .. } => {
                f(to);
                f(inner);
            }
            NodeKind::MemberAccess { from, .. } => f(from),
            NodeKind::IndexAccess { target, index } => {
                f(target);
                f(index);
            }
            NodeKind::VariableDefinition { ty, .. } => {
                if let Some(ty) = ty {
                    f(ty);
                }
            }
            NodeKind::Assign { target, value, .. } => {
                f(target);
                f(value);
            }
            NodeKind::Binary { left, right, .. } => {
                f(left);
                f(right);
            }
            NodeKind::Unary { operand, .. } => f(operand),
            NodeKind::ModuleDef { .. }
            | NodeKind::Import { .. }
            | NodeKind::Break
            | NodeKind::Continue
            | NodeKind::Member { .. }
            | NodeKind::Literal { .. }
            | NodeKind::TypeRef { .. } => {}
        }
    }

    /// Children in source order
    pub fn children(&self) -> Vec<NodeId> {
        let mut children = Vec::new();
        // Cloning keeps one traversal definition for both directions.
        self.clone().for_each_child_mut(|child| children.push(*child));
        children
    }
}

/// A node: its kind and the type inference resolved for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub ty: Option<PlampType>,
}

/// Arena owning every node of one source file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let ty = match &kind {
            NodeKind::Literal { value } => Some(value.ty()),
            _ => None,
        };
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { kind, ty });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.index()].kind
    }

    /// The resolved type, `None` while unknown
    pub fn ty(&self, id: NodeId) -> Option<&PlampType> {
        self.nodes[id.index()].ty.as_ref()
    }

    pub fn set_ty(&mut self, id: NodeId, ty: Option<PlampType>) {
        self.nodes[id.index()].ty = ty;
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.kind(id).children()
    }

    /// Point the slot of `parent` that holds `old` at `new`. Returns whether a
    /// slot was found.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> bool {
        let mut replaced = false;
        self.kind_mut(parent).for_each_child_mut(|slot| {
            if *slot == old && !replaced {
                *slot = new;
                replaced = true;
            }
        });
        replaced
    }

    /// `root` and every node reachable from it, parents before children
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            let mut children = self.children(id);
            children.reverse();
            stack.extend(children);
        }
        order
    }

    /// Name of a function, parameter, variable or member node
    pub fn name_of(&self, id: NodeId) -> Option<Symbol> {
        match self.kind(id) {
            NodeKind::FuncDef { name, .. }
            | NodeKind::Parameter { name, .. }
            | NodeKind::VariableDefinition { name, .. }
            | NodeKind::Member { name }
            | NodeKind::Call { name, .. } => Some(*name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(ast: &mut Ast, v: i32) -> NodeId {
        ast.alloc(NodeKind::Literal { value: LiteralValue::Int(v) })
    }

    #[test]
    fn test_literal_nodes_carry_their_type() {
        let mut ast = Ast::new();
        let one = literal(&mut ast, 1);
        assert_eq!(ast.ty(one), Some(&PlampType::Int));

        let member = ast.alloc(NodeKind::Member { name: Symbol::intern("a") });
        assert_eq!(ast.ty(member), None);
    }

    #[test]
    fn test_replace_child() {
        let mut ast = Ast::new();
        let left = literal(&mut ast, 1);
        let right = literal(&mut ast, 2);
        let plus = ast.alloc(NodeKind::Binary { op: BinaryOp::Plus, left, right });
        let replacement = literal(&mut ast, 3);

        assert!(ast.replace_child(plus, right, replacement));
        assert_eq!(ast.children(plus), vec![left, replacement]);
        assert!(!ast.replace_child(plus, right, replacement));
    }

    #[test]
    fn test_descendants_are_pre_order() {
        let mut ast = Ast::new();
        let a = literal(&mut ast, 1);
        let b = literal(&mut ast, 2);
        let c = literal(&mut ast, 3);
        let mul = ast.alloc(NodeKind::Binary { op: BinaryOp::Multiply, left: b, right: c });
        let plus = ast.alloc(NodeKind::Binary { op: BinaryOp::Plus, left: a, right: mul });

        assert_eq!(ast.descendants(plus), vec![plus, a, mul, b, c]);
    }

    #[test]
    fn test_compound_assignment_maps_to_binary() {
        assert_eq!(AssignOp::Plus.binary(), Some(BinaryOp::Plus));
        assert_eq!(AssignOp::Assign.binary(), None);
        assert_eq!(BinaryOp::Xor.category(), OperatorCategory::Bitwise);
    }

    #[test]
    fn test_module_path_display() {
        let path = ModulePath::new(vec![Symbol::intern("std"), Symbol::intern("io")]);
        assert_eq!(path.to_string(), "std.io");
    }
}
