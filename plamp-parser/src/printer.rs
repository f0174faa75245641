//! Compact single-line rendering of a tree
//!
//! Expressions print as `Plus(1i, Multiply(2i, 3i))`, bodies as
//! `{ a; b }`. Used by the CLI and throughout the tests.

use crate::ast::{AssignOp, Ast, NodeId, NodeKind};
use std::fmt::Write;

/// Render `node` and everything below it
pub fn print_node(ast: &Ast, node: NodeId) -> String {
    let mut printer = Printer { ast, show_types: false, out: String::new() };
    printer.node(node);
    printer.out
}

/// Like [`print_node`], with each typed expression suffixed by `: type`
pub fn print_node_typed(ast: &Ast, node: NodeId) -> String {
    let mut printer = Printer { ast, show_types: true, out: String::new() };
    printer.node(node);
    printer.out
}

struct Printer<'a> {
    ast: &'a Ast,
    show_types: bool,
    out: String,
}

impl Printer<'_> {
    fn node(&mut self, id: NodeId) {
        let ast = self.ast;
        match ast.kind(id) {
            NodeKind::Root { modules, imports, functions } => {
                self.out.push_str("Root[");
                let items: Vec<NodeId> = modules.iter().chain(imports).chain(functions).copied().collect();
                self.list(&items, "; ");
                self.out.push(']');
            }
            NodeKind::ModuleDef { path } => {
                let _ = write!(self.out, "Module({path})");
            }
            NodeKind::Import { path } => {
                let _ = write!(self.out, "Use({path})");
            }
            NodeKind::FuncDef { return_type, name, params, body } => {
                self.out.push_str("Fn(");
                if let Some(return_type) = return_type {
                    self.node(*return_type);
                    self.out.push(' ');
                }
                let _ = write!(self.out, "{name}(");
                self.list(params, ", ");
                self.out.push_str(") ");
                self.node(*body);
                self.out.push(')');
            }
            NodeKind::Parameter { ty, name } => {
                self.node(*ty);
                let _ = write!(self.out, " {name}");
            }
            NodeKind::Body { statements } => {
                if statements.is_empty() {
                    self.out.push_str("{}");
                } else {
                    self.out.push_str("{ ");
                    self.list(statements, "; ");
                    self.out.push_str(" }");
                }
            }
            NodeKind::Condition { predicate, if_clause, else_clause } => {
                self.out.push_str("If(");
                self.node(*predicate);
                self.out.push_str(", ");
                self.node(*if_clause);
                if let Some(else_clause) = else_clause {
                    self.out.push_str(", ");
                    self.node(*else_clause);
                }
                self.out.push(')');
            }
            NodeKind::While { predicate, body } => {
                self.call("While", &[*predicate, *body]);
            }
            NodeKind::Return { value } => match value {
                Some(value) => self.call("Return", &[*value]),
                None => self.out.push_str("Return"),
            },
            NodeKind::Break => self.out.push_str("Break"),
            NodeKind::Continue => self.out.push_str("Continue"),
            NodeKind::Call { name, args } => {
                let _ = write!(self.out, "Call({name}");
                for arg in args {
                    self.out.push_str(", ");
                    self.node(*arg);
                }
                self.out.push(')');
            }
            NodeKind::ConstructorCall { ty, args } => {
                let mut children = vec![*ty];
                children.extend(args);
                self.call("New", &children);
            }
            NodeKind::ArrayInit { element_ty, length } => self.call("ArrayInit", &[*element_ty, *length]),
            NodeKind::Cast { to, inner, .. } => self.call("Cast", &[*to, *inner]),
            NodeKind::Member { name } => {
                let _ = write!(self.out, "{name}");
            }
            NodeKind::MemberAccess { from, member } => {
                self.out.push_str("MemberAccess(");
                self.node(*from);
                let _ = write!(self.out, ", {member})");
            }
            NodeKind::IndexAccess { target, index } => self.call("Index", &[*target, *index]),
            NodeKind::VariableDefinition { ty, name } => {
                self.out.push_str("Def(");
                if let Some(ty) = ty {
                    self.node(*ty);
                    self.out.push(' ');
                }
                let _ = write!(self.out, "{name})");
            }
            NodeKind::Assign { op, target, value } => {
                let label = match op {
                    AssignOp::Assign => "Assign".to_string(),
                    other => format!("{other:?}Assign"),
                };
                self.call(&label, &[*target, *value]);
            }
            NodeKind::Binary { op, left, right } => self.call(&format!("{op:?}"), &[*left, *right]),
            NodeKind::Unary { op, operand } => self.call(&format!("{op:?}"), &[*operand]),
            NodeKind::Literal { value } => {
                let _ = write!(self.out, "{value}");
            }
            NodeKind::TypeRef { name, dims } => {
                let _ = write!(self.out, "{name}");
                for rank in dims {
                    let commas = ",".repeat(rank.saturating_sub(1) as usize);
                    let _ = write!(self.out, "[{commas}]");
                }
            }
        }

        if self.show_types && is_expression(ast.kind(id)) {
            if let Some(ty) = ast.ty(id) {
                let _ = write!(self.out, ": {ty}");
            }
        }
    }

    fn call(&mut self, label: &str, children: &[NodeId]) {
        self.out.push_str(label);
        self.out.push('(');
        self.list(children, ", ");
        self.out.push(')');
    }

    fn list(&mut self, children: &[NodeId], separator: &str) {
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                self.out.push_str(separator);
            }
            self.node(*child);
        }
    }
}

fn is_expression(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Call { .. }
            | NodeKind::ConstructorCall { .. }
            | NodeKind::ArrayInit { .. }
            | NodeKind::Cast { .. }
            | NodeKind::Member { .. }
            | NodeKind::MemberAccess { .. }
            | NodeKind::IndexAccess { .. }
            | NodeKind::Binary { .. }
            | NodeKind::Unary { .. }
            | NodeKind::Literal { .. }
    )
}
