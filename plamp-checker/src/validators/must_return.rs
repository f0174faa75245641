//! Return coverage and unreachable statements

use super::{ModuleContext, Validator};
use plamp_parser::{Ast, Diagnostic, DiagnosticKind, InternalError, NodeId, NodeKind, Result};

/// A function with a return type must return on every path. Statements
/// after an unconditional `return`, `break` or `continue` are reported once
/// per body as unreachable.
pub struct MustReturnValidator;

impl Validator for MustReturnValidator {
    fn name(&self) -> &'static str {
        "must-return"
    }

    fn validate(&self, module: &mut ModuleContext<'_>) -> Result<Vec<Diagnostic>> {
        let mut diagnostics = Vec::new();
        for function in module.functions()? {
            let (return_type, body) = match module.ast.kind(function) {
                NodeKind::FuncDef { return_type, body, .. } => (*return_type, *body),
                _ => return Err(InternalError::unexpected_node(function, "FuncDef")),
            };
            if return_type.is_some() && !always_returns(module.ast, body) {
                diagnostics.push(module.diagnostic(function, DiagnosticKind::NotAllCodePathsReturnValue)?);
            }

            for node in module.ast.descendants(body) {
                let NodeKind::Body { statements } = module.ast.kind(node) else {
                    continue;
                };
                let Some(jump) = statements.iter().position(|s| is_jump(module.ast, *s)) else {
                    continue;
                };
                let unreachable = &statements[jump + 1..];
                if !unreachable.is_empty() {
                    diagnostics.push(module.symbols.exception_for_node_range(
                        unreachable,
                        DiagnosticKind::UnreachableCode,
                        module.file_name,
                    )?);
                }
            }
        }
        Ok(diagnostics)
    }
}

fn is_jump(ast: &Ast, statement: NodeId) -> bool {
    matches!(ast.kind(statement), NodeKind::Return { .. } | NodeKind::Break | NodeKind::Continue)
}

/// Whether every path through `body` ends in a `return`
fn always_returns(ast: &Ast, body: NodeId) -> bool {
    match ast.kind(body) {
        NodeKind::Body { statements } => statements.iter().any(|s| statement_returns(ast, *s)),
        _ => false,
    }
}

fn statement_returns(ast: &Ast, statement: NodeId) -> bool {
    match ast.kind(statement) {
        NodeKind::Return { .. } => true,
        NodeKind::Condition { if_clause, else_clause: Some(else_clause), .. } => {
            always_returns(ast, *if_clause) && always_returns(ast, *else_clause)
        }
        NodeKind::Body { .. } => always_returns(ast, statement),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::test_support::run;

    #[test]
    fn test_if_without_else() {
        let (codes, _) = run(&MustReturnValidator, "fn int f(bool c) {\n    if (c) return 1;\n}");
        assert_eq!(codes, vec!["SEM1018"]);
    }

    #[test]
    fn test_if_with_else() {
        let (codes, _) = run(&MustReturnValidator, "fn int f(bool c) {\n    if (c) return 1; else return 2;\n}");
        assert!(codes.is_empty(), "{codes:?}");
    }

    #[test]
    fn test_nested_conditions() {
        let source = "fn int f(bool a, bool b) {\n    if (a) {\n        if (b) return 1; else return 2;\n    } else {\n        if (b) return 3;\n    }\n}";
        let (codes, _) = run(&MustReturnValidator, source);
        assert_eq!(codes, vec!["SEM1018"]);
    }

    #[test]
    fn test_trailing_return_after_incomplete_condition() {
        let (codes, _) = run(&MustReturnValidator, "fn int f(bool c) {\n    if (c) return 1;\n    return 2;\n}");
        assert!(codes.is_empty(), "{codes:?}");
    }

    #[test]
    fn test_void_functions_need_no_return() {
        let (codes, _) = run(&MustReturnValidator, "fn f() {}");
        assert!(codes.is_empty());
    }

    #[test]
    fn test_unreachable_statements_reported_once_per_body() {
        let (codes, _) = run(&MustReturnValidator, "fn int f() {\n    return 1;\n    x := 2;\n    y := 3;\n}");
        assert_eq!(codes, vec!["SEM1024"]);
    }
}
