//! Trailing `return` for functions without a return type

use super::{ModuleContext, Validator};
use plamp_parser::{Diagnostic, InternalError, NodeKind, Result};
use tracing::trace;

/// Appends a bare `return` to every void function whose body does not end
/// in one. The new node has a zero-width span at the end of the body.
pub struct ImplicitReturnWeaver;

impl Validator for ImplicitReturnWeaver {
    fn name(&self) -> &'static str {
        "implicit-return"
    }

    fn validate(&self, module: &mut ModuleContext<'_>) -> Result<Vec<Diagnostic>> {
        for function in module.functions()? {
            let body = match module.ast.kind(function) {
                NodeKind::FuncDef { return_type: None, body, .. } => *body,
                NodeKind::FuncDef { .. } => continue,
                _ => return Err(InternalError::unexpected_node(function, "FuncDef")),
            };
            let ends_in_return = match module.ast.kind(body) {
                NodeKind::Body { statements } => statements
                    .last()
                    .is_some_and(|s| matches!(module.ast.kind(*s), NodeKind::Return { .. })),
                _ => return Err(InternalError::unexpected_node(body, "Body")),
            };
            if ends_in_return {
                continue;
            }

            let (_, end) = module.symbols.try_symbol(body).ok_or(InternalError::MissingSymbol(body))?;
            let ret = module.ast.alloc(NodeKind::Return { value: None });
            module.symbols.add_symbol(ret, end, end)?;
            if let NodeKind::Body { statements } = module.ast.kind_mut(body) {
                statements.push(ret);
            }
            trace!(function = ?module.ast.name_of(function), "appended implicit return");
        }
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::test_support::run;

    #[test]
    fn test_appends_return() {
        let (codes, printed) = run(&ImplicitReturnWeaver, "fn f() { x := 1; }\nfn g();");
        assert!(codes.is_empty());
        assert_eq!(printed, "Root[Fn(f() { Assign(x, 1i); Return }); Fn(g() { Return })]");
    }

    #[test]
    fn test_existing_return_is_kept() {
        let (_, printed) = run(&ImplicitReturnWeaver, "fn f() { return; }\nfn int g() { return 1; }");
        assert_eq!(printed, "Root[Fn(f() { Return }); Fn(int g() { Return(1i) })]");
    }
}
