//! Top-level function names

use super::{ModuleContext, Validator};
use plamp_parser::{Diagnostic, DiagnosticKind, InternalError, NodeId, Result, Symbol};
use std::collections::HashMap;

/// Functions sharing a name are each reported
pub struct MemberNameValidator;

impl Validator for MemberNameValidator {
    fn name(&self) -> &'static str {
        "member-names"
    }

    fn validate(&self, module: &mut ModuleContext<'_>) -> Result<Vec<Diagnostic>> {
        let functions = module.functions()?;
        let mut groups: HashMap<Symbol, Vec<NodeId>> = HashMap::new();
        let mut named = Vec::with_capacity(functions.len());
        for function in functions {
            let name = module
                .ast
                .name_of(function)
                .ok_or(InternalError::unexpected_node(function, "FuncDef"))?;
            groups.entry(name).or_default().push(function);
            named.push((function, name));
        }

        let mut diagnostics = Vec::new();
        for (function, name) in named {
            if groups[&name].len() > 1 {
                diagnostics.push(module.diagnostic(function, DiagnosticKind::DuplicateMemberName(name))?);
            }
        }
        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::test_support::run;

    #[test]
    fn test_duplicate_functions() {
        let (codes, _) = run(&MemberNameValidator, "fn f() {}\nfn g() {}\nfn int f(int a) { return a; }");
        assert_eq!(codes, vec!["SEM1014", "SEM1014"]);
    }

    #[test]
    fn test_unique_functions() {
        let (codes, _) = run(&MemberNameValidator, "fn f() {}\nfn g() {}");
        assert!(codes.is_empty());
    }
}
