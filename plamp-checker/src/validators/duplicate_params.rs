//! Parameter names within one function

use super::{ModuleContext, Validator};
use plamp_parser::{Diagnostic, DiagnosticKind, InternalError, NodeKind, Result, Symbol};
use std::collections::HashMap;

/// Every parameter whose name occurs more than once in its list is reported
pub struct DuplicateParameterValidator;

impl Validator for DuplicateParameterValidator {
    fn name(&self) -> &'static str {
        "duplicate-parameters"
    }

    fn validate(&self, module: &mut ModuleContext<'_>) -> Result<Vec<Diagnostic>> {
        let mut diagnostics = Vec::new();
        for function in module.functions()? {
            let params = match module.ast.kind(function) {
                NodeKind::FuncDef { params, .. } => params.clone(),
                _ => return Err(InternalError::unexpected_node(function, "FuncDef")),
            };

            let mut counts: HashMap<Symbol, usize> = HashMap::new();
            let mut named = Vec::with_capacity(params.len());
            for param in params {
                let name = module
                    .ast
                    .name_of(param)
                    .ok_or(InternalError::unexpected_node(param, "Parameter"))?;
                *counts.entry(name).or_default() += 1;
                named.push((param, name));
            }
            for (param, name) in named {
                if counts[&name] > 1 {
                    diagnostics.push(module.diagnostic(param, DiagnosticKind::DuplicateParameterName(name))?);
                }
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
    fn test_every_occurrence_is_reported() {
        let (codes, _) = run(&DuplicateParameterValidator, "fn dup(int a, string a);");
        assert_eq!(codes, vec!["SEM1013", "SEM1013"]);
    }

    #[test]
    fn test_three_occurrences() {
        let (codes, _) = run(&DuplicateParameterValidator, "fn f(int a, int b, int a, int a) {}");
        assert_eq!(codes.len(), 3);
    }

    #[test]
    fn test_distinct_names() {
        let (codes, _) = run(&DuplicateParameterValidator, "fn f(int a, int b) {}\nfn g(int a) {}");
        assert!(codes.is_empty());
    }
}
