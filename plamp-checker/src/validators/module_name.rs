//! Module declarations and imports

use super::{ModuleContext, Validator};
use plamp_parser::{Diagnostic, DiagnosticKind, InternalError, NodeKind, Result};
use std::collections::HashSet;

/// Exactly one `module` line, no function named like the module, and no
/// repeated `use`
pub struct ModuleNameValidator;

impl Validator for ModuleNameValidator {
    fn name(&self) -> &'static str {
        "module-name"
    }

    fn validate(&self, module: &mut ModuleContext<'_>) -> Result<Vec<Diagnostic>> {
        let (modules, imports, functions) = match module.ast.kind(module.root) {
            NodeKind::Root { modules, imports, functions } => (modules.clone(), imports.clone(), functions.clone()),
            _ => return Err(InternalError::unexpected_node(module.root, "Root")),
        };
        let mut diagnostics = Vec::new();

        match modules.split_first() {
            None => {
                let (start, _) = module
                    .symbols
                    .try_symbol(module.root)
                    .ok_or(InternalError::MissingSymbol(module.root))?;
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::ModuleDefinitionMissing,
                    start,
                    start,
                    module.file_name,
                ));
            }
            Some((&first, rest)) => {
                for &extra in rest {
                    diagnostics.push(module.diagnostic(extra, DiagnosticKind::DuplicateModuleDefinition)?);
                }
                let own_name = match module.ast.kind(first) {
                    NodeKind::ModuleDef { path } => path.segments.last().copied(),
                    _ => return Err(InternalError::unexpected_node(first, "ModuleDef")),
                };
                if let Some(own_name) = own_name {
                    for &function in &functions {
                        if module.ast.name_of(function) == Some(own_name) {
                            diagnostics.push(module.diagnostic(function, DiagnosticKind::MemberNameIsModuleName(own_name))?);
                        }
                    }
                }
            }
        }

        let mut seen = HashSet::new();
        for &import in &imports {
            let path = match module.ast.kind(import) {
                NodeKind::Import { path } => path.clone(),
                _ => return Err(InternalError::unexpected_node(import, "Import")),
            };
            if !seen.insert(path.clone()) {
                diagnostics.push(module.diagnostic(import, DiagnosticKind::DuplicateImport(path.to_string()))?);
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
    fn test_missing_module() {
        let (codes, _) = run(&ModuleNameValidator, "fn f() {}");
        assert_eq!(codes, vec!["SEM1015"]);
    }

    #[test]
    fn test_well_formed_module() {
        let (codes, _) = run(&ModuleNameValidator, "module demo.math;\nuse std.io;\nfn f() {}");
        assert!(codes.is_empty(), "{codes:?}");
    }

    #[test]
    fn test_member_named_like_module() {
        let (codes, _) = run(&ModuleNameValidator, "module demo.math;\nfn math() {}\nfn demo() {}");
        assert_eq!(codes, vec!["SEM1017"]);
    }

    #[test]
    fn test_second_module_and_repeated_import() {
        let (codes, _) = run(&ModuleNameValidator, "module a;\nmodule b;\nuse std.io;\nuse std.io;");
        assert_eq!(codes, vec!["SEM1016", "SEM1023"]);
    }
}
