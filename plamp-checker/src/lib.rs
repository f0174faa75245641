//! plamp Semantic Checker
//!
//! This crate takes a parsed module, infers and checks the type of every
//! expression, rewrites the tree (widening casts, default values, implicit
//! declarations and returns) and runs the module-level validators.

pub mod builtins;
pub mod error;
pub mod externals;
pub mod inference;
pub mod scope;
pub mod validators;
pub mod widening;

// Re-export core types
pub use builtins::{FunctionSignature, Intrinsics};
pub use error::{CheckError, Result};
pub use externals::{ExternalSymbols, HostDescriptions, HostSymbols, NoExternalSymbols};
pub use inference::infer_types;
pub use validators::{default_validators, ModuleContext, Validator};

use plamp_parser::{Ast, Diagnostic, Level, NodeId, ParseOutput, SymbolTable};
use tracing::{debug, info};

/// A module after semantic analysis
#[derive(Debug)]
pub struct CheckedModule {
    pub ast: Ast,
    pub root: NodeId,
    pub symbols: SymbolTable,
    /// Tokenizer, parser and semantic diagnostics, in that order
    pub diagnostics: Vec<Diagnostic>,
    pub file_name: String,
}

impl CheckedModule {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Number of diagnostics at `level`
    pub fn count(&self, level: Level) -> usize {
        self.diagnostics.iter().filter(|d| d.level == level).count()
    }
}

/// Type check a parsed module
pub fn check(parsed: ParseOutput, externals: &dyn ExternalSymbols) -> Result<CheckedModule> {
    let ParseOutput {
        mut ast,
        root,
        mut symbols,
        mut diagnostics,
        file_name,
        ..
    } = parsed;
    debug!(file = %file_name, nodes = ast.len(), "checking module");

    diagnostics.extend(infer_types(&mut ast, &mut symbols, root, &file_name, externals)?);

    let mut module = ModuleContext {
        ast: &mut ast,
        symbols: &mut symbols,
        root,
        file_name: &file_name,
    };
    for validator in default_validators() {
        let found = validator.validate(&mut module)?;
        debug!(validator = validator.name(), diagnostics = found.len(), "validator finished");
        diagnostics.extend(found);
    }

    info!(file = %file_name, diagnostics = diagnostics.len(), "module checked");
    Ok(CheckedModule {
        ast,
        root,
        symbols,
        diagnostics,
        file_name,
    })
}

/// Tokenize, parse and check `text` in one call
pub fn check_source(text: &str, file_name: &str, externals: &dyn ExternalSymbols) -> Result<CheckedModule> {
    let parsed = plamp_parser::parse(text, file_name)?;
    check(parsed, externals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_collects_every_stage() {
        let checked = check_source("fn f() { x := \"open }", "m.plp", &NoExternalSymbols).unwrap();
        let codes: Vec<_> = checked.diagnostics.iter().map(|d| d.code()).collect();
        assert_eq!(codes[0], "TOK1001");
        assert!(codes.contains(&"SEM1015"));
        assert!(checked.has_errors());
    }

    #[test]
    fn test_clean_module() {
        let checked = check_source("module m;\nfn int one() { return 1; }", "m.plp", &NoExternalSymbols).unwrap();
        assert!(checked.diagnostics.is_empty(), "{:?}", checked.diagnostics);
        assert_eq!(checked.count(Level::Error), 0);
    }
}
