//! Whole-module checks that run after type inference
//!
//! Each validator looks at the finished tree once and returns what it found.
//! The implicit-return pass also lives here: it is the last step before the
//! tree is handed on and it only ever appends nodes.

mod duplicate_params;
mod implicit_return;
mod member_names;
mod module_name;
mod must_return;

pub use duplicate_params::DuplicateParameterValidator;
pub use implicit_return::ImplicitReturnWeaver;
pub use member_names::MemberNameValidator;
pub use module_name::ModuleNameValidator;
pub use must_return::MustReturnValidator;

use plamp_parser::{Ast, Diagnostic, DiagnosticKind, InternalError, NodeId, NodeKind, Result, SymbolTable};

/// The tree of one module, as the validators see it
pub struct ModuleContext<'a> {
    pub ast: &'a mut Ast,
    pub symbols: &'a mut SymbolTable,
    pub root: NodeId,
    pub file_name: &'a str,
}

impl ModuleContext<'_> {
    /// Top-level functions in source order
    pub fn functions(&self) -> Result<Vec<NodeId>> {
        match self.ast.kind(self.root) {
            NodeKind::Root { functions, .. } => Ok(functions.clone()),
            _ => Err(InternalError::unexpected_node(self.root, "Root")),
        }
    }

    pub fn diagnostic(&self, node: NodeId, kind: DiagnosticKind) -> Result<Diagnostic> {
        self.symbols.exception_for_node(node, kind, self.file_name)
    }
}

pub trait Validator {
    fn name(&self) -> &'static str;

    fn validate(&self, module: &mut ModuleContext<'_>) -> Result<Vec<Diagnostic>>;
}

/// Every pass in the order the checker runs them
pub fn default_validators() -> Vec<Box<dyn Validator>> {
    vec![
        Box::new(ModuleNameValidator),
        Box::new(DuplicateParameterValidator),
        Box::new(MemberNameValidator),
        Box::new(MustReturnValidator),
        Box::new(ImplicitReturnWeaver),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use plamp_parser::parse;

    /// Parse `text` and run one validator over it
    pub fn run(validator: &dyn Validator, text: &str) -> (Vec<&'static str>, String) {
        let mut output = parse(text, "v.plp").unwrap();
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        let mut module = ModuleContext {
            ast: &mut output.ast,
            symbols: &mut output.symbols,
            root: output.root,
            file_name: "v.plp",
        };
        let diagnostics = validator.validate(&mut module).unwrap();
        let codes = diagnostics.iter().map(|d| d.code()).collect();
        (codes, plamp_parser::print_node(&output.ast, output.root))
    }
}
