//! plamp
//!
//! Front end of the plamp language: tokenizer, parser, type inference and
//! module validation. The individual stages live in `plamp-parser` and
//! `plamp-checker`; this crate ties them together.

pub use plamp_checker as checker;
pub use plamp_parser as parser;

pub use plamp_checker::{CheckedModule, ExternalSymbols, HostDescriptions, NoExternalSymbols};
pub use plamp_parser::{Diagnostic, DiagnosticKind, Level};

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Checker error: {0}")]
    Check(#[from] plamp_checker::CheckError),

    #[error("Parser error: {0}")]
    Parse(#[from] plamp_parser::InternalError),
}

pub type Result<T> = std::result::Result<T, CompileError>;

/// Run every front end stage over one source file
pub fn compile_source(text: &str, file_name: &str, externals: &dyn ExternalSymbols) -> Result<CheckedModule> {
    let parsed = plamp_parser::parse(text, file_name)?;
    debug!(file = file_name, tokens = parsed.tokens.len(), "parsed");
    Ok(plamp_checker::check(parsed, externals)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_source() {
        let module = compile_source("module demo;\nfn int two() { return 2; }", "demo.plp", &NoExternalSymbols).unwrap();
        assert!(!module.has_errors());
        assert_eq!(module.file_name, "demo.plp");
    }
}
