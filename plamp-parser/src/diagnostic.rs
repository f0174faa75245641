//! Diagnostics reported by every pipeline stage
//!
//! A diagnostic is user-facing: it never aborts the pipeline. Codes are
//! namespaced per stage (`TOK1xxx`, `PRS1xxx`, `SEM1xxx`) and are the stable
//! contract that tooling matches on; message text is informational only.

use crate::position::FilePosition;
use crate::symbol::Symbol;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Info => f.write_str("info"),
            Level::Warning => f.write_str("warning"),
            Level::Error => f.write_str("error"),
        }
    }
}

/// Every condition a diagnostic can describe
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    // Tokenizer
    #[error("Unterminated string literal")]
    UnterminatedString,
    #[error("Invalid escape sequence '\\{0}'")]
    InvalidEscapeSequence(char),
    #[error("Unexpected character '{0}'")]
    UnexpectedToken(char),
    #[error("Invalid number literal '{0}'")]
    InvalidNumberLiteral(String),
    #[error("Invalid char literal")]
    InvalidCharLiteral,

    // Parser
    #[error("Expected '{0}'")]
    ExpectedToken(String),
    #[error("Expected expression")]
    ExpectedExpression,
    #[error("Expected argument definition")]
    ExpectedArgumentDefinition,
    #[error("Expected close paren")]
    ExpectedCloseParen,
    #[error("Expected close bracket")]
    ExpectedCloseBracket,
    #[error("Expected function name")]
    ExpectedFunctionName,
    #[error("Expected module name")]
    ExpectedModuleName,
    #[error("Expected type name")]
    ExpectedTypeName,
    #[error("Unexpected token at top level")]
    UnexpectedTopLevelToken,
    #[error("Expected end of statement")]
    ExpectedEndOfStatement,
    #[error("Invalid statement")]
    InvalidStatement,
    #[error("Array rank {0} is too large")]
    ArrayRankTooLarge(usize),

    // Semantic analysis
    #[error("Cannot find member '{0}'")]
    CannotFindMember(Symbol),
    #[error("Cannot apply operator '{0}'")]
    CannotApplyOperator(String),
    #[error("Cannot assign '{from}' to '{to}'")]
    CannotAssign { from: String, to: String },
    #[error("Cannot assign an expression without a value")]
    CannotAssignNone,
    #[error("Unknown function '{0}'")]
    UnknownFunction(Symbol),
    #[error("Return value is missing")]
    ReturnValueIsMissing,
    #[error("Cannot return a value from a function without a return type")]
    CannotReturnValue,
    #[error("Return type mismatch: expected '{expected}', found '{found}'")]
    ReturnTypeMismatch { expected: String, found: String },
    #[error("Predicate must be of type bool")]
    PredicateMustBeBooleanType,
    #[error("Indexer value must be an integer")]
    IndexerValueMustBeInteger,
    #[error("Indexer is not applicable to '{0}'")]
    IndexerIsNotApplicable(String),
    #[error("Variable '{0}' is already defined")]
    DuplicateVariableDefinition(Symbol),
    #[error("Duplicate parameter name '{0}'")]
    DuplicateParameterName(Symbol),
    #[error("Duplicate member name '{0}'")]
    DuplicateMemberName(Symbol),
    #[error("Module definition is missing")]
    ModuleDefinitionMissing,
    #[error("Module is already defined")]
    DuplicateModuleDefinition,
    #[error("Member '{0}' has the same name as its module")]
    MemberNameIsModuleName(Symbol),
    #[error("Not all code paths return a value")]
    NotAllCodePathsReturnValue,
    #[error("Type '{0}' not found")]
    TypeNotFound(Symbol),
    #[error("Cannot cast '{from}' to '{to}'")]
    CannotCast { from: String, to: String },
    #[error("Multi-dimensional indexers are not supported")]
    MultiDimensionalIndexer,
    #[error("'{0}' is only valid inside a loop")]
    JumpOutsideLoop(String),
    #[error("Module '{0}' is already imported")]
    DuplicateImport(String),
    #[error("Unreachable code")]
    UnreachableCode,
}

impl DiagnosticKind {
    /// The stable code of this diagnostic
    pub fn code(&self) -> &'static str {
        use DiagnosticKind::*;
        match self {
            UnterminatedString => "TOK1001",
            InvalidEscapeSequence(_) => "TOK1002",
            UnexpectedToken(_) => "TOK1003",
            InvalidNumberLiteral(_) => "TOK1004",
            InvalidCharLiteral => "TOK1005",

            ExpectedToken(_) => "PRS1001",
            ExpectedExpression => "PRS1002",
            ExpectedArgumentDefinition => "PRS1003",
            ExpectedCloseParen => "PRS1004",
            ExpectedCloseBracket => "PRS1005",
            ExpectedFunctionName => "PRS1006",
            ExpectedModuleName => "PRS1007",
            ExpectedTypeName => "PRS1008",
            UnexpectedTopLevelToken => "PRS1009",
            ExpectedEndOfStatement => "PRS1010",
            InvalidStatement => "PRS1011",
            ArrayRankTooLarge(_) => "PRS1012",

            CannotFindMember(_) => "SEM1001",
            CannotApplyOperator(_) => "SEM1002",
            CannotAssign { .. } => "SEM1003",
            CannotAssignNone => "SEM1004",
            UnknownFunction(_) => "SEM1005",
            ReturnValueIsMissing => "SEM1006",
            CannotReturnValue => "SEM1007",
            ReturnTypeMismatch { .. } => "SEM1008",
            PredicateMustBeBooleanType => "SEM1009",
            IndexerValueMustBeInteger => "SEM1010",
            IndexerIsNotApplicable(_) => "SEM1011",
            DuplicateVariableDefinition(_) => "SEM1012",
            DuplicateParameterName(_) => "SEM1013",
            DuplicateMemberName(_) => "SEM1014",
            ModuleDefinitionMissing => "SEM1015",
            DuplicateModuleDefinition => "SEM1016",
            MemberNameIsModuleName(_) => "SEM1017",
            NotAllCodePathsReturnValue => "SEM1018",
            TypeNotFound(_) => "SEM1019",
            CannotCast { .. } => "SEM1020",
            MultiDimensionalIndexer => "SEM1021",
            JumpOutsideLoop(_) => "SEM1022",
            DuplicateImport(_) => "SEM1023",
            UnreachableCode => "SEM1024",
        }
    }

    /// The severity this kind is always reported with
    pub fn level(&self) -> Level {
        match self {
            DiagnosticKind::MultiDimensionalIndexer | DiagnosticKind::DuplicateImport(_) => Level::Warning,
            DiagnosticKind::UnreachableCode => Level::Info,
            _ => Level::Error,
        }
    }
}

/// A diagnostic attached to a source span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub level: Level,
    pub start: FilePosition,
    pub end: FilePosition,
    pub file_name: String,
}

impl Diagnostic {
    /// Create a diagnostic over `start..end`.
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`: a reversed span means the caller
    /// computed positions incorrectly.
    pub fn new(kind: DiagnosticKind, start: FilePosition, end: FilePosition, file_name: impl Into<String>) -> Self {
        assert!(start <= end, "diagnostic span starts at {start} but ends at {end}");
        let level = kind.level();
        Diagnostic {
            kind,
            level,
            start,
            end,
            file_name: file_name.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} {}: {}",
            self.file_name,
            self.start,
            self.level,
            self.code(),
            self.kind
        )
    }
}

impl Serialize for Diagnostic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Diagnostic", 6)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("level", &self.level)?;
        state.serialize_field("message", &self.message())?;
        state.serialize_field("startPosition", &self.start)?;
        state.serialize_field("endPosition", &self.end)?;
        state.serialize_field("fileName", &self.file_name)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_namespaced() {
        assert_eq!(DiagnosticKind::UnterminatedString.code(), "TOK1001");
        assert_eq!(DiagnosticKind::ExpectedCloseParen.code(), "PRS1004");
        assert_eq!(DiagnosticKind::CannotAssignNone.code(), "SEM1004");
    }

    #[test]
    fn test_levels() {
        assert_eq!(DiagnosticKind::UnreachableCode.level(), Level::Info);
        assert_eq!(DiagnosticKind::MultiDimensionalIndexer.level(), Level::Warning);
        assert_eq!(DiagnosticKind::ReturnValueIsMissing.level(), Level::Error);
    }

    #[test]
    fn test_wire_shape() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::CannotFindMember(Symbol::intern("x")),
            FilePosition::new(1, 4),
            FilePosition::new(1, 5),
            "main.plp",
        );
        let json = serde_json::to_value(&diagnostic).unwrap();

        assert_eq!(json["code"], "SEM1001");
        assert_eq!(json["level"], "Error");
        assert_eq!(json["message"], "Cannot find member 'x'");
        assert_eq!(json["startPosition"]["row"], 1);
        assert_eq!(json["endPosition"]["col"], 5);
        assert_eq!(json["fileName"], "main.plp");
    }

    #[test]
    #[should_panic]
    fn test_reversed_span_panics() {
        Diagnostic::new(
            DiagnosticKind::ExpectedExpression,
            FilePosition::new(2, 0),
            FilePosition::new(1, 0),
            "main.plp",
        );
    }
}
