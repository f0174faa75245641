//! The plamp type model
//!
//! Types live next to the AST because every node carries a resolved-type
//! slot. The checker fills the slot in; the parser only ever writes literal
//! types into it.

use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved plamp type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlampType {
    Int,
    UInt,
    Long,
    ULong,
    Byte,
    Float,
    Double,
    Bool,
    String,
    Char,
    /// Matches every argument type in intrinsic signatures
    Any,
    /// Result of a call to a function without a return type
    Void,
    /// Type of the `null` literal
    Null,
    /// `element[]` has rank 1, `element[,]` rank 2 and so on
    Array { element: Box<PlampType>, rank: u8 },
    /// A type provided by the host through external symbols
    Named(Symbol),
}

/// Names of the types every module can use without resolution
pub const BUILTIN_TYPE_NAMES: &[&str] = &[
    "int", "uint", "long", "ulong", "byte", "float", "double", "bool", "string", "char", "any",
];

impl PlampType {
    /// Look up a built-in type by its source name
    pub fn builtin(name: &str) -> Option<PlampType> {
        let ty = match name {
            "int" => PlampType::Int,
            "uint" => PlampType::UInt,
            "long" => PlampType::Long,
            "ulong" => PlampType::ULong,
            "byte" => PlampType::Byte,
            "float" => PlampType::Float,
            "double" => PlampType::Double,
            "bool" => PlampType::Bool,
            "string" => PlampType::String,
            "char" => PlampType::Char,
            "any" => PlampType::Any,
            _ => return None,
        };
        Some(ty)
    }

    pub fn array_of(element: PlampType, rank: u8) -> PlampType {
        PlampType::Array { element: Box::new(element), rank }
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_floating()
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            PlampType::Int | PlampType::UInt | PlampType::Long | PlampType::ULong | PlampType::Byte
        )
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, PlampType::Float | PlampType::Double)
    }

    /// Types whose values may be `null`
    pub fn is_nullable(&self) -> bool {
        matches!(
            self,
            PlampType::String | PlampType::Array { .. } | PlampType::Named(_) | PlampType::Any | PlampType::Null
        )
    }

    pub fn is_void(&self) -> bool {
        matches!(self, PlampType::Void)
    }
}

impl fmt::Display for PlampType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlampType::Int => f.write_str("int"),
            PlampType::UInt => f.write_str("uint"),
            PlampType::Long => f.write_str("long"),
            PlampType::ULong => f.write_str("ulong"),
            PlampType::Byte => f.write_str("byte"),
            PlampType::Float => f.write_str("float"),
            PlampType::Double => f.write_str("double"),
            PlampType::Bool => f.write_str("bool"),
            PlampType::String => f.write_str("string"),
            PlampType::Char => f.write_str("char"),
            PlampType::Any => f.write_str("any"),
            PlampType::Void => f.write_str("void"),
            PlampType::Null => f.write_str("null"),
            PlampType::Array { element, rank } => {
                let commas = ",".repeat(rank.saturating_sub(1) as usize);
                write!(f, "{element}[{commas}]")
            }
            PlampType::Named(name) => write!(f, "{name}"),
        }
    }
}
