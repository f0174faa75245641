//! Function signatures and the intrinsic functions of plamp
//!
//! Intrinsics are available in every module without an import. Arrays are
//! created with `new T[n]`; `empty_array()` gives an `any[]` that can be
//! stored in any one-dimensional array.

use crate::widening::{assignability, Assignability};
use plamp_parser::{PlampType, Symbol};
use std::collections::HashMap;

/// The callable shape of a module function, intrinsic or host function
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub name: Symbol,
    /// `None` where the declared type could not be resolved
    pub params: Vec<Option<PlampType>>,
    /// `Void` for functions without a return type, `None` when unresolved
    pub return_type: Option<PlampType>,
}

impl FunctionSignature {
    pub fn new(name: &str, params: Vec<PlampType>, return_type: PlampType) -> Self {
        FunctionSignature {
            name: Symbol::intern(name),
            params: params.into_iter().map(Some).collect(),
            return_type: Some(return_type),
        }
    }

    /// Whether arguments of the given types can be passed. Arguments must
    /// match exactly; `any` parameters take every type, `null` fits nullable
    /// parameters, and unknown types on either side are not held against
    /// the call.
    pub fn accepts(&self, args: &[Option<PlampType>]) -> bool {
        self.params.len() == args.len()
            && self.params.iter().zip(args).all(|(param, arg)| match (param, arg) {
                (Some(param), Some(arg)) => assignability(arg, param) == Assignability::Exact,
                _ => true,
            })
    }
}

/// Functions every module can call
#[derive(Debug)]
pub struct Intrinsics {
    functions: HashMap<Symbol, FunctionSignature>,
}

impl Intrinsics {
    pub fn new() -> Self {
        let signatures = [
            FunctionSignature::new("print", vec![PlampType::Any], PlampType::Void),
            FunctionSignature::new("println", vec![PlampType::Any], PlampType::Void),
            FunctionSignature::new("read_line", vec![], PlampType::String),
            FunctionSignature::new("to_string", vec![PlampType::Any], PlampType::String),
            FunctionSignature::new("parse_int", vec![PlampType::String], PlampType::Int),
            FunctionSignature::new("empty_array", vec![], PlampType::array_of(PlampType::Any, 1)),
        ];
        let functions = signatures.into_iter().map(|s| (s.name, s)).collect();
        Self { functions }
    }

    pub fn get(&self, name: &Symbol) -> Option<&FunctionSignature> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &Symbol) -> bool {
        self.functions.contains_key(name)
    }
}

impl Default for Intrinsics {
    fn default() -> Self {
        Self::new()
    }
}
