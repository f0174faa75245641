//! Symbols provided by the host
//!
//! The checker only knows the current module and the intrinsics. Anything
//! else (host types, host functions, members of host types) is resolved
//! through [`ExternalSymbols`]. [`HostDescriptions`] is a TOML-backed
//! implementation used by the CLI:
//!
//! ```toml
//! types = ["Canvas"]
//!
//! [[functions]]
//! name = "draw"
//! params = ["Canvas", "int[]"]
//! returns = "bool"
//!
//! [[members]]
//! owner = "Canvas"
//! name = "width"
//! type = "int"
//! ```

use crate::builtins::FunctionSignature;
use crate::error::{CheckError, Result};
use plamp_parser::{PlampType, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Name resolution beyond the current module
pub trait ExternalSymbols {
    /// A type that is neither built in nor declared in the module
    fn resolve_type(&self, name: Symbol) -> Option<PlampType>;

    /// Every host function called `name`
    fn resolve_function(&self, name: Symbol) -> Vec<FunctionSignature>;

    /// The type of `owner.member`
    fn resolve_member(&self, owner: &PlampType, member: Symbol) -> Option<PlampType>;
}

/// A host that provides nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExternalSymbols;

impl ExternalSymbols for NoExternalSymbols {
    fn resolve_type(&self, _name: Symbol) -> Option<PlampType> {
        None
    }

    fn resolve_function(&self, _name: Symbol) -> Vec<FunctionSignature> {
        Vec::new()
    }

    fn resolve_member(&self, _owner: &PlampType, _member: Symbol) -> Option<PlampType> {
        None
    }
}

/// Host symbols as written in a descriptions file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostDescriptions {
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub functions: Vec<HostFunction>,
    #[serde(default)]
    pub members: Vec<HostMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostFunction {
    pub name: String,
    #[serde(default)]
    pub params: Vec<String>,
    /// Omitted for functions without a return value
    pub returns: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostMember {
    pub owner: String,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl HostDescriptions {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Resolve every type name used in the descriptions
    pub fn resolve(&self) -> Result<HostSymbols> {
        let types: HashSet<Symbol> = self.types.iter().map(|t| Symbol::intern(t.as_str())).collect();
        let resolve = |owner: &str, name: &str| {
            parse_type_name(name, &types).ok_or_else(|| CheckError::UnknownHostType {
                owner: owner.to_string(),
                type_name: name.to_string(),
            })
        };

        let mut functions: HashMap<Symbol, Vec<FunctionSignature>> = HashMap::new();
        for function in &self.functions {
            let params = function
                .params
                .iter()
                .map(|p| resolve(function.name.as_str(), p.as_str()).map(Some))
                .collect::<Result<Vec<_>>>()?;
            let return_type = match &function.returns {
                Some(returns) => resolve(function.name.as_str(), returns.as_str())?,
                None => PlampType::Void,
            };
            let name = Symbol::intern(&function.name);
            functions.entry(name).or_default().push(FunctionSignature {
                name,
                params,
                return_type: Some(return_type),
            });
        }

        let mut members = HashMap::new();
        for member in &self.members {
            let owner = resolve(member.name.as_str(), member.owner.as_str())?;
            let ty = resolve(member.name.as_str(), member.ty.as_str())?;
            members.insert((owner, Symbol::intern(&member.name)), ty);
        }

        debug!(
            types = types.len(),
            functions = self.functions.len(),
            members = members.len(),
            "resolved host descriptions"
        );
        Ok(HostSymbols { types, functions, members })
    }
}

/// Host descriptions with every type resolved
#[derive(Debug, Clone, Default)]
pub struct HostSymbols {
    types: HashSet<Symbol>,
    functions: HashMap<Symbol, Vec<FunctionSignature>>,
    members: HashMap<(PlampType, Symbol), PlampType>,
}

impl ExternalSymbols for HostSymbols {
    fn resolve_type(&self, name: Symbol) -> Option<PlampType> {
        self.types.contains(&name).then_some(PlampType::Named(name))
    }

    fn resolve_function(&self, name: Symbol) -> Vec<FunctionSignature> {
        self.functions.get(&name).cloned().unwrap_or_default()
    }

    fn resolve_member(&self, owner: &PlampType, member: Symbol) -> Option<PlampType> {
        self.members.get(&(owner.clone(), member)).cloned()
    }
}

/// Parse `int`, `Canvas`, `double[][,]` and the like
fn parse_type_name(text: &str, host_types: &HashSet<Symbol>) -> Option<PlampType> {
    let mut rest = text.trim();
    let mut ranks = Vec::new();
    while let Some(inner) = rest.strip_suffix(']') {
        let open = inner.rfind('[')?;
        let commas = &inner[open + 1..];
        if !commas.chars().all(|c| c == ',') {
            return None;
        }
        ranks.push(u8::try_from(commas.len() + 1).ok()?);
        rest = inner[..open].trim_end();
    }

    let mut ty = match PlampType::builtin(rest) {
        Some(ty) => ty,
        None => {
            let name = Symbol::intern(rest);
            if !host_types.contains(&name) {
                return None;
            }
            PlampType::Named(name)
        }
    };
    // Suffixes were collected outermost first.
    for rank in ranks.into_iter().rev() {
        ty = PlampType::array_of(ty, rank);
    }
    Some(ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTIONS: &str = r#"
types = ["Canvas"]

[[functions]]
name = "draw"
params = ["Canvas", "int[]"]
returns = "bool"

[[functions]]
name = "clear"
params = ["Canvas"]

[[members]]
owner = "Canvas"
name = "width"
type = "int"
"#;

    #[test]
    fn test_parse_type_name() {
        let types: HashSet<Symbol> = [Symbol::intern("Canvas")].into_iter().collect();
        assert_eq!(parse_type_name("int", &types), Some(PlampType::Int));
        assert_eq!(
            parse_type_name("int[][,]", &types),
            Some(PlampType::array_of(PlampType::array_of(PlampType::Int, 1), 2))
        );
        assert_eq!(
            parse_type_name("Canvas[]", &types),
            Some(PlampType::array_of(PlampType::Named(Symbol::intern("Canvas")), 1))
        );
        assert_eq!(parse_type_name("Brush", &types), None);
        assert_eq!(parse_type_name("int[x]", &types), None);
        assert_eq!(parse_type_name(&format!("int[{}]", ",".repeat(255)), &types), None);
        assert!(parse_type_name(&format!("int[{}]", ",".repeat(254)), &types).is_some());
    }

    #[test]
    fn test_host_symbols_resolve() {
        let host = HostDescriptions::from_toml(DESCRIPTIONS).unwrap().resolve().unwrap();
        let canvas = PlampType::Named(Symbol::intern("Canvas"));

        assert_eq!(host.resolve_type(Symbol::intern("Canvas")), Some(canvas.clone()));
        assert_eq!(host.resolve_type(Symbol::intern("Brush")), None);

        let draw = host.resolve_function(Symbol::intern("draw"));
        assert_eq!(draw.len(), 1);
        assert_eq!(draw[0].return_type, Some(PlampType::Bool));
        let clear = host.resolve_function(Symbol::intern("clear"));
        assert_eq!(clear[0].return_type, Some(PlampType::Void));

        assert_eq!(host.resolve_member(&canvas, Symbol::intern("width")), Some(PlampType::Int));
        assert_eq!(host.resolve_member(&canvas, Symbol::intern("height")), None);
    }

    #[test]
    fn test_unknown_host_type_is_an_error() {
        let descriptions = HostDescriptions::from_toml(
            "[[functions]]\nname = \"paint\"\nparams = [\"Brush\"]\n",
        )
        .unwrap();
        assert!(matches!(
            descriptions.resolve(),
            Err(CheckError::UnknownHostType { .. })
        ));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            HostDescriptions::from_toml("types = 3"),
            Err(CheckError::HostDescriptions(_))
        ));
    }
}
