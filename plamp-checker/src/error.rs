//! Errors that abort semantic analysis
//!
//! Problems in the user's program are diagnostics. The errors here are either
//! pipeline defects surfaced from the parser crate or unusable host input.

use plamp_parser::InternalError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CheckError>;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("internal error: {0}")]
    Internal(#[from] InternalError),

    #[error("invalid host descriptions: {0}")]
    HostDescriptions(#[from] toml::de::Error),

    #[error("unknown type '{type_name}' in host description of '{owner}'")]
    UnknownHostType { owner: String, type_name: String },
}
