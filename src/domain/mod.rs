pub mod models;
pub mod sources;

pub use models::*;
pub use sources::{PeakRankLookup, RiotGateway, SchoolDirectory};

use thiserror::Error;

/// Raised when text does not name a known enum value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
