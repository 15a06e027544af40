//! Measurement units
//!
//! Static unit catalog and same-family conversion for ingredient quantities.

pub mod catalog;
pub mod converter;

use thiserror::Error;

pub use catalog::{catalog, resolve, Measure, UnitDefinition, UnitFamily};
pub use converter::{convert, convert_labels, round2, to_base};

/// Unit resolution and conversion errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    #[error("Unknown unit: '{0}'")]
    UnknownUnit(String),

    #[error("Cannot convert '{from}' to '{to}'")]
    IncompatibleUnits { from: String, to: String },
}

impl UnitError {
    pub(crate) fn incompatible(from: &UnitDefinition, to: &UnitDefinition) -> Self {
        UnitError::IncompatibleUnits {
            from: from.label.to_string(),
            to: to.label.to_string(),
        }
    }
}
