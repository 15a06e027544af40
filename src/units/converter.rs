//! Unit conversion
//!
//! Converts amounts between units of the same family through the family's
//! base unit.

use super::catalog::{resolve, UnitDefinition};
use super::UnitError;

/// Round to two decimal places, the precision shown on nutrition labels
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert `amount` of `from` into `to`
///
/// Both units must share a family that has a base factor. The ratio is
/// computed at full precision and rounded once, to two decimals, at the end
/// of the call. Chaining calls (A -> B -> C) therefore rounds at every hop.
pub fn convert(amount: f64, from: &UnitDefinition, to: &UnitDefinition) -> Result<f64, UnitError> {
    if from.family() != to.family() {
        return Err(UnitError::incompatible(from, to));
    }

    match (from.base_factor(), to.base_factor()) {
        (Some(from_factor), Some(to_factor)) => Ok(round2(amount * from_factor / to_factor)),
        _ => Err(UnitError::incompatible(from, to)),
    }
}

/// Resolve both labels and convert
pub fn convert_labels(amount: f64, from: &str, to: &str) -> Result<f64, UnitError> {
    let from = resolve(from)?;
    let to = resolve(to)?;
    convert(amount, from, to)
}

/// Express an amount in its family's base unit (ml or g)
pub fn to_base(amount: f64, unit: &UnitDefinition) -> Result<f64, UnitError> {
    match unit.family().base_label() {
        Some(base) => convert(amount, unit, resolve(base)?),
        None => Err(UnitError::incompatible(unit, unit)),
    }
}
