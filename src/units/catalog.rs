//! Unit catalog
//!
//! The fixed table of measurement units recognized for ingredient
//! quantities, and label resolution against it.

use serde::{Deserialize, Serialize};

use super::UnitError;

/// Family of a measurement unit; only units of the same family convert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitFamily {
    /// Converted through milliliters
    Volume,
    /// Converted through grams
    Mass,
    /// Discrete items (leaf, clove), never converted
    Count,
}

impl UnitFamily {
    /// Base unit label of the family, if it has one
    pub fn base_label(&self) -> Option<&'static str> {
        match self {
            UnitFamily::Volume => Some(ML.label),
            UnitFamily::Mass => Some(G.label),
            UnitFamily::Count => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitFamily::Volume => "volume",
            UnitFamily::Mass => "mass",
            UnitFamily::Count => "count",
        }
    }
}

/// How one unit relates to its family's base unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure {
    /// Milliliters in one of this unit
    Volume(f64),
    /// Grams in one of this unit
    Mass(f64),
    Count,
}

/// A recognized unit label with its family and base factor
#[derive(Debug, PartialEq)]
pub struct UnitDefinition {
    pub label: &'static str,
    pub measure: Measure,
}

impl UnitDefinition {
    const fn volume(label: &'static str, ml: f64) -> Self {
        Self {
            label,
            measure: Measure::Volume(ml),
        }
    }

    const fn mass(label: &'static str, grams: f64) -> Self {
        Self {
            label,
            measure: Measure::Mass(grams),
        }
    }

    const fn count(label: &'static str) -> Self {
        Self {
            label,
            measure: Measure::Count,
        }
    }

    pub fn family(&self) -> UnitFamily {
        match self.measure {
            Measure::Volume(_) => UnitFamily::Volume,
            Measure::Mass(_) => UnitFamily::Mass,
            Measure::Count => UnitFamily::Count,
        }
    }

    /// One of this unit expressed in the family's base unit; `None` for count units
    pub fn base_factor(&self) -> Option<f64> {
        match self.measure {
            Measure::Volume(factor) | Measure::Mass(factor) => Some(factor),
            Measure::Count => None,
        }
    }
}

// ============================================================================
// Volume units (base: milliliter)
// ============================================================================

pub static ML: UnitDefinition = UnitDefinition::volume("ml", 1.00);
pub static TSP: UnitDefinition = UnitDefinition::volume("tsp", 4.93);
pub static TBSP: UnitDefinition = UnitDefinition::volume("tbsp", 14.79);
pub static FL_OZ: UnitDefinition = UnitDefinition::volume("fl oz", 29.57);
pub static CUP: UnitDefinition = UnitDefinition::volume("cup", 236.59);
pub static L: UnitDefinition = UnitDefinition::volume("l", 1000.00);

// ============================================================================
// Mass units (base: gram)
// ============================================================================

pub static G: UnitDefinition = UnitDefinition::mass("g", 1.00);
pub static OZ: UnitDefinition = UnitDefinition::mass("oz", 28.35);
pub static LB: UnitDefinition = UnitDefinition::mass("lb", 453.59);

// ============================================================================
// Count units
// ============================================================================

pub static LEAF: UnitDefinition = UnitDefinition::count("leaf");
pub static CLOVE: UnitDefinition = UnitDefinition::count("clove");
pub static TORTILLA: UnitDefinition = UnitDefinition::count("tortilla");

static CATALOG: [&UnitDefinition; 12] = [
    &ML, &TSP, &TBSP, &FL_OZ, &CUP, &L, &G, &OZ, &LB, &LEAF, &CLOVE, &TORTILLA,
];

/// Every recognized unit, volume first, then mass, then count
pub fn catalog() -> &'static [&'static UnitDefinition] {
    &CATALOG
}

/// Resolve a unit label, ignoring case and surrounding whitespace
pub fn resolve(label: &str) -> Result<&'static UnitDefinition, UnitError> {
    let normalized = label.trim().to_lowercase();

    CATALOG
        .iter()
        .copied()
        .find(|unit| unit.label == normalized)
        .ok_or_else(|| UnitError::UnknownUnit(label.to_string()))
}
