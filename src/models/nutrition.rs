//! Shared nutrition data structure
//!
//! Used by ingredients and recipe nutrition totals.

use serde::{Deserialize, Serialize};

use crate::units::round2;

/// Nutritional information
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nutrition {
    pub calories_kcal: f64,
    pub protein_g: f64,
    pub carbohydrates_g: f64,
    pub sugar_g: f64,
    pub fat_g: f64,
    pub saturated_fat_g: f64,
    pub fiber_g: f64,
    pub potassium_mg: f64,
    pub sodium_mg: f64,
    pub cholesterol_mg: f64,
}

impl Nutrition {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Field names paired with values, in column order
    pub fn entries(&self) -> [(&'static str, f64); 10] {
        [
            ("calories_kcal", self.calories_kcal),
            ("protein_g", self.protein_g),
            ("carbohydrates_g", self.carbohydrates_g),
            ("sugar_g", self.sugar_g),
            ("fat_g", self.fat_g),
            ("saturated_fat_g", self.saturated_fat_g),
            ("fiber_g", self.fiber_g),
            ("potassium_mg", self.potassium_mg),
            ("sodium_mg", self.sodium_mg),
            ("cholesterol_mg", self.cholesterol_mg),
        ]
    }

    /// Name of the first negative (or NaN) field, if any
    pub fn first_invalid(&self) -> Option<&'static str> {
        self.entries()
            .into_iter()
            .find(|(_, value)| value.is_nan() || *value < 0.0)
            .map(|(name, _)| name)
    }

    /// Scale nutrition values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        self.map(|v| v * multiplier)
    }

    /// Round every field to two decimals for display
    pub fn rounded(&self) -> Self {
        self.map(round2)
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            calories_kcal: f(self.calories_kcal),
            protein_g: f(self.protein_g),
            carbohydrates_g: f(self.carbohydrates_g),
            sugar_g: f(self.sugar_g),
            fat_g: f(self.fat_g),
            saturated_fat_g: f(self.saturated_fat_g),
            fiber_g: f(self.fiber_g),
            potassium_mg: f(self.potassium_mg),
            sodium_mg: f(self.sodium_mg),
            cholesterol_mg: f(self.cholesterol_mg),
        }
    }
}

impl std::ops::Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition {
            calories_kcal: self.calories_kcal + other.calories_kcal,
            protein_g: self.protein_g + other.protein_g,
            carbohydrates_g: self.carbohydrates_g + other.carbohydrates_g,
            sugar_g: self.sugar_g + other.sugar_g,
            fat_g: self.fat_g + other.fat_g,
            saturated_fat_g: self.saturated_fat_g + other.saturated_fat_g,
            fiber_g: self.fiber_g + other.fiber_g,
            potassium_mg: self.potassium_mg + other.potassium_mg,
            sodium_mg: self.sodium_mg + other.sodium_mg,
            cholesterol_mg: self.cholesterol_mg + other.cholesterol_mg,
        }
    }
}

impl std::ops::Mul<f64> for Nutrition {
    type Output = Nutrition;

    fn mul(self, multiplier: f64) -> Nutrition {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::zero(), |acc, n| acc + n)
    }
}
