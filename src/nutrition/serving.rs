//! Serving resolution
//!
//! Converts a household quantity into a gram-equivalent mass.

use thiserror::Error;

use super::units::UnitTable;

/// Quantity applied when a food is selected without one
pub const DEFAULT_QUANTITY: f64 = 1.0;

/// Largest quantity of any unit accepted for one food
pub const MAX_QUANTITY: f64 = 1_000_000.0;

/// Largest servings-per-container multiplier accepted
pub const MAX_SERVINGS_PER_CONTAINER: f64 = 10_000.0;

/// Nutrition calculation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NutritionError {
    #[error("Invalid serving size {0}: must be greater than 0 and at most 1000000")]
    InvalidServingSize(f64),

    #[error("Invalid servings per container {0}: must be greater than 0 and at most 10000")]
    InvalidServingsPerContainer(f64),
}

/// Result type for nutrition calculations
pub type NutritionResult<T> = Result<T, NutritionError>;

/// Check that a serving quantity is usable
///
/// NaN fails both comparisons and is rejected with the rest.
pub fn validate_quantity(quantity: f64) -> NutritionResult<f64> {
    if quantity > 0.0 && quantity <= MAX_QUANTITY {
        Ok(quantity)
    } else {
        Err(NutritionError::InvalidServingSize(quantity))
    }
}

/// Check that a servings-per-container multiplier is usable
pub fn validate_servings_per_container(servings: f64) -> NutritionResult<f64> {
    if servings > 0.0 && servings <= MAX_SERVINGS_PER_CONTAINER {
        Ok(servings)
    } else {
        Err(NutritionError::InvalidServingsPerContainer(servings))
    }
}

/// Resolve `quantity` of `unit` to grams
///
/// Units missing from the table resolve with a factor of 1, so the quantity
/// is taken as grams.
pub fn resolve_mass_grams(table: &UnitTable, unit: &str, quantity: f64) -> NutritionResult<f64> {
    let quantity = validate_quantity(quantity)?;
    let grams = quantity * table.factor(unit);
    if grams.is_finite() {
        Ok(grams)
    } else {
        Err(NutritionError::InvalidServingSize(quantity))
    }
}
