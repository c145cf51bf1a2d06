//! Household unit conversion table
//!
//! Maps a household measure (cup, tbsp, slice) to its gram/milliliter
//! equivalent for one unit of that measure.

use std::collections::BTreeMap;

use serde::Serialize;

// ============================================================================
// Household Measure Equivalents (grams or milliliters per unit)
// ============================================================================

/// Grams/ml per cup
pub const G_PER_CUP: f64 = 240.0;
/// Grams/ml per tablespoon
pub const G_PER_TBSP: f64 = 15.0;
/// Grams/ml per teaspoon
pub const G_PER_TSP: f64 = 5.0;
/// Grams/ml per fluid ounce
pub const G_PER_FL_OZ: f64 = 30.0;
/// Grams per ounce
pub const G_PER_OZ: f64 = 28.0;
/// Grams per slice
pub const G_PER_SLICE: f64 = 1.0;
/// Direct gram/ml entry
pub const G_PER_GRAM_OR_ML: f64 = 1.0;

/// Unit applied when a food is selected without one
pub const DEFAULT_UNIT: &str = "cup";

/// Factor used for any unit missing from the table
pub const FALLBACK_FACTOR: f64 = 1.0;

/// A single household unit and its metric equivalent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseholdUnit {
    pub name: String,
    pub grams: f64,
}

/// Read-only household unit table
///
/// Replace the whole table with [`UnitTable::from_entries`]; there is no
/// per-entry mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitTable {
    factors: BTreeMap<String, f64>,
}

impl UnitTable {
    /// The standard US household measures
    pub fn standard() -> Self {
        Self::from_entries([
            ("cup", G_PER_CUP),
            ("tbsp", G_PER_TBSP),
            ("tsp", G_PER_TSP),
            ("fl oz", G_PER_FL_OZ),
            ("oz", G_PER_OZ),
            ("slice", G_PER_SLICE),
            ("gr/ml", G_PER_GRAM_OR_ML),
        ])
    }

    /// Build a table from `(name, grams per unit)` pairs
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let factors = entries
            .into_iter()
            .map(|(name, grams)| (normalize(name.as_ref()), grams))
            .collect();
        Self { factors }
    }

    /// Grams per unit, or `None` if the unit is not in the table
    pub fn lookup(&self, unit: &str) -> Option<f64> {
        self.factors.get(&normalize(unit)).copied()
    }

    /// Grams per unit, falling back to 1 for unknown units
    pub fn factor(&self, unit: &str) -> f64 {
        self.lookup(unit).unwrap_or(FALLBACK_FACTOR)
    }

    /// Whether the unit is in the table
    pub fn is_known(&self, unit: &str) -> bool {
        self.lookup(unit).is_some()
    }

    /// All units, sorted by name
    pub fn units(&self) -> Vec<HouseholdUnit> {
        self.factors
            .iter()
            .map(|(name, grams)| HouseholdUnit {
                name: name.clone(),
                grams: *grams,
            })
            .collect()
    }
}

impl Default for UnitTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn normalize(unit: &str) -> String {
    unit.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_factors() {
        let table = UnitTable::standard();
        assert_eq!(table.factor("cup"), 240.0);
        assert_eq!(table.factor("tbsp"), 15.0);
        assert_eq!(table.factor("tsp"), 5.0);
        assert_eq!(table.factor("fl oz"), 30.0);
        assert_eq!(table.factor("oz"), 28.0);
        assert_eq!(table.factor("slice"), 1.0);
        assert_eq!(table.factor("gr/ml"), 1.0);
    }

    #[test]
    fn test_lookup_ignores_case_and_whitespace() {
        let table = UnitTable::standard();
        assert_eq!(table.lookup("  Cup "), Some(240.0));
        assert_eq!(table.lookup("FL OZ"), Some(30.0));
    }

    #[test]
    fn test_unknown_unit_falls_back_to_one() {
        let table = UnitTable::standard();
        assert_eq!(table.lookup("bushel"), None);
        assert_eq!(table.factor("bushel"), 1.0);
        assert!(!table.is_known("bushel"));
        assert!(table.is_known("tbsp"));
    }

    #[test]
    fn test_replaced_table() {
        let table = UnitTable::from_entries([("scoop", 32.0)]);
        assert_eq!(table.factor("scoop"), 32.0);
        // The standard units are gone once the table is replaced
        assert_eq!(table.lookup("cup"), None);
        assert_eq!(table.units().len(), 1);
    }
}
