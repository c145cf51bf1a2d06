//! Nutrient aggregation across the selected foods
//!
//! Samples are stored per 100 g, so each food's sample is rescaled to the
//! food's resolved mass before summing. Nothing is rounded here.

use super::nutrients::CALORIE_CHAIN;
use super::units::UnitTable;
use crate::models::{NutrientTotals, SelectionEntry};

/// Sum one nutrient over all entries
///
/// Foods without the nutrient contribute 0.
pub fn aggregate(
    units: &UnitTable,
    entries: &[SelectionEntry],
    nutrient_id: i64,
    servings_per_container: f64,
) -> NutrientTotals {
    aggregate_first_of(units, entries, &[nutrient_id], servings_per_container)
}

/// Sum calories, using the first energy code each food reports
pub fn aggregate_calories(
    units: &UnitTable,
    entries: &[SelectionEntry],
    servings_per_container: f64,
) -> NutrientTotals {
    aggregate_first_of(units, entries, &CALORIE_CHAIN, servings_per_container)
}

/// Sum a nutrient that may be reported under several codes
///
/// For each food only the first code present in `ids` counts, so a food is
/// never counted twice.
pub fn aggregate_first_of(
    units: &UnitTable,
    entries: &[SelectionEntry],
    ids: &[i64],
    servings_per_container: f64,
) -> NutrientTotals {
    // fold from +0.0; `sum` of an empty f64 iterator is -0.0
    let per_serving = entries
        .iter()
        .map(|entry| contribution(units, entry, ids))
        .fold(0.0, |acc, x| acc + x);

    NutrientTotals {
        per_serving,
        total: per_serving * servings_per_container,
    }
}

/// One food's share of a nutrient at its resolved mass
pub fn contribution(units: &UnitTable, entry: &SelectionEntry, ids: &[i64]) -> f64 {
    match entry.food().first_nutrient_of(ids) {
        Some(sample) => sample.amount_per_100 * entry.mass_grams(units) / 100.0,
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::{FoodRecord, NutrientSample};
    use crate::nutrition::nutrients::{ENERGY, ENERGY_ATWATER_GENERAL, ENERGY_ATWATER_SPECIFIC, PROTEIN, TOTAL_FAT};

    const EPSILON: f64 = 1e-9;

    fn entry(food: FoodRecord, quantity: f64, unit: &str) -> SelectionEntry {
        SelectionEntry::new(Arc::new(food), Some(quantity), Some(unit)).unwrap()
    }

    fn oats() -> FoodRecord {
        FoodRecord::new(
            1,
            "Oats",
            vec![
                NutrientSample::new(ENERGY, "Energy", 389.0, "kcal"),
                NutrientSample::new(TOTAL_FAT, "Total lipid (fat)", 6.9, "g"),
                NutrientSample::new(PROTEIN, "Protein", 16.9, "g"),
            ],
        )
    }

    fn milk() -> FoodRecord {
        FoodRecord::new(
            2,
            "Milk",
            vec![
                NutrientSample::new(ENERGY_ATWATER_GENERAL, "Energy (Atwater General Factors)", 61.0, "kcal"),
                NutrientSample::new(TOTAL_FAT, "Total lipid (fat)", 3.3, "g"),
            ],
        )
    }

    #[test]
    fn test_scales_to_resolved_mass() {
        let units = UnitTable::standard();
        // 2 tbsp = 30g of oats: 6.9 * 30 / 100
        let entries = vec![entry(oats(), 2.0, "tbsp")];
        let fat = aggregate(&units, &entries, TOTAL_FAT, 1.0);
        assert!((fat.per_serving - 2.07).abs() < EPSILON);
        assert!((fat.total - 2.07).abs() < EPSILON);
    }

    #[test]
    fn test_total_uses_servings_per_container() {
        let units = UnitTable::standard();
        let entries = vec![entry(oats(), 100.0, "gr/ml")];
        let protein = aggregate(&units, &entries, PROTEIN, 3.0);
        assert!((protein.per_serving - 16.9).abs() < EPSILON);
        assert!((protein.total - 50.7).abs() < EPSILON);
    }

    #[test]
    fn test_additive_over_entries() {
        let units = UnitTable::standard();
        let a = entry(oats(), 0.5, "cup");
        let b = entry(milk(), 1.0, "cup");

        let both = aggregate(&units, &[a.clone(), b.clone()], TOTAL_FAT, 2.0);
        let only_a = aggregate(&units, &[a.clone()], TOTAL_FAT, 2.0);
        let only_b = aggregate(&units, &[b.clone()], TOTAL_FAT, 2.0);
        assert!((both.per_serving - (only_a.per_serving + only_b.per_serving)).abs() < EPSILON);
        assert!((both.total - (only_a.total + only_b.total)).abs() < EPSILON);

        // Order does not matter
        let reversed = aggregate(&units, &[b, a], TOTAL_FAT, 2.0);
        assert!((both.per_serving - reversed.per_serving).abs() < EPSILON);
    }

    #[test]
    fn test_missing_nutrient_contributes_zero() {
        let units = UnitTable::standard();
        let entries = vec![entry(milk(), 1.0, "cup")];
        let protein = aggregate(&units, &entries, PROTEIN, 1.0);
        assert_eq!(protein, NutrientTotals { per_serving: 0.0, total: 0.0 });
    }

    #[test]
    fn test_empty_selection() {
        let units = UnitTable::standard();
        let totals = aggregate_calories(&units, &[], 4.0);
        assert_eq!(totals, NutrientTotals::default());
        assert!(totals.per_serving.is_sign_positive());
        assert!(totals.total.is_sign_positive());
    }

    #[test]
    fn test_calorie_fallback_to_specific_factors() {
        let units = UnitTable::standard();
        let food = FoodRecord::new(
            3,
            "Bread",
            vec![NutrientSample::new(ENERGY_ATWATER_SPECIFIC, "Energy (Atwater Specific Factors)", 250.0, "kcal")],
        );
        let entries = vec![entry(food, 40.0, "slice")];
        let calories = aggregate_calories(&units, &entries, 1.0);
        assert!((calories.per_serving - 100.0).abs() < EPSILON);
    }

    #[test]
    fn test_calorie_chain_never_double_counts() {
        let units = UnitTable::standard();
        let food = FoodRecord::new(
            4,
            "Yogurt",
            vec![
                NutrientSample::new(ENERGY, "Energy", 100.0, "kcal"),
                NutrientSample::new(ENERGY_ATWATER_SPECIFIC, "Energy (Atwater Specific Factors)", 90.0, "kcal"),
                NutrientSample::new(ENERGY_ATWATER_GENERAL, "Energy (Atwater General Factors)", 80.0, "kcal"),
            ],
        );
        let entries = vec![entry(food, 100.0, "gr/ml")];
        let calories = aggregate_calories(&units, &entries, 1.0);
        assert!((calories.per_serving - 80.0).abs() < EPSILON);
    }

    #[test]
    fn test_each_food_picks_its_own_energy_code() {
        let units = UnitTable::standard();
        // oats report 1008, milk reports 2047
        let entries = vec![entry(oats(), 100.0, "gr/ml"), entry(milk(), 100.0, "gr/ml")];
        let calories = aggregate_calories(&units, &entries, 1.0);
        assert!((calories.per_serving - 450.0).abs() < EPSILON);
    }
}
