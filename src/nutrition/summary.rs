//! Label summary builder
//!
//! [`LabelEngine`] holds the unit and daily-value tables and turns a
//! selection into a [`LabelSummary`].

use super::aggregator::{aggregate, aggregate_calories, aggregate_first_of};
use super::daily_values::{DailyValueTable, PercentDailyValue};
use super::nutrients::TrackedNutrient;
use super::serving::{resolve_mass_grams, NutritionResult};
use super::units::UnitTable;
use crate::models::{LabelRow, LabelSummary, NutrientTotals, SelectionEntry};

/// Calculation engine with injected reference tables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelEngine {
    units: UnitTable,
    daily_values: DailyValueTable,
}

impl LabelEngine {
    pub fn new(units: UnitTable, daily_values: DailyValueTable) -> Self {
        Self { units, daily_values }
    }

    /// Engine with the standard household units and FDA daily values
    pub fn standard() -> Self {
        Self::new(UnitTable::standard(), DailyValueTable::standard())
    }

    pub fn units(&self) -> &UnitTable {
        &self.units
    }

    pub fn daily_values(&self) -> &DailyValueTable {
        &self.daily_values
    }

    pub fn resolve_mass_grams(&self, unit: &str, quantity: f64) -> NutritionResult<f64> {
        resolve_mass_grams(&self.units, unit, quantity)
    }

    pub fn aggregate(
        &self,
        entries: &[SelectionEntry],
        nutrient_id: i64,
        servings_per_container: f64,
    ) -> NutrientTotals {
        aggregate(&self.units, entries, nutrient_id, servings_per_container)
    }

    pub fn aggregate_calories(
        &self,
        entries: &[SelectionEntry],
        servings_per_container: f64,
    ) -> NutrientTotals {
        aggregate_calories(&self.units, entries, servings_per_container)
    }

    pub fn percent_daily_value(&self, nutrient_id: i64, amount: f64) -> PercentDailyValue {
        self.daily_values.percent_daily_value(nutrient_id, amount)
    }

    /// Build the full label for a selection
    ///
    /// Pure: the same entries and servings always give the same summary.
    pub fn build_summary(&self, entries: &[SelectionEntry], servings_per_container: f64) -> LabelSummary {
        let total_mass_grams = entries
            .iter()
            .map(|e| e.mass_grams(&self.units))
            .fold(0.0, |acc, x| acc + x);

        let rows: Vec<LabelRow> = TrackedNutrient::ALL
            .iter()
            .map(|nutrient| self.build_row(*nutrient, entries, servings_per_container))
            .collect();

        let calories = rows
            .iter()
            .find(|r| r.nutrient == TrackedNutrient::Calories)
            .map(|r| (r.amount_per_serving, r.amount_total))
            .unwrap_or_default();

        let ingredients = entries
            .iter()
            .map(|e| e.food().description.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        tracing::debug!(
            foods = entries.len(),
            total_mass_grams,
            servings_per_container,
            "Built label summary"
        );

        LabelSummary {
            servings_per_container,
            total_mass_grams,
            calories_per_serving: calories.0,
            calories_total: calories.1,
            rows,
            ingredients,
            food_count: entries.len(),
        }
    }

    fn build_row(
        &self,
        nutrient: TrackedNutrient,
        entries: &[SelectionEntry],
        servings_per_container: f64,
    ) -> LabelRow {
        let ids = nutrient.source_ids();
        let totals = aggregate_first_of(&self.units, entries, ids, servings_per_container);

        // Units are carried through from the data, never converted
        let unit = entries
            .iter()
            .find_map(|e| e.food().first_nutrient_of(ids))
            .map(|sample| sample.unit.clone())
            .unwrap_or_else(|| nutrient.default_unit().to_string());

        LabelRow {
            nutrient,
            label: nutrient.label(),
            unit,
            indented: nutrient.is_indented(),
            amount_per_serving: totals.per_serving,
            amount_total: totals.total,
            percent_daily_value: self.percent_daily_value(nutrient.reference_id(), totals.per_serving),
        }
    }
}

/// Build a label with the standard tables
pub fn build_summary(entries: &[SelectionEntry], servings_per_container: f64) -> LabelSummary {
    LabelEngine::standard().build_summary(entries, servings_per_container)
}
