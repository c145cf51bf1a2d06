//! Nutrition label model
//!
//! Derived values only; a summary is rebuilt from the selection on every
//! change and never edited in place.

use serde::Serialize;

use crate::nutrition::{PercentDailyValue, TrackedNutrient};

/// Sum of one nutrient across the selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NutrientTotals {
    pub per_serving: f64,
    pub total: f64,
}

/// One nutrient line on the label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelRow {
    pub nutrient: TrackedNutrient,
    pub label: &'static str,
    pub unit: String,
    pub indented: bool,
    pub amount_per_serving: f64,
    pub amount_total: f64,
    pub percent_daily_value: PercentDailyValue,
}

impl LabelRow {
    /// Per-serving amount to 2 decimal places
    pub fn display_per_serving(&self) -> String {
        format_amount(self.amount_per_serving)
    }

    /// Whole-container amount to 2 decimal places
    pub fn display_total(&self) -> String {
        format_amount(self.amount_total)
    }
}

/// Aggregated Nutrition Facts for the selected foods
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelSummary {
    pub servings_per_container: f64,
    pub total_mass_grams: f64,
    pub calories_per_serving: f64,
    pub calories_total: f64,
    pub rows: Vec<LabelRow>,
    pub ingredients: String,
    pub food_count: usize,
}

impl LabelSummary {
    pub fn row(&self, nutrient: TrackedNutrient) -> Option<&LabelRow> {
        self.rows.iter().find(|r| r.nutrient == nutrient)
    }

    /// Rows below the calorie line
    pub fn nutrient_rows(&self) -> impl Iterator<Item = &LabelRow> {
        self.rows.iter().filter(|r| r.nutrient != TrackedNutrient::Calories)
    }

    pub fn is_empty(&self) -> bool {
        self.food_count == 0
    }
}

/// Round for display; sums are kept unrounded
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}
