//! Nutrition calculation module
//!
//! Household unit conversion, nutrient aggregation, daily values and the
//! label summary builder. Everything here is pure and synchronous.

pub mod aggregator;
pub mod daily_values;
pub mod nutrients;
pub mod serving;
pub mod summary;
pub mod units;

pub use aggregator::{aggregate, aggregate_calories, aggregate_first_of, contribution};
pub use daily_values::{DailyValueTable, PercentDailyValue};
pub use nutrients::{TrackedNutrient, CALORIE_CHAIN};
pub use serving::{
    resolve_mass_grams, validate_quantity, validate_servings_per_container, NutritionError,
    NutritionResult, DEFAULT_QUANTITY, MAX_QUANTITY, MAX_SERVINGS_PER_CONTAINER,
};
pub use summary::{build_summary, LabelEngine};
pub use units::{HouseholdUnit, UnitTable, DEFAULT_UNIT};
