//! Data models
//!
//! Foods from the search provider, the label selection, and the derived label.

mod food_record;
mod label;
mod selection;

pub use food_record::{FoodRecord, NutrientSample};
pub use label::{format_amount, LabelRow, LabelSummary, NutrientTotals};
pub use selection::{LabelSettings, SelectedItem, SelectionEntry};
