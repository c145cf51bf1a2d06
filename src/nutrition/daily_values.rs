//! FDA reference daily values and %DV calculation

use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};

use super::nutrients::{
    CHOLESTEROL, DIETARY_FIBER, ENERGY, PROTEIN, SATURATED_FAT, SODIUM, TOTAL_CARBOHYDRATE,
    TOTAL_FAT,
};

/// Percentage of a daily reference intake
///
/// `NotApplicable` is used when a nutrient has no reference value (or a zero
/// one); reporting 0% there would be misleading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercentDailyValue {
    Percent(u32),
    NotApplicable,
}

impl PercentDailyValue {
    pub fn as_percent(&self) -> Option<u32> {
        match self {
            PercentDailyValue::Percent(p) => Some(*p),
            PercentDailyValue::NotApplicable => None,
        }
    }
}

impl fmt::Display for PercentDailyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentDailyValue::Percent(p) => write!(f, "{}%", p),
            PercentDailyValue::NotApplicable => f.write_str("-"),
        }
    }
}

impl Serialize for PercentDailyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PercentDailyValue::Percent(p) => serializer.serialize_u32(*p),
            PercentDailyValue::NotApplicable => serializer.serialize_str("-"),
        }
    }
}

/// Read-only table of daily reference values keyed by nutrient code
#[derive(Debug, Clone, PartialEq)]
pub struct DailyValueTable {
    references: HashMap<i64, f64>,
}

impl DailyValueTable {
    /// FDA reference values for a 2,000 calorie diet
    pub fn standard() -> Self {
        Self::from_entries([
            (ENERGY, 2000.0),
            (TOTAL_FAT, 65.0),
            (SATURATED_FAT, 20.0),
            (CHOLESTEROL, 300.0),
            (SODIUM, 2400.0),
            (TOTAL_CARBOHYDRATE, 300.0),
            (DIETARY_FIBER, 25.0),
            (PROTEIN, 50.0),
        ])
    }

    pub fn from_entries<I: IntoIterator<Item = (i64, f64)>>(entries: I) -> Self {
        Self {
            references: entries.into_iter().collect(),
        }
    }

    pub fn reference(&self, nutrient_id: i64) -> Option<f64> {
        self.references.get(&nutrient_id).copied()
    }

    /// Express `amount` as a whole-number percentage of the reference value
    pub fn percent_daily_value(&self, nutrient_id: i64, amount: f64) -> PercentDailyValue {
        match self.reference(nutrient_id) {
            Some(reference) if reference > 0.0 => {
                PercentDailyValue::Percent((amount / reference * 100.0).round() as u32)
            }
            _ => PercentDailyValue::NotApplicable,
        }
    }
}

impl Default for DailyValueTable {
    fn default() -> Self {
        Self::standard()
    }
}
