//! FoodData Central nutrient codes and the nutrients shown on the label

use serde::{Deserialize, Serialize};

/// Energy (kcal)
pub const ENERGY: i64 = 1008;
/// Energy, Atwater General Factors (kcal)
pub const ENERGY_ATWATER_GENERAL: i64 = 2047;
/// Energy, Atwater Specific Factors (kcal)
pub const ENERGY_ATWATER_SPECIFIC: i64 = 2048;
/// Protein (g)
pub const PROTEIN: i64 = 1003;
/// Total lipid (fat) (g)
pub const TOTAL_FAT: i64 = 1004;
/// Carbohydrate, by difference (g)
pub const TOTAL_CARBOHYDRATE: i64 = 1005;
/// Fiber, total dietary (g)
pub const DIETARY_FIBER: i64 = 1079;
/// Sodium, Na (mg)
pub const SODIUM: i64 = 1093;
/// Cholesterol (mg)
pub const CHOLESTEROL: i64 = 1253;
/// Fatty acids, total saturated (g)
pub const SATURATED_FAT: i64 = 1258;

/// Energy codes in priority order. Providers report calories under different
/// codes; per food, only the first one present is used.
pub const CALORIE_CHAIN: [i64; 3] = [ENERGY_ATWATER_GENERAL, ENERGY_ATWATER_SPECIFIC, ENERGY];

/// A nutrient row on the Nutrition Facts label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedNutrient {
    Calories,
    TotalFat,
    SaturatedFat,
    Cholesterol,
    Sodium,
    TotalCarbohydrate,
    DietaryFiber,
    Protein,
}

impl TrackedNutrient {
    /// Label display order
    pub const ALL: [TrackedNutrient; 8] = [
        TrackedNutrient::Calories,
        TrackedNutrient::TotalFat,
        TrackedNutrient::SaturatedFat,
        TrackedNutrient::Cholesterol,
        TrackedNutrient::Sodium,
        TrackedNutrient::TotalCarbohydrate,
        TrackedNutrient::DietaryFiber,
        TrackedNutrient::Protein,
    ];

    /// Display name on the label
    pub fn label(&self) -> &'static str {
        match self {
            TrackedNutrient::Calories => "Calories",
            TrackedNutrient::TotalFat => "Total Fat",
            TrackedNutrient::SaturatedFat => "Saturated Fat",
            TrackedNutrient::Cholesterol => "Cholesterol",
            TrackedNutrient::Sodium => "Sodium",
            TrackedNutrient::TotalCarbohydrate => "Total Carbohydrate",
            TrackedNutrient::DietaryFiber => "Dietary Fiber",
            TrackedNutrient::Protein => "Protein",
        }
    }

    /// Nutrient codes to try for one food, in priority order
    pub fn source_ids(&self) -> &'static [i64] {
        match self {
            TrackedNutrient::Calories => &CALORIE_CHAIN,
            TrackedNutrient::TotalFat => &[TOTAL_FAT],
            TrackedNutrient::SaturatedFat => &[SATURATED_FAT],
            TrackedNutrient::Cholesterol => &[CHOLESTEROL],
            TrackedNutrient::Sodium => &[SODIUM],
            TrackedNutrient::TotalCarbohydrate => &[TOTAL_CARBOHYDRATE],
            TrackedNutrient::DietaryFiber => &[DIETARY_FIBER],
            TrackedNutrient::Protein => &[PROTEIN],
        }
    }

    /// Code used to look up the daily reference value
    pub fn reference_id(&self) -> i64 {
        match self {
            TrackedNutrient::Calories => ENERGY,
            other => other.source_ids()[0],
        }
    }

    /// Unit shown when no selected food reports this nutrient
    pub fn default_unit(&self) -> &'static str {
        match self {
            TrackedNutrient::Calories => "kcal",
            TrackedNutrient::Cholesterol | TrackedNutrient::Sodium => "mg",
            _ => "g",
        }
    }

    /// Sub-rows are indented under their parent on the label
    pub fn is_indented(&self) -> bool {
        matches!(self, TrackedNutrient::SaturatedFat | TrackedNutrient::DietaryFiber)
    }
}
