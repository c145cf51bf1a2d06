//! NutriFacts Status Tool
//!
//! Runtime status and usage instructions for the NutriFacts service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::Database;
use crate::models::{LabelSettings, SelectedItem};

/// Label building instructions for AI assistants
pub const LABEL_INSTRUCTIONS: &str = r#"
# NutriFacts Label Instructions

NutriFacts builds an FDA-style Nutrition Facts label from foods in USDA
FoodData Central.

## Workflow

1. `search_foods` with a query such as "rolled oats". Results are cached so
   they can be added to the label. Use `page` with `next_page` /
   `has_previous` to move through results.
2. `add_food_to_label` with the `fdc_id` from the search. `quantity`
   defaults to 1 and `unit` defaults to "cup".
3. Repeat for every ingredient. The same food may be added more than once;
   each addition is its own entry.
4. `set_servings_per_container` if the recipe makes more than one serving.
5. `get_nutrition_label` to review, `export_nutrition_label` to save a PDF
   or text file.

## Units

Call `list_household_units` for the table. All nutrient data is per 100 g,
so each unit is converted to grams first:

| Unit  | Grams |
|-------|-------|
| cup   | 240   |
| tbsp  | 15    |
| tsp   | 5     |
| fl oz | 30    |
| oz    | 28    |
| slice | 1     |
| gr/ml | 1     |

Unknown units count as 1 g per unit; the entry comes back with
`unit_recognized: false`. Prefer "gr/ml" with a gram weight when a
household measure does not fit.

## Editing

- `list_label_entries` shows every entry with its `id`.
- `update_label_entry` changes the quantity and/or unit of one entry.
- `remove_label_entry` removes one entry; `clear_label` removes all.

## Reading the label

- Amounts are shown to 2 decimal places; totals are computed unrounded.
- "Total" amounts are per serving times servings per container.
- % Daily Value uses the 2,000 calorie reference values and is shown as
  "-" when a nutrient has no reference value.
- Calories use Atwater General, then Atwater Specific, then plain Energy,
  whichever the food reports first.
"#;

/// Runtime status of the NutriFacts service
#[derive(Debug, Clone, Serialize)]
pub struct NutriFactsStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Label session
    pub label_entries: Option<i64>,
    pub servings_per_container: Option<f64>,
    pub usda_api_key_configured: bool,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    usda_api_key_configured: bool,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, usda_api_key_configured: bool) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            usda_api_key_configured,
        }
    }

    /// Get the current status
    pub fn get_status(&self, database: &Database) -> NutriFactsStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        // Status still reports when the session tables are unreadable
        let session = database
            .with_conn(|conn| Ok((SelectedItem::count(conn)?, LabelSettings::get(conn)?)))
            .ok();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutriFactsStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            label_entries: session.as_ref().map(|(count, _)| *count),
            servings_per_container: session.as_ref().map(|(_, s)| s.servings_per_container),
            usda_api_key_configured: self.usda_api_key_configured,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    #[test]
    fn test_status_reports_session() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| run_migrations(conn)).unwrap();

        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/nutrifacts.db"), false);
        let status = tracker.get_status(&db);
        assert_eq!(status.label_entries, Some(0));
        assert_eq!(status.servings_per_container, Some(1.0));
        assert!(status.database_size_bytes.is_none());
        assert!(!status.usda_api_key_configured);
        assert_eq!(status.process_id, std::process::id());
    }

    #[test]
    fn test_status_without_schema() {
        let db = Database::in_memory().unwrap();
        let status = StatusTracker::new(PathBuf::from("nowhere.db"), true).get_status(&db);
        assert!(status.label_entries.is_none());
    }
}
