//! Food Record model
//!
//! A food as reported by FoodData Central, with nutrients per 100 g/ml.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// One nutrient measurement, per 100 g (or ml) of the food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientSample {
    pub nutrient_id: i64,
    #[serde(default)]
    pub name: String,
    pub amount_per_100: f64,
    pub unit: String,
}

impl NutrientSample {
    pub fn new(nutrient_id: i64, name: &str, amount_per_100: f64, unit: &str) -> Self {
        Self {
            nutrient_id,
            name: name.to_string(),
            amount_per_100,
            unit: unit.to_string(),
        }
    }
}

/// A food entry from the search provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub fdc_id: i64,
    pub description: String,
    pub brand_owner: Option<String>,
    pub food_category: Option<String>,
    pub nutrients: Vec<NutrientSample>,
}

impl FoodRecord {
    pub fn new(fdc_id: i64, description: &str, nutrients: Vec<NutrientSample>) -> Self {
        Self {
            fdc_id,
            description: description.to_string(),
            brand_owner: None,
            food_category: None,
            nutrients,
        }
    }

    /// First sample with the given code; later duplicates are ignored
    pub fn nutrient(&self, nutrient_id: i64) -> Option<&NutrientSample> {
        self.nutrients.iter().find(|n| n.nutrient_id == nutrient_id)
    }

    /// First sample matching any code in `ids`, tried in order
    pub fn first_nutrient_of(&self, ids: &[i64]) -> Option<&NutrientSample> {
        ids.iter().find_map(|id| self.nutrient(*id))
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let nutrients_json: String = row.get("nutrients_json")?;
        let nutrients = serde_json::from_str(&nutrients_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Self {
            fdc_id: row.get("fdc_id")?,
            description: row.get("description")?,
            brand_owner: row.get("brand_owner")?,
            food_category: row.get("food_category")?,
            nutrients,
        })
    }

    /// Insert the record, refreshing a cached copy only while no label entry uses it
    ///
    /// Returns whether the stored row was written.
    pub fn upsert(conn: &Connection, record: &FoodRecord) -> DbResult<bool> {
        let nutrients_json = serde_json::to_string(&record.nutrients)?;
        let rows = conn.execute(
            r#"
            INSERT INTO foods (fdc_id, description, brand_owner, food_category, nutrients_json)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(fdc_id) DO UPDATE SET
                description = excluded.description,
                brand_owner = excluded.brand_owner,
                food_category = excluded.food_category,
                nutrients_json = excluded.nutrients_json,
                fetched_at = datetime('now')
            WHERE NOT EXISTS (
                SELECT 1 FROM selection_entries WHERE selection_entries.fdc_id = excluded.fdc_id
            )
            "#,
            params![
                record.fdc_id,
                record.description,
                record.brand_owner,
                record.food_category,
                nutrients_json,
            ],
        )?;
        Ok(rows > 0)
    }

    /// Get a cached food by FDC ID
    pub fn get_by_fdc_id(conn: &Connection, fdc_id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM foods WHERE fdc_id = ?1")?;

        let result = stmt.query_row([fdc_id], Self::from_row);
        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations, Database};

    fn apple() -> FoodRecord {
        let mut record = FoodRecord::new(
            171688,
            "Apples, raw, with skin",
            vec![
                NutrientSample::new(1008, "Energy", 52.0, "kcal"),
                NutrientSample::new(1004, "Total lipid (fat)", 0.17, "g"),
            ],
        );
        record.food_category = Some("Fruits and Fruit Juices".to_string());
        record
    }

    #[test]
    fn test_first_duplicate_wins() {
        let record = FoodRecord::new(
            1,
            "Dup",
            vec![
                NutrientSample::new(1004, "Total lipid (fat)", 3.0, "g"),
                NutrientSample::new(1004, "Total lipid (fat)", 9.0, "g"),
            ],
        );
        assert_eq!(record.nutrient(1004).map(|n| n.amount_per_100), Some(3.0));
        assert!(record.nutrient(1003).is_none());
    }

    #[test]
    fn test_first_nutrient_of_respects_order() {
        let record = FoodRecord::new(
            1,
            "Energy",
            vec![
                NutrientSample::new(1008, "Energy", 100.0, "kcal"),
                NutrientSample::new(2048, "Energy (Atwater Specific Factors)", 90.0, "kcal"),
            ],
        );
        let found = record.first_nutrient_of(&[2047, 2048, 1008]).unwrap();
        assert_eq!(found.nutrient_id, 2048);
    }

    #[test]
    fn test_upsert_and_get() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            migrations::run_migrations(conn)?;

            let record = apple();
            FoodRecord::upsert(conn, &record)?;
            let loaded = FoodRecord::get_by_fdc_id(conn, 171688)?.unwrap();
            assert_eq!(loaded, record);

            let mut renamed = record.clone();
            renamed.description = "Apple".to_string();
            FoodRecord::upsert(conn, &renamed)?;
            let loaded = FoodRecord::get_by_fdc_id(conn, 171688)?.unwrap();
            assert_eq!(loaded.description, "Apple");

            assert!(FoodRecord::get_by_fdc_id(conn, 42)?.is_none());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_upsert_keeps_copy_used_by_label() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            migrations::run_migrations(conn)?;
            assert!(FoodRecord::upsert(conn, &apple())?);
            conn.execute(
                "INSERT INTO selection_entries (position, fdc_id, quantity, unit) VALUES (1, 171688, 1.0, 'cup')",
                [],
            )?;

            let mut revised = apple();
            revised.nutrients[0].amount_per_100 = 60.0;
            assert!(!FoodRecord::upsert(conn, &revised)?);
            let loaded = FoodRecord::get_by_fdc_id(conn, 171688)?.unwrap();
            assert_eq!(loaded.nutrient(1008).map(|n| n.amount_per_100), Some(52.0));

            conn.execute("DELETE FROM selection_entries", [])?;
            assert!(FoodRecord::upsert(conn, &revised)?);
            let loaded = FoodRecord::get_by_fdc_id(conn, 171688)?.unwrap();
            assert_eq!(loaded.nutrient(1008).map(|n| n.amount_per_100), Some(60.0));
            Ok(())
        })
        .unwrap();
    }
}
