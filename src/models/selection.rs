//! Selection model
//!
//! The foods on the current label with their serving parameters, and the
//! persisted label session that holds them.

use std::collections::HashMap;
use std::sync::Arc;

use rusqlite::{params, Connection, Row};
use serde::Serialize;

use super::FoodRecord;
use crate::db::{DbError, DbResult};
use crate::nutrition::{
    validate_quantity, validate_servings_per_container, NutritionResult, UnitTable,
    DEFAULT_QUANTITY, DEFAULT_UNIT,
};

/// A food plus the user's chosen serving
///
/// Defaults are applied once, at construction; the quantity is always
/// greater than 0 and at most `MAX_QUANTITY`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEntry {
    food: Arc<FoodRecord>,
    quantity: f64,
    unit: String,
}

impl SelectionEntry {
    /// Create an entry, defaulting to 1 cup
    pub fn new(food: Arc<FoodRecord>, quantity: Option<f64>, unit: Option<&str>) -> NutritionResult<Self> {
        let quantity = validate_quantity(quantity.unwrap_or(DEFAULT_QUANTITY))?;
        let unit = unit
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_UNIT)
            .to_string();

        Ok(Self { food, quantity, unit })
    }

    pub fn food(&self) -> &FoodRecord {
        &self.food
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Gram-equivalent of this serving
    pub fn mass_grams(&self, units: &UnitTable) -> f64 {
        self.quantity * units.factor(&self.unit)
    }

    /// Copy of this entry with a new serving
    ///
    /// `None` or a blank unit keeps the current value.
    pub fn with_serving(&self, quantity: Option<f64>, unit: Option<&str>) -> NutritionResult<Self> {
        let unit = unit.map(str::trim).filter(|u| !u.is_empty()).unwrap_or(&self.unit);
        Self::new(
            Arc::clone(&self.food),
            Some(quantity.unwrap_or(self.quantity)),
            Some(unit),
        )
    }
}

/// A selection entry as stored in the label session
#[derive(Debug, Clone)]
pub struct SelectedItem {
    pub id: i64,
    pub position: i64,
    pub entry: SelectionEntry,
    pub created_at: String,
    pub updated_at: String,
}

/// Row shape before the food is attached
struct SelectedRow {
    id: i64,
    position: i64,
    fdc_id: i64,
    quantity: f64,
    unit: String,
    created_at: String,
    updated_at: String,
}

impl SelectedRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            position: row.get("position")?,
            fdc_id: row.get("fdc_id")?,
            quantity: row.get("quantity")?,
            unit: row.get("unit")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

impl SelectedItem {
    fn attach(row: SelectedRow, food: Arc<FoodRecord>) -> DbResult<Self> {
        let entry = SelectionEntry::new(food, Some(row.quantity), Some(&row.unit))?;

        Ok(Self {
            id: row.id,
            position: row.position,
            entry,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// Append an entry to the end of the label
    pub fn insert(conn: &Connection, entry: &SelectionEntry) -> DbResult<Self> {
        let next_position: i64 = conn.query_row(
            "SELECT COALESCE(MAX(position), 0) + 1 FROM selection_entries",
            [],
            |row| row.get(0),
        )?;

        conn.execute(
            "INSERT INTO selection_entries (position, fdc_id, quantity, unit) VALUES (?1, ?2, ?3, ?4)",
            params![next_position, entry.food().fdc_id, entry.quantity(), entry.unit()],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::NotFound(format!("Selection entry {}", id)))
    }

    /// Get one entry with its food
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM selection_entries WHERE id = ?1")?;

        let row = match stmt.query_row([id], SelectedRow::from_row) {
            Ok(row) => row,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let food = FoodRecord::get_by_fdc_id(conn, row.fdc_id)?
            .ok_or_else(|| DbError::NotFound(format!("Food {}", row.fdc_id)))?;

        Ok(Some(Self::attach(row, Arc::new(food))?))
    }

    /// All entries in label order
    ///
    /// Entries for the same food share one record.
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM selection_entries ORDER BY position ASC, id ASC")?;
        let rows = stmt
            .query_map([], SelectedRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut foods: HashMap<i64, Arc<FoodRecord>> = HashMap::new();
        let mut items = Vec::with_capacity(rows.len());

        for row in rows {
            let food = match foods.get(&row.fdc_id) {
                Some(food) => Arc::clone(food),
                None => {
                    let food = FoodRecord::get_by_fdc_id(conn, row.fdc_id)?
                        .ok_or_else(|| DbError::NotFound(format!("Food {}", row.fdc_id)))?;
                    let food = Arc::new(food);
                    foods.insert(row.fdc_id, Arc::clone(&food));
                    food
                }
            };
            items.push(Self::attach(row, food)?);
        }

        Ok(items)
    }

    /// Just the entries, in label order
    pub fn list_entries(conn: &Connection) -> DbResult<Vec<SelectionEntry>> {
        Ok(Self::list(conn)?.into_iter().map(|item| item.entry).collect())
    }

    /// Store a new serving for an entry
    pub fn update_serving(conn: &Connection, id: i64, entry: &SelectionEntry) -> DbResult<Option<Self>> {
        let rows = conn.execute(
            "UPDATE selection_entries SET quantity = ?1, unit = ?2, updated_at = datetime('now') WHERE id = ?3",
            params![entry.quantity(), entry.unit(), id],
        )?;

        if rows == 0 {
            return Ok(None);
        }
        Self::get_by_id(conn, id)
    }

    /// Remove one entry
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM selection_entries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Remove every entry, returning how many were removed
    pub fn clear(conn: &Connection) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM selection_entries", [])?)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        Ok(conn.query_row("SELECT COUNT(*) FROM selection_entries", [], |row| row.get(0))?)
    }
}

/// Label-wide settings
#[derive(Debug, Clone, Serialize)]
pub struct LabelSettings {
    pub servings_per_container: f64,
    pub updated_at: String,
}

impl LabelSettings {
    pub fn get(conn: &Connection) -> DbResult<Self> {
        let settings = conn.query_row(
            "SELECT servings_per_container, updated_at FROM label_settings WHERE id = 1",
            [],
            |row| {
                Ok(Self {
                    servings_per_container: row.get(0)?,
                    updated_at: row.get(1)?,
                })
            },
        )?;
        Ok(settings)
    }

    /// Store servings per container
    pub fn set_servings_per_container(conn: &Connection, servings: f64) -> DbResult<Self> {
        let servings = validate_servings_per_container(servings)?;

        conn.execute(
            "UPDATE label_settings SET servings_per_container = ?1, updated_at = datetime('now') WHERE id = 1",
            [servings],
        )?;
        Self::get(conn)
    }
}
