//! Label selection tools
//!
//! Adding, editing and removing foods on the current label. Entries are
//! addressed by entry id, so two entries for the same food stay independent.

use std::sync::Arc;

use serde::Serialize;

use crate::db::{Database, DbError};
use crate::models::{FoodRecord, LabelSettings, SelectedItem, SelectionEntry};
use crate::nutrition::{LabelEngine, UnitTable};

/// One food on the label
#[derive(Debug, Serialize)]
pub struct LabelEntryView {
    pub id: i64,
    pub position: i64,
    pub fdc_id: i64,
    pub description: String,
    pub brand_owner: Option<String>,
    pub quantity: f64,
    pub unit: String,
    pub mass_grams: f64,
    /// False when the unit is unknown and counted as 1 g per unit
    pub unit_recognized: bool,
}

impl LabelEntryView {
    pub fn from_item(item: &SelectedItem, units: &UnitTable) -> Self {
        let entry = &item.entry;
        Self {
            id: item.id,
            position: item.position,
            fdc_id: entry.food().fdc_id,
            description: entry.food().description.clone(),
            brand_owner: entry.food().brand_owner.clone(),
            quantity: entry.quantity(),
            unit: entry.unit().to_string(),
            mass_grams: entry.mass_grams(units),
            unit_recognized: units.is_known(entry.unit()),
        }
    }
}

/// Response for add_food_to_label and update_label_entry
#[derive(Debug, Serialize)]
pub struct LabelEntryResponse {
    pub success: bool,
    pub entry: LabelEntryView,
    pub entry_count: i64,
    pub message: String,
}

/// Response for list_label_entries
#[derive(Debug, Serialize)]
pub struct ListLabelEntriesResponse {
    pub entries: Vec<LabelEntryView>,
    pub servings_per_container: f64,
    pub total_mass_grams: f64,
}

/// Response for remove_label_entry
#[derive(Debug, Serialize)]
pub struct RemoveLabelEntryResponse {
    pub success: bool,
    pub entry_id: i64,
    pub remaining: i64,
}

/// Response for clear_label
#[derive(Debug, Serialize)]
pub struct ClearLabelResponse {
    pub success: bool,
    pub removed: usize,
}

fn warn_unknown_unit(engine: &LabelEngine, unit: &str) {
    if !engine.units().is_known(unit) {
        tracing::warn!(unit, "Unknown household unit, counting 1 g per unit");
    }
}

/// Add a cached food to the end of the label
///
/// The food must have come back from a search first.
pub fn add_food_to_label(
    db: &Database,
    engine: &LabelEngine,
    fdc_id: i64,
    quantity: Option<f64>,
    unit: Option<&str>,
) -> Result<LabelEntryResponse, String> {
    let (item, entry_count) = db
        .with_transaction(|tx| {
            let food = FoodRecord::get_by_fdc_id(tx, fdc_id)?.ok_or_else(|| {
                DbError::NotFound(format!("Food {} (search for it before adding)", fdc_id))
            })?;
            let entry = SelectionEntry::new(Arc::new(food), quantity, unit)?;
            let item = SelectedItem::insert(tx, &entry)?;
            Ok((item, SelectedItem::count(tx)?))
        })
        .map_err(|e| e.to_string())?;

    warn_unknown_unit(engine, item.entry.unit());
    tracing::info!(fdc_id, entry_id = item.id, "Added food to label");

    let view = LabelEntryView::from_item(&item, engine.units());
    Ok(LabelEntryResponse {
        success: true,
        message: format!("Added {} {} of {}", view.quantity, view.unit, view.description),
        entry: view,
        entry_count,
    })
}

/// Change one entry's quantity and/or unit
pub fn update_label_entry(
    db: &Database,
    engine: &LabelEngine,
    entry_id: i64,
    quantity: Option<f64>,
    unit: Option<&str>,
) -> Result<LabelEntryResponse, String> {
    let (item, entry_count) = db
        .with_transaction(|tx| {
            let current = SelectedItem::get_by_id(tx, entry_id)?
                .ok_or_else(|| DbError::NotFound(format!("Label entry {}", entry_id)))?;
            let entry = current.entry.with_serving(quantity, unit)?;
            let item = SelectedItem::update_serving(tx, entry_id, &entry)?
                .ok_or_else(|| DbError::NotFound(format!("Label entry {}", entry_id)))?;
            Ok((item, SelectedItem::count(tx)?))
        })
        .map_err(|e| e.to_string())?;

    warn_unknown_unit(engine, item.entry.unit());

    let view = LabelEntryView::from_item(&item, engine.units());
    Ok(LabelEntryResponse {
        success: true,
        message: format!("Entry {} is now {} {}", view.id, view.quantity, view.unit),
        entry: view,
        entry_count,
    })
}

/// Remove one entry from the label
pub fn remove_label_entry(db: &Database, entry_id: i64) -> Result<RemoveLabelEntryResponse, String> {
    db.with_transaction(|tx| {
        if !SelectedItem::delete(tx, entry_id)? {
            return Err(DbError::NotFound(format!("Label entry {}", entry_id)));
        }
        Ok(RemoveLabelEntryResponse {
            success: true,
            entry_id,
            remaining: SelectedItem::count(tx)?,
        })
    })
    .map_err(|e| e.to_string())
}

/// Every entry in label order
pub fn list_label_entries(db: &Database, engine: &LabelEngine) -> Result<ListLabelEntriesResponse, String> {
    let (items, settings) = db
        .with_conn(|conn| Ok((SelectedItem::list(conn)?, LabelSettings::get(conn)?)))
        .map_err(|e| e.to_string())?;

    let entries: Vec<LabelEntryView> = items
        .iter()
        .map(|item| LabelEntryView::from_item(item, engine.units()))
        .collect();
    let total_mass_grams = entries.iter().map(|e| e.mass_grams).fold(0.0, |acc, x| acc + x);

    Ok(ListLabelEntriesResponse {
        entries,
        servings_per_container: settings.servings_per_container,
        total_mass_grams,
    })
}

/// Remove every entry
pub fn clear_label(db: &Database) -> Result<ClearLabelResponse, String> {
    let removed = db.with_conn(SelectedItem::clear).map_err(|e| e.to_string())?;
    tracing::info!(removed, "Cleared label");
    Ok(ClearLabelResponse { success: true, removed })
}

/// Set how many servings the container holds
pub fn set_servings_per_container(db: &Database, servings: f64) -> Result<LabelSettings, String> {
    db.with_conn(|conn| LabelSettings::set_servings_per_container(conn, servings))
        .map_err(|e| e.to_string())
}
