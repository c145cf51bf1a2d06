//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Get the applied schema version (0 for a fresh database)
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Whether the database is at the latest schema version
pub fn is_current(conn: &Connection) -> DbResult<bool> {
    Ok(get_schema_version(conn)? >= SCHEMA_VERSION)
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- FOODS
        -- FoodData Central records seen in search results
        -- ============================================
        CREATE TABLE foods (
            fdc_id INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            brand_owner TEXT,
            food_category TEXT,
            nutrients_json TEXT NOT NULL,        -- JSON array of per-100g samples
            fetched_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_foods_description ON foods(description);

        -- ============================================
        -- SELECTION ENTRIES
        -- Foods on the current label, in label order
        -- ============================================
        CREATE TABLE selection_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            position INTEGER NOT NULL,
            fdc_id INTEGER NOT NULL REFERENCES foods(fdc_id) ON DELETE RESTRICT,
            quantity REAL NOT NULL CHECK(quantity > 0),
            unit TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_selection_entries_position ON selection_entries(position);

        -- ============================================
        -- LABEL SETTINGS
        -- Single row
        -- ============================================
        CREATE TABLE label_settings (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            servings_per_container REAL NOT NULL DEFAULT 1.0 CHECK(servings_per_container > 0),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        INSERT INTO label_settings (id, servings_per_container) VALUES (1, 1.0);
        "#,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_migrations_are_idempotent() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            run_migrations(conn)?;
            run_migrations(conn)?;
            assert_eq!(get_schema_version(conn)?, SCHEMA_VERSION);
            assert!(is_current(conn)?);

            let settings_rows: i64 =
                conn.query_row("SELECT COUNT(*) FROM label_settings", [], |row| row.get(0))?;
            assert_eq!(settings_rows, 1);
            Ok(())
        })
        .unwrap();
    }
}
