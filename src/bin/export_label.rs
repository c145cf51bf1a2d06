//! Utility to export the current label without starting the MCP server
//!
//! Usage: export_label [OUTPUT] [pdf|text]

use nutrifacts::config::Config;
use nutrifacts::nutrition::LabelEngine;
use nutrifacts::tools::label;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "nutrition-label.pdf".to_string());
    let format = args.next();

    let config = Config::from_env();
    println!("Database path: {}", config.database_path.display());

    let database = nutrifacts::db::Database::new(&config.database_path)?;

    // Run migrations
    database.with_conn(|conn| {
        nutrifacts::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let path = config.resolve_export_path(&output);
    let result = label::export_nutrition_label(&database, &LabelEngine::standard(), &path, format.as_deref())?;

    println!("Label exported:");
    println!("  File: {}", result.file_path);
    println!("  Foods: {}", result.food_count);
    println!("  Bytes: {}", result.bytes_written);

    Ok(())
}
