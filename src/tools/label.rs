//! Nutrition label tools
//!
//! Building the label from the stored selection and exporting it.

use std::path::Path;

use serde::Serialize;

use crate::db::Database;
use crate::models::{LabelSettings, LabelSummary, SelectedItem};
use crate::nutrition::LabelEngine;
use crate::render::{RenderFormat, TextLabelRenderer};

/// Response for get_nutrition_label
#[derive(Debug, Serialize)]
pub struct NutritionLabelResponse {
    pub summary: LabelSummary,
    pub text: String,
}

/// Response for export_nutrition_label
#[derive(Debug, Serialize)]
pub struct ExportLabelResponse {
    pub success: bool,
    pub file_path: String,
    pub format: RenderFormat,
    pub bytes_written: usize,
    pub food_count: usize,
    pub message: String,
}

/// Label for the stored selection
pub fn current_summary(db: &Database, engine: &LabelEngine) -> Result<LabelSummary, String> {
    let (entries, settings) = db
        .with_conn(|conn| Ok((SelectedItem::list_entries(conn)?, LabelSettings::get(conn)?)))
        .map_err(|e| e.to_string())?;

    Ok(engine.build_summary(&entries, settings.servings_per_container))
}

pub fn get_nutrition_label(db: &Database, engine: &LabelEngine) -> Result<NutritionLabelResponse, String> {
    let summary = current_summary(db, engine)?;
    let text = TextLabelRenderer.render_string(&summary);
    Ok(NutritionLabelResponse { summary, text })
}

/// Format from an explicit name, else from the file extension, else PDF
pub fn resolve_format(format: Option<&str>, path: &Path) -> Result<RenderFormat, String> {
    if let Some(name) = format {
        return name.parse().map_err(|e: crate::render::RenderError| e.to_string());
    }
    Ok(path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse().ok())
        .unwrap_or(RenderFormat::Pdf))
}

/// Render the label and write it to `output_path`
pub fn export_nutrition_label(
    db: &Database,
    engine: &LabelEngine,
    output_path: &Path,
    format: Option<&str>,
) -> Result<ExportLabelResponse, String> {
    let format = resolve_format(format, output_path)?;
    let summary = current_summary(db, engine)?;
    let bytes = format.renderer().render(&summary).map_err(|e| e.to_string())?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
        }
    }
    std::fs::write(output_path, &bytes)
        .map_err(|e| format!("Failed to write {}: {}", output_path.display(), e))?;

    tracing::info!(path = %output_path.display(), format = format.extension(), "Exported nutrition label");

    Ok(ExportLabelResponse {
        success: true,
        file_path: output_path.display().to_string(),
        format,
        bytes_written: bytes.len(),
        food_count: summary.food_count,
        message: format!("Label with {} foods written to {}", summary.food_count, output_path.display()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::{FoodRecord, NutrientSample};
    use crate::tools::selection::{add_food_to_label, set_servings_per_container};

    fn setup() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            run_migrations(conn)?;
            FoodRecord::upsert(
                conn,
                &FoodRecord::new(
                    1,
                    "Apple",
                    vec![
                        NutrientSample::new(1008, "Energy", 52.0, "kcal"),
                        NutrientSample::new(1004, "Total lipid (fat)", 0.17, "g"),
                    ],
                ),
            )
        })
        .unwrap();
        db
    }

    #[test]
    fn test_label_reflects_selection() {
        let db = setup();
        let engine = LabelEngine::standard();
        add_food_to_label(&db, &engine, 1, None, None).unwrap();
        set_servings_per_container(&db, 2.0).unwrap();

        let response = get_nutrition_label(&db, &engine).unwrap();
        assert_eq!(response.summary.food_count, 1);
        assert!((response.summary.calories_per_serving - 124.8).abs() < 1e-9);
        assert!((response.summary.calories_total - 249.6).abs() < 1e-9);
        assert!(response.text.contains("Calories 124.80 (Total: 249.60)"));
        assert!(response.text.contains("Ingredients: Apple"));
    }

    #[test]
    fn test_empty_label() {
        let db = setup();
        let response = get_nutrition_label(&db, &LabelEngine::standard()).unwrap();
        assert!(response.summary.is_empty());
        assert_eq!(response.summary.servings_per_container, 1.0);
    }

    #[test]
    fn test_resolve_format() {
        assert_eq!(resolve_format(None, Path::new("a.txt")).unwrap(), RenderFormat::Text);
        assert_eq!(resolve_format(None, Path::new("a.pdf")).unwrap(), RenderFormat::Pdf);
        assert_eq!(resolve_format(None, Path::new("label")).unwrap(), RenderFormat::Pdf);
        assert_eq!(resolve_format(Some("text"), Path::new("a.pdf")).unwrap(), RenderFormat::Text);
        assert!(resolve_format(Some("png"), Path::new("a.png")).is_err());
    }

    #[test]
    fn test_export_writes_file() {
        let db = setup();
        let engine = LabelEngine::standard();
        add_food_to_label(&db, &engine, 1, Some(2.0), Some("tbsp")).unwrap();

        let dir = std::env::temp_dir().join(format!("nutrifacts-export-{}", std::process::id()));
        let path = dir.join("nested").join("label.txt");
        let response = export_nutrition_label(&db, &engine, &path, None).unwrap();
        assert_eq!(response.format, RenderFormat::Text);
        assert_eq!(response.food_count, 1);

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("NUTRITION FACTS"));
        assert_eq!(written.len(), response.bytes_written);
        std::fs::remove_dir_all(&dir).ok();
    }
}
