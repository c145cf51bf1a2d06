//! Plain-text label for printing and chat display

use super::{calories_line, serving_size_line, servings_line, LabelRenderer, RenderError, RenderFormat};
use crate::models::LabelSummary;

const WIDTH: usize = 44;

/// Fixed-width text Nutrition Facts panel
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLabelRenderer;

impl TextLabelRenderer {
    pub fn render_string(&self, summary: &LabelSummary) -> String {
        let thick = "=".repeat(WIDTH);
        let thin = "-".repeat(WIDTH);
        let mut lines = vec![
            "NUTRITION FACTS".to_string(),
            thick.clone(),
            servings_line(summary),
            serving_size_line(summary),
            thin.clone(),
            calories_line(summary),
            thick.clone(),
            format!("{:>width$}", "% Daily Value*", width = WIDTH),
        ];

        for row in summary.nutrient_rows() {
            let indent = if row.indented { "  " } else { "" };
            let left = format!("{}{} {}{}", indent, row.label, row.display_per_serving(), row.unit);
            let dv = row.percent_daily_value.to_string();
            let pad = WIDTH.saturating_sub(dv.len()).max(left.len() + 1);
            lines.push(format!("{:<pad$}{}", left, dv, pad = pad));
        }

        lines.push(thin);
        if summary.ingredients.is_empty() {
            lines.push("Ingredients: none".to_string());
        } else {
            lines.push(format!("Ingredients: {}", summary.ingredients));
        }
        lines.push("* Percent Daily Values are based on a 2,000 calorie diet.".to_string());

        lines.join("\n")
    }
}

impl LabelRenderer for TextLabelRenderer {
    fn format(&self) -> RenderFormat {
        RenderFormat::Text
    }

    fn render(&self, summary: &LabelSummary) -> Result<Vec<u8>, RenderError> {
        Ok(self.render_string(summary).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::{FoodRecord, NutrientSample, SelectionEntry};
    use crate::nutrition::build_summary;

    #[test]
    fn test_renders_rows_in_order() {
        let food = Arc::new(FoodRecord::new(
            1,
            "Apple",
            vec![
                NutrientSample::new(1008, "Energy", 52.0, "kcal"),
                NutrientSample::new(1004, "Total lipid (fat)", 0.17, "g"),
            ],
        ));
        let entries = vec![
            SelectionEntry::new(Arc::clone(&food), Some(1.0), Some("cup")).unwrap(),
            SelectionEntry::new(food, Some(1.0), Some("cup")).unwrap(),
        ];
        let text = TextLabelRenderer.render_string(&build_summary(&entries, 1.0));

        assert!(text.starts_with("NUTRITION FACTS"));
        assert!(text.contains("1 Servings Per Container"));
        assert!(text.contains("Serving Size (480.00g)"));
        assert!(text.contains("Calories 249.60 (Total: 249.60)"));
        assert!(text.contains("Total Fat 0.82g"));
        assert!(text.contains("  Saturated Fat 0.00g"));
        assert!(text.contains("Ingredients: Apple, Apple"));

        let fat = text.find("Total Fat").unwrap();
        let sodium = text.find("Sodium").unwrap();
        let protein = text.find("Protein").unwrap();
        assert!(fat < sodium && sodium < protein);
    }

    #[test]
    fn test_empty_label() {
        let bytes = TextLabelRenderer.render(&build_summary(&[], 1.0)).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("Ingredients: none"));
        assert!(text.contains("Protein 0.00g"));
    }
}
