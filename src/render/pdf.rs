//! PDF Nutrition Facts panel
//!
//! Draws the label on a single Letter page with the builtin Helvetica fonts.

use std::io::BufWriter;

use printpdf::*;

use super::{calories_line, serving_size_line, servings_line, LabelRenderer, RenderError, RenderFormat};
use crate::models::LabelSummary;

// ============================================================================
// Layout Constants
// ============================================================================

const PAGE_WIDTH: f32 = 215.9; // Letter width
const PAGE_HEIGHT: f32 = 279.4; // Letter height
const PANEL_LEFT: f32 = 15.0;
const PANEL_WIDTH: f32 = 95.0;
const INDENT: f32 = 5.0;
const ROW_HEIGHT: f32 = 6.5;

const COLOR_BLACK: (u8, u8, u8) = (0, 0, 0);
const COLOR_GRAY: (u8, u8, u8) = (128, 128, 128);

/// Letter-size PDF label
#[derive(Debug, Clone)]
pub struct PdfLabelRenderer {
    pub title: String,
}

impl Default for PdfLabelRenderer {
    fn default() -> Self {
        Self {
            title: "Nutrition Facts".to_string(),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn rgb_to_printpdf(color: (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        color.0 as f32 / 255.0,
        color.1 as f32 / 255.0,
        color.2 as f32 / 255.0,
        None,
    ))
}

fn add_text(layer: &PdfLayerReference, font: &IndirectFontRef, text: &str, x: f32, y: f32, size: f32) {
    layer.set_fill_color(rgb_to_printpdf(COLOR_BLACK));
    layer.use_text(text, size, Mm(x), Mm(y), font);
}

fn add_rule(layer: &PdfLayerReference, y: f32, width: f32) {
    layer.set_outline_color(rgb_to_printpdf(COLOR_BLACK));
    layer.set_outline_thickness(width);

    let line = Line {
        points: vec![
            (Point::new(Mm(PANEL_LEFT), Mm(y)), false),
            (Point::new(Mm(PANEL_LEFT + PANEL_WIDTH), Mm(y)), false),
        ],
        is_closed: false,
    };
    layer.add_line(line);
}

// ============================================================================
// Rendering
// ============================================================================

impl LabelRenderer for PdfLabelRenderer {
    fn format(&self) -> RenderFormat {
        RenderFormat::Pdf
    }

    fn render(&self, summary: &LabelSummary) -> Result<Vec<u8>, RenderError> {
        let (doc, page1, layer1) = PdfDocument::new(&self.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Label");

        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;

        let layer = doc.get_page(page1).get_layer(layer1);
        let dv_column = PANEL_LEFT + PANEL_WIDTH - 15.0;
        let mut y = PAGE_HEIGHT - 25.0;

        add_text(&layer, &font_bold, "Nutrition Facts", PANEL_LEFT, y, 24.0);
        y -= 4.0;
        add_rule(&layer, y, 1.0);
        y -= 7.0;

        add_text(&layer, &font, &servings_line(summary), PANEL_LEFT, y, 11.0);
        y -= 6.0;
        add_text(&layer, &font_bold, &serving_size_line(summary), PANEL_LEFT, y, 11.0);
        y -= 4.0;
        add_rule(&layer, y, 4.0);
        y -= 9.0;

        add_text(&layer, &font_bold, &calories_line(summary), PANEL_LEFT, y, 14.0);
        y -= 4.0;
        add_rule(&layer, y, 2.5);
        y -= 6.0;

        add_text(&layer, &font_bold, "% Daily Value*", dv_column - 12.0, y, 9.0);
        y -= 2.0;

        for row in summary.nutrient_rows() {
            add_rule(&layer, y, 0.5);
            y -= ROW_HEIGHT - 1.5;

            let x = if row.indented { PANEL_LEFT + INDENT } else { PANEL_LEFT };
            let label_font = if row.indented { &font } else { &font_bold };
            add_text(&layer, label_font, row.label, x, y, 10.0);

            let amount = format!("{}{}", row.display_per_serving(), row.unit);
            let amount_x = x + row.label.len() as f32 * 2.1 + 2.0;
            add_text(&layer, &font, &amount, amount_x, y, 10.0);
            add_text(&layer, &font_bold, &row.percent_daily_value.to_string(), dv_column, y, 10.0);
            y -= 1.5;
        }

        add_rule(&layer, y, 4.0);
        y -= 6.0;

        let ingredients = if summary.ingredients.is_empty() {
            "Ingredients: none".to_string()
        } else {
            format!("Ingredients: {}", summary.ingredients)
        };
        for line in wrap(&ingredients, 60) {
            add_text(&layer, &font, &line, PANEL_LEFT, y, 9.0);
            y -= 4.5;
        }

        y -= 2.0;
        layer.set_fill_color(rgb_to_printpdf(COLOR_GRAY));
        layer.use_text(
            "* Percent Daily Values are based on a 2,000 calorie diet.",
            7.0,
            Mm(PANEL_LEFT),
            Mm(y),
            &font,
        );
        layer.use_text(
            format!("Generated {}", chrono::Local::now().format("%Y-%m-%d %H:%M")),
            7.0,
            Mm(PANEL_LEFT),
            Mm(y - 4.0),
            &font,
        );

        let mut writer = BufWriter::new(Vec::new());
        doc.save(&mut writer).map_err(|e| RenderError::Pdf(e.to_string()))?;
        writer.into_inner().map_err(|e| RenderError::Io(e.into_error()))
    }
}

/// Greedy word wrap at `width` characters
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
