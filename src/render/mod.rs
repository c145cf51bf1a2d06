//! Label renderers
//!
//! A renderer turns a finished [`LabelSummary`] into a document. Renderers
//! never compute nutrition themselves.

pub mod pdf;
pub mod text;

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::models::LabelSummary;

pub use pdf::PdfLabelRenderer;
pub use text::TextLabelRenderer;

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported label format '{0}' (expected pdf or text)")]
    UnsupportedFormat(String),
}

/// Output document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    Pdf,
    Text,
}

impl RenderFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            RenderFormat::Pdf => "pdf",
            RenderFormat::Text => "txt",
        }
    }

    /// Renderer for this format
    pub fn renderer(&self) -> Box<dyn LabelRenderer> {
        match self {
            RenderFormat::Pdf => Box::new(PdfLabelRenderer::default()),
            RenderFormat::Text => Box::new(TextLabelRenderer),
        }
    }
}

impl FromStr for RenderFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(RenderFormat::Pdf),
            "text" | "txt" => Ok(RenderFormat::Text),
            other => Err(RenderError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Produces a visual artifact from a computed label
pub trait LabelRenderer {
    fn format(&self) -> RenderFormat;

    fn render(&self, summary: &LabelSummary) -> Result<Vec<u8>, RenderError>;
}

/// "Serving Size (Xg)" header line
pub fn serving_size_line(summary: &LabelSummary) -> String {
    format!("Serving Size ({}g)", crate::models::format_amount(summary.total_mass_grams))
}

/// "N Servings Per Container" header line
pub fn servings_line(summary: &LabelSummary) -> String {
    let servings = summary.servings_per_container;
    if servings.fract() == 0.0 {
        format!("{:.0} Servings Per Container", servings)
    } else {
        format!("{} Servings Per Container", servings)
    }
}

/// "Calories X (Total: Y)" line
pub fn calories_line(summary: &LabelSummary) -> String {
    format!(
        "Calories {} (Total: {})",
        crate::models::format_amount(summary.calories_per_serving),
        crate::models::format_amount(summary.calories_total)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::build_summary;

    #[test]
    fn test_parse_format() {
        assert_eq!("PDF".parse::<RenderFormat>().unwrap(), RenderFormat::Pdf);
        assert_eq!("txt".parse::<RenderFormat>().unwrap(), RenderFormat::Text);
        assert!(matches!(
            "docx".parse::<RenderFormat>(),
            Err(RenderError::UnsupportedFormat(_))
        ));
        assert_eq!(RenderFormat::Text.extension(), "txt");
    }

    #[test]
    fn test_header_lines() {
        let mut summary = build_summary(&[], 2.0);
        assert_eq!(servings_line(&summary), "2 Servings Per Container");
        assert_eq!(serving_size_line(&summary), "Serving Size (0.00g)");
        assert_eq!(calories_line(&summary), "Calories 0.00 (Total: 0.00)");

        summary.servings_per_container = 1.5;
        assert_eq!(servings_line(&summary), "1.5 Servings Per Container");
    }
}
