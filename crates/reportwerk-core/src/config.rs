// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::types::{Margins, PaperSize};

/// Settings for one generated report.
///
/// Every field has a default, so a JSON file only needs the keys it
/// overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Title embedded in the document metadata.
    pub title: String,
    /// Physical page size.
    pub paper_size: PaperSize,
    /// Page margins in points.
    pub margins: Margins,
    /// Text drawn at the top of cover and body pages.
    pub page_header: Option<String>,
    /// Text drawn across every page.
    pub watermark: Option<String>,
    /// Large heading on the cover page.
    pub cover_title: String,
    /// Additional cover lines, rendered in body style under the heading.
    pub cover_lines: Vec<String>,
    /// Heading of the table of contents.
    pub catalog_title: String,
    /// Header label of the generated index column in list tables.
    pub index_label: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Report".to_string(),
            paper_size: PaperSize::A4,
            margins: Margins::default(),
            page_header: None,
            watermark: None,
            cover_title: "Report".to_string(),
            cover_lines: Vec::new(),
            catalog_title: "Contents".to_string(),
            index_label: "No.".to_string(),
        }
    }
}

impl ReportConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Reject geometry that leaves no room for content.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.paper_size.dimensions_pt();
        let m = &self.margins;
        let margins = [m.left, m.right, m.top, m.bottom];
        if margins.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ReportError::config("margins must be finite and non-negative"));
        }
        if m.left + m.right >= width || m.top + m.bottom >= height {
            return Err(ReportError::config(format!(
                "margins {:?} leave no printable area on a {:?} page",
                m, self.paper_size
            )));
        }
        Ok(())
    }

    /// Header text, if configured and not blank.
    pub fn header_text(&self) -> Option<&str> {
        non_blank(self.page_header.as_deref())
    }

    /// Watermark text, if configured and not blank.
    pub fn watermark_text(&self) -> Option<&str> {
        non_blank(self.watermark.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ReportConfig::from_json(r#"{ "watermark": "DRAFT" }"#).unwrap();
        assert_eq!(config.watermark_text(), Some("DRAFT"));
        assert_eq!(config.paper_size, PaperSize::A4);
        assert_eq!(config.margins, Margins::default());
        assert_eq!(config.catalog_title, "Contents");
    }

    #[test]
    fn blank_header_is_ignored() {
        let config = ReportConfig {
            page_header: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(config.header_text(), None);
    }

    #[test]
    fn oversized_margins_rejected() {
        let json = r#"{ "margins": { "left": 400, "right": 400, "top": 10, "bottom": 10 } }"#;
        assert!(matches!(
            ReportConfig::from_json(json),
            Err(ReportError::Configuration(_))
        ));
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        assert!(matches!(
            ReportConfig::from_json("{ not json"),
            Err(ReportError::Serialization(_))
        ));
    }
}
