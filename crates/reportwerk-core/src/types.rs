// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Reportwerk.

use serde::{Deserialize, Serialize};

/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Rendering context a page belongs to.
///
/// Zones are rendered in the order Body, Cover, Catalog, which is not the
/// order they appear in the finished document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Cover,
    Catalog,
    Body,
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Cover => "cover",
            Self::Catalog => "catalog",
            Self::Body => "body",
        };
        f.write_str(name)
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Dimensions in points (width, height).
    pub fn dimensions_pt(&self) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        (w as f32 * PT_PER_MM, h as f32 * PT_PER_MM)
    }
}

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 36.0,
            right: 36.0,
            top: 48.0,
            bottom: 48.0,
        }
    }
}

/// Horizontal alignment of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// The fixed set of text styles a report can use.
///
/// There is no theming: every style maps to one font size, weight, and
/// paragraph geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextStyle {
    CoverTitle,
    ChapterTitle,
    SectionTitle,
    SubsectionTitle,
    Body,
    TableHeader,
    TableBody,
    PageHeader,
    PageFooter,
    Watermark,
    CatalogHeading,
    CatalogChapter,
    CatalogSection,
    CatalogSubsection,
}

impl TextStyle {
    /// Font size in points.
    pub fn font_size(&self) -> f32 {
        match self {
            Self::CoverTitle => 24.0,
            Self::ChapterTitle | Self::CatalogHeading => 16.0,
            Self::SectionTitle | Self::CatalogChapter | Self::CatalogSection => 14.0,
            Self::SubsectionTitle | Self::Body | Self::CatalogSubsection => 12.0,
            Self::PageHeader => 13.0,
            Self::PageFooter => 10.0,
            Self::TableHeader | Self::TableBody => 10.0,
            Self::Watermark => 72.0,
        }
    }

    pub fn bold(&self) -> bool {
        matches!(
            self,
            Self::CoverTitle
                | Self::ChapterTitle
                | Self::CatalogHeading
                | Self::CatalogChapter
                | Self::TableHeader
        )
    }

    /// Baseline-to-baseline distance in points.
    pub fn leading(&self) -> f32 {
        match self {
            Self::ChapterTitle
            | Self::SectionTitle
            | Self::SubsectionTitle
            | Self::Body => 23.0,
            Self::CatalogChapter | Self::CatalogSection | Self::CatalogSubsection => 25.0,
            other => other.font_size() * 1.3,
        }
    }

    /// Space before and after the block, in points.
    pub fn spacing(&self) -> (f32, f32) {
        match self {
            Self::CoverTitle => (120.0, 40.0),
            Self::ChapterTitle => (23.0, 23.0),
            Self::CatalogHeading => (12.5, 12.5),
            Self::SectionTitle | Self::SubsectionTitle | Self::Body => (11.5, 11.5),
            _ => (0.0, 0.0),
        }
    }

    /// First-line indent in points.
    pub fn first_line_indent(&self) -> f32 {
        match self {
            Self::Body => 24.0,
            _ => 0.0,
        }
    }

    pub fn alignment(&self) -> Alignment {
        match self {
            Self::CoverTitle | Self::ChapterTitle | Self::CatalogHeading | Self::PageFooter => {
                Alignment::Center
            }
            Self::PageHeader => Alignment::Right,
            _ => Alignment::Left,
        }
    }
}
