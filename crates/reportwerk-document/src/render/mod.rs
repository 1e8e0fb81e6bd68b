// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Render module — the engine interface the report pipeline drives, the
// blocks it submits, and the PDF engine.

pub mod pdf;
pub mod text;

use reportwerk_core::error::Result;
use reportwerk_core::{TextStyle, Zone};

use crate::catalog::CatalogEntry;
use crate::pagination::{Decoration, PageEvent};
use crate::table::TableLayout;

pub use pdf::PdfEngine;

/// A unit of content submitted to an engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A numbered heading. Engines report it with a `NodeEmitted` event and
    /// register `anchor` as a link destination.
    Heading {
        label: String,
        anchor: String,
        style: TextStyle,
    },
    Paragraph {
        text: String,
        style: TextStyle,
    },
    Table(TableLayout),
    CatalogLine(CatalogEntry),
}

/// A page layout engine.
///
/// Every call that can place content returns the page events it caused, in
/// order. The pipeline feeds those to the pagination tracker and draws the
/// returned decorations through [`RenderEngine::decorate`].
///
/// An engine is closed exactly once: [`RenderEngine::close`] on success,
/// [`RenderEngine::abort`] after any failure. Both release the output sink.
pub trait RenderEngine {
    type Output;

    /// Start a fresh page in `zone`, ending the current page if one is open.
    fn begin_zone(&mut self, zone: Zone) -> Result<Vec<PageEvent>>;

    /// Lay out one block in the current zone, breaking pages as needed.
    fn append(&mut self, block: &Block) -> Result<Vec<PageEvent>>;

    /// End the last open page.
    fn finish_pages(&mut self) -> Result<Vec<PageEvent>>;

    /// Draw `decoration` on the finished physical page `page` (1-based).
    fn decorate(&mut self, page: usize, decoration: &Decoration) -> Result<()>;

    fn page_count(&self) -> usize;

    /// Set the final page order: position `i` shows physical page `order[i]`.
    /// Applied in one step when the engine is closed.
    fn reorder_pages(&mut self, order: &[usize]) -> Result<()>;

    /// Write the finished artifact and release the sink.
    fn close(self) -> Result<Self::Output>;

    /// Release the sink without producing an artifact.
    fn abort(self);
}
