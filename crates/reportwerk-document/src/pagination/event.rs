// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Typed page events and page decorations.

use reportwerk_core::Zone;

/// Something the rendering engine did while laying out content.
///
/// Engines return these in the order they happened; `page` is the 1-based
/// physical page index inside the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    PageStarted { zone: Zone, page: usize },
    /// A chapter, section, or subsection heading was placed.
    NodeEmitted {
        label: String,
        anchor: String,
        page: usize,
    },
    PageEnded { zone: Zone, page: usize },
}

/// Furniture drawn on a finished page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoration {
    Header(String),
    /// Page number text.
    Footer(String),
    Watermark(String),
}
