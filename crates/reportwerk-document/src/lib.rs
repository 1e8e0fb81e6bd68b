// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// reportwerk-document — Structured report assembly and PDF rendering.
//
// Provides the numbered chapter/section tree, list and form tables with
// merged cells, zone-aware pagination, the table of contents, front-matter
// page reordering, and a printpdf/lopdf rendering engine.

pub mod assemble;
pub mod catalog;
pub mod pagination;
pub mod render;
pub mod reorder;
pub mod report;
pub mod table;

// Re-export the primary types so callers can use `reportwerk_document::Report` etc.
pub use assemble::{NodeHandle, ReportAssembler};
pub use render::{Block, PdfEngine, RenderEngine};
pub use report::Report;
pub use table::{CellValue, FieldSpan, FormTable, ListTable, RowRecord, TableLayout, TableSpec};
