// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagination module — page events raised by the rendering engine, the
// zone-aware tracker that counts pages and decorates them, and the registry
// of heading page numbers the catalog is built from.

pub mod event;
pub mod registry;
pub mod tracker;

pub use event::{Decoration, PageEvent};
pub use registry::{TitleEntry, TitleRegistry};
pub use tracker::PaginationTracker;
