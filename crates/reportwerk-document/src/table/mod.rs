// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Table module — list tables with automatic row merging, label/value form
// tables, and the placed-cell layout both of them produce.

pub mod cell;
pub mod form;
pub mod layout;
pub mod list;

pub use cell::{CellValue, RowRecord};
pub use form::{FieldSpan, FormTable};
pub use layout::{TableCell, TableLayout, TableRow};
pub use list::{INDEX_KEY, ListTable, TableSpec};
