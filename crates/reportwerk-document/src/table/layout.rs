// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Placed-cell table layout handed to the rendering engine.

use reportwerk_core::{Alignment, TextStyle};

/// A cell that is actually rendered.
///
/// Cells covered by a span from an earlier row or column are not present at
/// all; a renderer walks `cells` and never sees them.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    /// Physical column the cell starts in.
    pub column: usize,
    pub text: String,
    pub row_span: usize,
    pub col_span: usize,
    pub style: TextStyle,
    pub alignment: Alignment,
}

impl TableCell {
    pub fn new(column: usize, text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            column,
            text: text.into(),
            row_span: 1,
            col_span: 1,
            style,
            alignment: Alignment::Left,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// A fully resolved table grid.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    /// Relative width of every physical column.
    pub widths: Vec<f32>,
    pub header: Option<TableRow>,
    pub rows: Vec<TableRow>,
}

impl TableLayout {
    pub fn column_count(&self) -> usize {
        self.widths.len()
    }

    /// Column widths as fractions of the table width.
    pub fn width_fractions(&self) -> Vec<f32> {
        let total: f32 = self.widths.iter().sum();
        if total <= 0.0 {
            let even = 1.0 / self.widths.len().max(1) as f32;
            return vec![even; self.widths.len()];
        }
        self.widths.iter().map(|w| w / total).collect()
    }

    /// Body cells anchored in `column`, top to bottom, with their row index.
    pub fn column_cells(&self, column: usize) -> impl Iterator<Item = (usize, &TableCell)> {
        self.rows.iter().enumerate().flat_map(move |(row, r)| {
            r.cells
                .iter()
                .filter(move |cell| cell.column == column)
                .map(move |cell| (row, cell))
        })
    }

    /// The body cell anchored at (`row`, `column`), if one is rendered there.
    pub fn cell_at(&self, row: usize, column: usize) -> Option<&TableCell> {
        self.rows
            .get(row)?
            .cells
            .iter()
            .find(|cell| cell.column == column)
    }
}
