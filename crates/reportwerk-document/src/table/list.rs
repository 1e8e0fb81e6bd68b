// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// List table builder — one row per record, a generated index column, and
// automatic merging of vertically adjacent equal cells.
//
// Merging works column by column. A maximal run of consecutive rows whose raw
// values are equal becomes a single cell on the run's first row with
// `row_span` equal to the run length; the remaining rows of the run get no
// cell in that column. Raw equality includes the group tag of a
// `CellValue`, which is how callers split runs that read the same.

use std::collections::BTreeSet;

use reportwerk_core::error::{ReportError, Result};
use reportwerk_core::{Alignment, TextStyle};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::cell::{CellValue, RowRecord};
use super::layout::{TableCell, TableLayout, TableRow};

/// Reserved field key of the generated index column.
pub const INDEX_KEY: &str = "index";

/// Share of the declared column weights given to the index column.
const INDEX_WIDTH_RATIO: f32 = 0.08;

/// Shape and merge behaviour of a list table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSpec {
    /// Relative width per declared column. `None` means equal widths.
    pub widths: Option<Vec<f32>>,
    pub show_header: bool,
    /// Merge vertically adjacent equal cells.
    pub merge: bool,
    /// Field keys eligible for merging. `None` or empty means every column,
    /// including the index column under [`INDEX_KEY`].
    pub merge_columns: Option<BTreeSet<String>>,
}

impl Default for TableSpec {
    fn default() -> Self {
        Self {
            widths: None,
            show_header: true,
            merge: false,
            merge_columns: None,
        }
    }
}

/// Builder for a list table.
///
/// ```text
/// header  [("Name", "name"), ("Age", "age")]
/// rows    {name: A, age: 1}, {name: A, age: 1}, {name: B, age: 2}
///
/// | No. | Name | Age |
/// |  1  |  A   |  1  |   <- Name and Age span two rows
/// |  2  |      |     |
/// |  3  |  B   |  2  |
/// ```
#[derive(Debug, Clone)]
pub struct ListTable {
    header: Vec<(String, String)>,
    rows: Vec<RowRecord>,
    spec: TableSpec,
    index_label: String,
}

impl ListTable {
    /// Start a table from ordered (display label, field key) pairs.
    pub fn new<I, L, K>(header: I) -> Self
    where
        I: IntoIterator<Item = (L, K)>,
        L: Into<String>,
        K: Into<String>,
    {
        Self {
            header: header
                .into_iter()
                .map(|(label, key)| (label.into(), key.into()))
                .collect(),
            rows: Vec::new(),
            spec: TableSpec::default(),
            index_label: "No.".to_string(),
        }
    }

    pub fn with_spec(mut self, spec: TableSpec) -> Self {
        self.spec = spec;
        self
    }

    pub fn widths(mut self, widths: impl Into<Vec<f32>>) -> Self {
        self.spec.widths = Some(widths.into());
        self
    }

    pub fn show_header(mut self, show: bool) -> Self {
        self.spec.show_header = show;
        self
    }

    pub fn merge_rows(mut self, merge: bool) -> Self {
        self.spec.merge = merge;
        self
    }

    /// Restrict merging to the given field keys. Also turns merging on.
    pub fn merge_columns<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.spec.merge = true;
        self.spec.merge_columns = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn index_label(mut self, label: impl Into<String>) -> Self {
        self.index_label = label.into();
        self
    }

    pub fn push_row(&mut self, row: RowRecord) {
        self.rows.push(row);
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = RowRecord>) -> Self {
        self.rows.extend(rows);
        self
    }

    pub fn spec(&self) -> &TableSpec {
        &self.spec
    }

    /// Resolve the table into placed cells.
    ///
    /// All configuration problems are reported before any cell is produced.
    #[instrument(skip(self), fields(columns = self.header.len(), rows = self.rows.len()))]
    pub fn build(&self) -> Result<TableLayout> {
        let declared = self.declared_widths()?;
        self.check_merge_columns()?;

        let mut widths = Vec::with_capacity(declared.len() + 1);
        widths.push(declared.iter().sum::<f32>() * INDEX_WIDTH_RATIO);
        widths.extend_from_slice(&declared);

        let keys: Vec<&str> = std::iter::once(INDEX_KEY)
            .chain(self.header.iter().map(|(_, key)| key.as_str()))
            .collect();

        let header = self.spec.show_header.then(|| {
            let labels = std::iter::once(self.index_label.as_str())
                .chain(self.header.iter().map(|(label, _)| label.as_str()));
            TableRow {
                cells: labels
                    .enumerate()
                    .map(|(column, label)| TableCell::new(column, label, TextStyle::TableHeader))
                    .collect(),
            }
        });

        // Raw values in row-major order, the index column first.
        let raw: Vec<Vec<Option<CellValue>>> = self
            .rows
            .iter()
            .enumerate()
            .map(|(position, row)| {
                let index = row
                    .index
                    .clone()
                    .unwrap_or_else(|| (position + 1).to_string());
                std::iter::once(Some(CellValue::new(index)))
                    .chain(keys[1..].iter().map(|key| row.get(key).cloned()))
                    .collect()
            })
            .collect();

        let mut rows = vec![TableRow::default(); raw.len()];
        for (column, key) in keys.iter().enumerate() {
            let values: Vec<Option<&CellValue>> =
                raw.iter().map(|row| row[column].as_ref()).collect();
            let spans = if self.merge_eligible(key) {
                run_spans(&values)
            } else {
                vec![Some(1); values.len()]
            };

            for (row, span) in spans.into_iter().enumerate() {
                let Some(row_span) = span else { continue };
                let text = values[row].map(|v| v.text.clone()).unwrap_or_default();
                let mut cell = TableCell::new(column, text, TextStyle::TableBody);
                cell.row_span = row_span;
                if column == 0 {
                    cell.alignment = Alignment::Center;
                }
                rows[row].cells.push(cell);
            }
        }

        debug!(
            physical_columns = widths.len(),
            rendered_cells = rows.iter().map(|r| r.cells.len()).sum::<usize>(),
            "List table resolved"
        );

        Ok(TableLayout {
            widths,
            header,
            rows,
        })
    }

    fn declared_widths(&self) -> Result<Vec<f32>> {
        if self.header.is_empty() {
            return Err(ReportError::config("list table needs at least one column"));
        }
        if let Some((_, key)) = self.header.iter().find(|(_, key)| key == INDEX_KEY) {
            return Err(ReportError::config(format!(
                "field key {key:?} is reserved for the index column"
            )));
        }

        let widths = match &self.spec.widths {
            Some(widths) => widths.clone(),
            None => vec![1.0; self.header.len()],
        };
        if widths.len() != self.header.len() {
            return Err(ReportError::config(format!(
                "{} column widths supplied for {} header columns",
                widths.len(),
                self.header.len()
            )));
        }
        if let Some(bad) = widths.iter().find(|w| !w.is_finite() || **w <= 0.0) {
            return Err(ReportError::config(format!(
                "column width must be a positive number, got {bad}"
            )));
        }
        Ok(widths)
    }

    fn check_merge_columns(&self) -> Result<()> {
        let Some(columns) = &self.spec.merge_columns else {
            return Ok(());
        };
        for key in columns {
            let known = key == INDEX_KEY || self.header.iter().any(|(_, k)| k == key);
            if !known {
                return Err(ReportError::config(format!(
                    "merge column {key:?} is not a field of this table"
                )));
            }
        }
        Ok(())
    }

    fn merge_eligible(&self, key: &str) -> bool {
        if !self.spec.merge {
            return false;
        }
        match &self.spec.merge_columns {
            Some(columns) if !columns.is_empty() => columns.contains(key),
            _ => true,
        }
    }
}

/// Row spans for one column: `Some(len)` on the first row of each maximal run
/// of equal values, `None` on the rows the run covers.
fn run_spans(values: &[Option<&CellValue>]) -> Vec<Option<usize>> {
    let mut spans = vec![None; values.len()];
    let mut start = 0;
    while start < values.len() {
        let mut end = start + 1;
        while end < values.len() && values[end] == values[start] {
            end += 1;
        }
        spans[start] = Some(end - start);
        start = end;
    }
    spans
}
