// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Form table builder — label/value pairs laid out left to right across a
// fixed number of columns, each half of a pair spanning a chosen number of
// columns.

use std::str::FromStr;

use reportwerk_core::error::{ReportError, Result};
use reportwerk_core::{Alignment, TextStyle};
use tracing::instrument;

use super::layout::{TableCell, TableLayout, TableRow};

/// Columns taken by the label cell and the value cell of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpan {
    pub label: u16,
    pub value: u16,
}

impl FieldSpan {
    pub fn new(label: u16, value: u16) -> Self {
        Self { label, value }
    }

    pub fn total(&self) -> usize {
        usize::from(self.label) + usize::from(self.value)
    }
}

impl Default for FieldSpan {
    fn default() -> Self {
        Self { label: 1, value: 2 }
    }
}

/// Parses the `"label-value"` notation, e.g. `"1-2"` or `"2-4"`.
impl FromStr for FieldSpan {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        let parse = |part: &str| {
            part.trim()
                .parse::<u16>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ReportError::config(format!("invalid field span {s:?}")))
        };
        let (label, value) = s
            .split_once('-')
            .ok_or_else(|| ReportError::config(format!("field span {s:?} is not \"L-V\"")))?;
        Ok(Self {
            label: parse(label)?,
            value: parse(value)?,
        })
    }
}

#[derive(Debug, Clone)]
struct FormField {
    label: String,
    value: String,
    span: FieldSpan,
}

/// Builder for a label/value form table.
#[derive(Debug, Clone)]
pub struct FormTable {
    columns: usize,
    widths: Option<Vec<f32>>,
    fields: Vec<FormField>,
}

impl FormTable {
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            widths: None,
            fields: Vec::new(),
        }
    }

    pub fn widths(mut self, widths: impl Into<Vec<f32>>) -> Self {
        self.widths = Some(widths.into());
        self
    }

    /// Add a field with the default 1-2 span.
    pub fn push_field(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.push_field_spanned(label, value, FieldSpan::default());
    }

    pub fn push_field_spanned(
        &mut self,
        label: impl Into<String>,
        value: impl Into<String>,
        span: FieldSpan,
    ) {
        self.fields.push(FormField {
            label: label.into(),
            value: value.into(),
            span,
        });
    }

    /// Builder-style [`FormTable::push_field_spanned`].
    pub fn field(mut self, label: impl Into<String>, value: impl Into<String>, span: FieldSpan) -> Self {
        self.push_field_spanned(label, value, span);
        self
    }

    /// Resolve the fields into rows. A field that does not fit in what is
    /// left of the current row starts the next one.
    #[instrument(skip(self), fields(columns = self.columns, fields = self.fields.len()))]
    pub fn build(&self) -> Result<TableLayout> {
        if self.columns == 0 {
            return Err(ReportError::config("form table needs at least one column"));
        }
        let widths = match &self.widths {
            Some(widths) => widths.clone(),
            None => vec![1.0; self.columns],
        };
        if widths.len() != self.columns {
            return Err(ReportError::config(format!(
                "{} column widths supplied for a {}-column form table",
                widths.len(),
                self.columns
            )));
        }
        if let Some(bad) = widths.iter().find(|w| !w.is_finite() || **w <= 0.0) {
            return Err(ReportError::config(format!(
                "column width must be a positive number, got {bad}"
            )));
        }
        if let Some(field) = self.fields.iter().find(|f| f.span.total() > self.columns) {
            return Err(ReportError::config(format!(
                "field {:?} spans {} columns but the table has {}",
                field.label,
                field.span.total(),
                self.columns
            )));
        }

        let mut rows = Vec::new();
        let mut current = TableRow::default();
        let mut column = 0;
        for field in &self.fields {
            if column + field.span.total() > self.columns {
                rows.push(std::mem::take(&mut current));
                column = 0;
            }

            let mut label = TableCell::new(column, field.label.as_str(), TextStyle::TableBody);
            label.col_span = usize::from(field.span.label);
            label.alignment = Alignment::Center;
            column += label.col_span;

            let mut value = TableCell::new(column, field.value.as_str(), TextStyle::TableBody);
            value.col_span = usize::from(field.span.value);
            column += value.col_span;

            current.cells.push(label);
            current.cells.push(value);
        }
        if !current.cells.is_empty() {
            rows.push(current);
        }

        Ok(TableLayout {
            widths,
            header: None,
            rows,
        })
    }
}
