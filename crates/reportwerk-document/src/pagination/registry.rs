// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Title registry — heading labels and the body page each one landed on.

/// One recorded heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleEntry {
    /// Numbered label, e.g. "1.2 Scope".
    pub label: String,
    pub anchor: String,
    /// Body page number (1-based, counted within the body zone).
    pub page: u32,
}

/// Append-only log of headings in layout order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleRegistry {
    entries: Vec<TitleEntry>,
}

impl TitleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, label: impl Into<String>, anchor: impl Into<String>, page: u32) {
        self.entries.push(TitleEntry {
            label: label.into(),
            anchor: anchor.into(),
            page,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TitleEntry> {
        self.entries.iter()
    }
}

impl IntoIterator for TitleRegistry {
    type Item = TitleEntry;
    type IntoIter = std::vec::IntoIter<TitleEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
