// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document tree nodes and content.

use reportwerk_core::TextStyle;

use crate::table::TableLayout;

/// Heading level of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Chapter,
    Section,
    Subsection,
}

impl NodeKind {
    pub fn depth(&self) -> usize {
        match self {
            Self::Chapter => 0,
            Self::Section => 1,
            Self::Subsection => 2,
        }
    }

    pub fn title_style(&self) -> TextStyle {
        match self {
            Self::Chapter => TextStyle::ChapterTitle,
            Self::Section => TextStyle::SectionTitle,
            Self::Subsection => TextStyle::SubsectionTitle,
        }
    }
}

/// Content placed under a heading.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Paragraph(String),
    Table(TableLayout),
}

impl Content {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph(text.into())
    }
}

impl From<TableLayout> for Content {
    fn from(table: TableLayout) -> Self {
        Self::Table(table)
    }
}

/// A child of a node, in authoring order.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeChild {
    Content(Content),
    /// Index of a nested node in the assembler's arena.
    Node(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentNode {
    pub kind: NodeKind,
    pub title: String,
    /// Dotted number, e.g. "1.2". Never ends with a separator.
    pub path: String,
    pub anchor: String,
    pub children: Vec<NodeChild>,
}

impl DocumentNode {
    /// Numbered heading text, e.g. "1.2 Scope".
    pub fn label(&self) -> String {
        format!("{} {}", self.path, self.title)
    }

    pub fn depth(&self) -> usize {
        self.path.matches('.').count()
    }
}
