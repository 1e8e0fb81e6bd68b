// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Catalog builder — turns the title registry into linked table-of-contents
// lines.

use reportwerk_core::TextStyle;
use tracing::{debug, instrument};

use crate::pagination::{TitleEntry, TitleRegistry};

/// Deepest heading level the catalog lists (0 = chapter).
pub const MAX_CATALOG_DEPTH: usize = 2;

/// Role of a fragment within a catalog line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentRole {
    Title,
    Leader,
    PageNumber,
}

/// One run of text in a catalog line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFragment {
    pub role: FragmentRole,
    pub text: String,
    pub style: TextStyle,
    /// Anchor the fragment links to.
    pub link: String,
}

/// One table-of-contents line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub depth: usize,
    pub label: String,
    pub anchor: String,
    pub page: u32,
    pub style: TextStyle,
}

impl CatalogEntry {
    /// Title, dotted leader, and page number, all linking to the heading's
    /// anchor. The leader text is a single dot; the engine repeats it to fill
    /// the gap.
    pub fn fragments(&self) -> [CatalogFragment; 3] {
        let fragment = |role, text: String, style| CatalogFragment {
            role,
            text,
            style,
            link: self.anchor.clone(),
        };
        [
            fragment(FragmentRole::Title, self.label.clone(), self.style),
            fragment(FragmentRole::Leader, ".".to_string(), TextStyle::Body),
            fragment(FragmentRole::PageNumber, self.page.to_string(), TextStyle::Body),
        ]
    }
}

/// Nesting depth of a heading label: the number of `.` separators in its
/// leading number ("2.1.3 Limits" has depth 2).
pub fn label_depth(label: &str) -> usize {
    label
        .split_whitespace()
        .next()
        .map(|number| number.matches('.').count())
        .unwrap_or(0)
}

/// Catalog style for a heading depth, or `None` beyond [`MAX_CATALOG_DEPTH`].
pub fn style_for_depth(depth: usize) -> Option<TextStyle> {
    match depth {
        0 => Some(TextStyle::CatalogChapter),
        1 => Some(TextStyle::CatalogSection),
        2 => Some(TextStyle::CatalogSubsection),
        _ => None,
    }
}

/// Consume the registry into catalog lines, preserving layout order.
///
/// Entries nested deeper than [`MAX_CATALOG_DEPTH`] are skipped.
#[instrument(skip_all, fields(entries = registry.len()))]
pub fn build_catalog(registry: TitleRegistry) -> Vec<CatalogEntry> {
    registry
        .into_iter()
        .filter_map(|TitleEntry { label, anchor, page }| {
            let depth = label_depth(&label);
            let Some(style) = style_for_depth(depth) else {
                debug!(label = %label, depth, "Heading too deep for the catalog, skipped");
                return None;
            };
            Some(CatalogEntry {
                depth,
                label,
                anchor,
                page,
                style,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_counts_number_separators_only() {
        assert_eq!(label_depth("3 Tables"), 0);
        assert_eq!(label_depth("3.2 Widths"), 1);
        assert_eq!(label_depth("3.2.1 Index v1.2"), 2);
    }

    #[test]
    fn preserves_order_and_skips_deep_entries() {
        let mut registry = TitleRegistry::new();
        registry.record("1 Intro", "Intro", 1);
        registry.record("1.1 Scope", "Scope", 1);
        registry.record("1.1.1 Limits", "Limits", 2);
        registry.record("1.1.1.1 Deep", "Deep", 2);
        registry.record("2 Design", "Design", 3);

        let catalog = build_catalog(registry);
        let summary: Vec<(&str, usize, u32)> = catalog
            .iter()
            .map(|e| (e.label.as_str(), e.depth, e.page))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("1 Intro", 0, 1),
                ("1.1 Scope", 1, 1),
                ("1.1.1 Limits", 2, 2),
                ("2 Design", 0, 3),
            ]
        );
        assert_eq!(catalog[0].style, TextStyle::CatalogChapter);
        assert_eq!(catalog[2].style, TextStyle::CatalogSubsection);
    }

    #[test]
    fn title_and_page_share_anchor() {
        let mut registry = TitleRegistry::new();
        registry.record("1.1 Scope", "Scope", 4);
        let entry = &build_catalog(registry)[0];
        let [title, leader, page] = entry.fragments();
        assert_eq!(title.text, "1.1 Scope");
        assert_eq!(page.text, "4");
        assert_eq!(title.link, "Scope");
        assert_eq!(page.link, title.link);
        assert_eq!(leader.role, FragmentRole::Leader);
    }
}
