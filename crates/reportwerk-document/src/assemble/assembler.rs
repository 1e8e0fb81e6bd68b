// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report assembler — builds the numbered heading tree in authoring order.
//
// Sections attach to the most recently added chapter and subsections to the
// most recently added section, tracked by an explicit cursor. Adding a
// chapter clears the section cursor, so a subsection always sits under a
// section of the current chapter.

use std::collections::HashSet;

use reportwerk_core::TextStyle;
use reportwerk_core::error::{ReportError, Result};
use tracing::debug;
use uuid::Uuid;

use super::node::{Content, DocumentNode, NodeChild, NodeKind};
use crate::render::Block;

/// Reference to a node of one particular assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    document: Uuid,
    node: usize,
}

#[derive(Debug)]
pub struct ReportAssembler {
    id: Uuid,
    nodes: Vec<DocumentNode>,
    chapters: Vec<usize>,
    current_chapter: Option<usize>,
    current_section: Option<usize>,
    anchors: HashSet<String>,
}

impl Default for ReportAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportAssembler {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            nodes: Vec::new(),
            chapters: Vec::new(),
            current_chapter: None,
            current_section: None,
            anchors: HashSet::new(),
        }
    }

    /// Add a top-level chapter numbered after the previous one.
    pub fn add_chapter(&mut self, title: &str) -> Result<NodeHandle> {
        let title = clean_title(title)?;
        let path = (self.chapters.len() + 1).to_string();
        let index = self.push_node(NodeKind::Chapter, title, path);
        self.chapters.push(index);
        self.current_chapter = Some(index);
        self.current_section = None;
        Ok(self.handle(index))
    }

    /// Add a section to the most recently added chapter.
    pub fn add_section(&mut self, title: &str) -> Result<NodeHandle> {
        let parent = self
            .current_chapter
            .ok_or_else(|| ReportError::logic("a section needs a chapter; add a chapter first"))?;
        let index = self.add_child(parent, NodeKind::Section, title)?;
        self.current_section = Some(index);
        Ok(self.handle(index))
    }

    /// Add a subsection to the most recently added section.
    pub fn add_subsection(&mut self, title: &str) -> Result<NodeHandle> {
        let parent = self.current_section.ok_or_else(|| {
            ReportError::logic(
                "a subsection needs a section in the current chapter; add a section first",
            )
        })?;
        let index = self.add_child(parent, NodeKind::Subsection, title)?;
        Ok(self.handle(index))
    }

    /// Append content under the node `handle` refers to.
    pub fn append(&mut self, handle: &NodeHandle, content: impl Into<Content>) -> Result<()> {
        let index = self.resolve(handle)?;
        self.nodes[index].children.push(NodeChild::Content(content.into()));
        Ok(())
    }

    /// Append a body paragraph under `handle`.
    pub fn paragraph(&mut self, handle: &NodeHandle, text: impl Into<String>) -> Result<()> {
        self.append(handle, Content::Paragraph(text.into()))
    }

    pub fn node(&self, handle: &NodeHandle) -> Result<&DocumentNode> {
        let index = self.resolve(handle)?;
        Ok(&self.nodes[index])
    }

    /// Top-level chapters in order.
    pub fn chapters(&self) -> impl Iterator<Item = &DocumentNode> {
        self.chapters.iter().map(|&index| &self.nodes[index])
    }

    /// Child node of `node` at position `ordinal` (0-based) among its child
    /// nodes.
    pub fn child_node(&self, node: &DocumentNode, ordinal: usize) -> Option<&DocumentNode> {
        node.children
            .iter()
            .filter_map(|child| match child {
                NodeChild::Node(index) => Some(&self.nodes[*index]),
                NodeChild::Content(_) => None,
            })
            .nth(ordinal)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Flatten the tree into body blocks in reading order.
    pub fn into_blocks(self) -> Vec<Block> {
        let Self {
            nodes, chapters, ..
        } = self;
        let mut slots: Vec<Option<DocumentNode>> = nodes.into_iter().map(Some).collect();
        let mut blocks = Vec::new();
        for index in chapters {
            emit_node(&mut slots, index, &mut blocks);
        }
        blocks
    }

    fn handle(&self, node: usize) -> NodeHandle {
        NodeHandle {
            document: self.id,
            node,
        }
    }

    fn resolve(&self, handle: &NodeHandle) -> Result<usize> {
        if handle.document != self.id {
            return Err(ReportError::logic(
                "node handle belongs to a different or already closed document",
            ));
        }
        if handle.node >= self.nodes.len() {
            return Err(ReportError::logic(format!(
                "node handle {} does not exist in this document",
                handle.node
            )));
        }
        Ok(handle.node)
    }

    fn add_child(&mut self, parent: usize, kind: NodeKind, title: &str) -> Result<usize> {
        let title = clean_title(title)?;
        let ordinal = self.nodes[parent]
            .children
            .iter()
            .filter(|child| matches!(child, NodeChild::Node(_)))
            .count()
            + 1;
        let path = format!("{}.{}", self.nodes[parent].path, ordinal);
        let index = self.push_node(kind, title, path);
        self.nodes[parent].children.push(NodeChild::Node(index));
        Ok(index)
    }

    fn push_node(&mut self, kind: NodeKind, title: String, path: String) -> usize {
        let label = format!("{path} {title}");
        let anchor = self.unique_anchor(anchor_from_label(&label));
        debug!(label = %label, anchor = %anchor, "Heading added");
        self.nodes.push(DocumentNode {
            kind,
            title,
            path,
            anchor,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    fn unique_anchor(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut n = 1;
        while !self.anchors.insert(candidate.clone()) {
            n += 1;
            candidate = format!("{base}-{n}");
        }
        candidate
    }
}

/// Anchor name for a label: the label with its leading number removed.
pub fn anchor_from_label(label: &str) -> &str {
    label
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim())
        .unwrap_or(label)
}

fn clean_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ReportError::config("heading title must not be blank"));
    }
    Ok(title.to_string())
}

fn emit_node(slots: &mut [Option<DocumentNode>], index: usize, blocks: &mut Vec<Block>) {
    let Some(node) = slots[index].take() else {
        return;
    };
    blocks.push(Block::Heading {
        label: node.label(),
        anchor: node.anchor,
        style: node.kind.title_style(),
    });
    for child in node.children {
        match child {
            NodeChild::Content(Content::Paragraph(text)) => blocks.push(Block::Paragraph {
                text,
                style: TextStyle::Body,
            }),
            NodeChild::Content(Content::Table(table)) => blocks.push(Block::Table(table)),
            NodeChild::Node(child) => emit_node(slots, child, blocks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(blocks: &[Block]) -> Vec<String> {
        blocks
            .iter()
            .filter_map(|block| match block {
                Block::Heading { label, .. } => Some(label.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn numbers_follow_the_cursor() {
        let mut doc = ReportAssembler::new();
        doc.add_chapter("Intro").unwrap();
        doc.add_section("Scope").unwrap();
        doc.add_subsection("Limits").unwrap();
        doc.add_section("Terms").unwrap();
        doc.add_chapter("Design").unwrap();
        doc.add_section("Tables").unwrap();

        let blocks = doc.into_blocks();
        assert_eq!(
            labels(&blocks),
            vec![
                "1 Intro",
                "1.1 Scope",
                "1.1.1 Limits",
                "1.2 Terms",
                "2 Design",
                "2.1 Tables"
            ]
        );
    }

    #[test]
    fn depth_matches_path_separators() {
        let mut doc = ReportAssembler::new();
        let chapter = doc.add_chapter("Intro").unwrap();
        let section = doc.add_section("Scope").unwrap();
        let sub = doc.add_subsection("Limits").unwrap();
        for (handle, kind) in [
            (chapter, NodeKind::Chapter),
            (section, NodeKind::Section),
            (sub, NodeKind::Subsection),
        ] {
            let node = doc.node(&handle).unwrap();
            assert_eq!(node.kind, kind);
            assert_eq!(node.depth(), kind.depth());
        }
    }

    #[test]
    fn anchor_drops_leading_number() {
        let mut doc = ReportAssembler::new();
        let chapter = doc.add_chapter("Table basics").unwrap();
        assert_eq!(doc.node(&chapter).unwrap().anchor, "Table basics");
        assert_eq!(anchor_from_label("2.1 Merged rows"), "Merged rows");
    }

    #[test]
    fn repeated_titles_get_distinct_anchors() {
        let mut doc = ReportAssembler::new();
        doc.add_chapter("One").unwrap();
        let a = doc.add_section("Basics").unwrap();
        doc.add_chapter("Two").unwrap();
        let b = doc.add_section("Basics").unwrap();
        assert_eq!(doc.node(&a).unwrap().anchor, "Basics");
        assert_eq!(doc.node(&b).unwrap().anchor, "Basics-2");
    }

    #[test]
    fn section_before_chapter_is_logic_error() {
        let mut doc = ReportAssembler::new();
        assert!(matches!(doc.add_section("Orphan"), Err(ReportError::Logic(_))));
        assert!(matches!(doc.add_subsection("Orphan"), Err(ReportError::Logic(_))));
    }

    #[test]
    fn subsection_right_after_new_chapter_is_logic_error() {
        let mut doc = ReportAssembler::new();
        doc.add_chapter("One").unwrap();
        doc.add_section("A").unwrap();
        doc.add_chapter("Two").unwrap();
        assert!(matches!(doc.add_subsection("x"), Err(ReportError::Logic(_))));
    }

    #[test]
    fn foreign_handle_is_rejected() {
        let mut first = ReportAssembler::new();
        let handle = first.add_chapter("One").unwrap();
        let mut second = ReportAssembler::new();
        second.add_chapter("One").unwrap();
        assert!(matches!(
            second.paragraph(&handle, "text"),
            Err(ReportError::Logic(_))
        ));
    }

    #[test]
    fn blank_title_is_configuration_error() {
        let mut doc = ReportAssembler::new();
        assert!(matches!(doc.add_chapter("  "), Err(ReportError::Configuration(_))));
    }

    #[test]
    fn content_keeps_authoring_order() {
        let mut doc = ReportAssembler::new();
        let chapter = doc.add_chapter("Intro").unwrap();
        doc.paragraph(&chapter, "before").unwrap();
        doc.add_section("Scope").unwrap();
        doc.paragraph(&chapter, "after").unwrap();

        let kinds: Vec<String> = doc
            .into_blocks()
            .into_iter()
            .map(|block| match block {
                Block::Heading { label, .. } => label,
                Block::Paragraph { text, .. } => text,
                other => format!("{other:?}"),
            })
            .collect();
        assert_eq!(kinds, vec!["1 Intro", "before", "1.1 Scope", "after"]);
    }
}
