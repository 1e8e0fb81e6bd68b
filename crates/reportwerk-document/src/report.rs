// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report pipeline — drives assembler, tracker, catalog builder, and render
// engine through the fixed pass order:
//
//   BODY  →  COVER  →  CATALOG  →  reorder  →  close
//
// The body goes first because catalog page numbers come from its layout. The
// reorder then moves cover and catalog in front of the body.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use reportwerk_core::error::Result;
use reportwerk_core::{ReportConfig, TextStyle, Zone};
use tracing::{info, instrument, warn};

use crate::assemble::{Content, NodeHandle, ReportAssembler};
use crate::catalog::build_catalog;
use crate::pagination::{PageEvent, PaginationTracker};
use crate::render::{Block, PdfEngine, RenderEngine};
use crate::reorder;
use crate::table::ListTable;

/// A report under construction.
#[derive(Debug)]
pub struct Report {
    config: ReportConfig,
    document: ReportAssembler,
}

impl Report {
    pub fn new(config: ReportConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            document: ReportAssembler::new(),
        })
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn document(&self) -> &ReportAssembler {
        &self.document
    }

    pub fn add_chapter(&mut self, title: &str) -> Result<NodeHandle> {
        self.document.add_chapter(title)
    }

    pub fn add_section(&mut self, title: &str) -> Result<NodeHandle> {
        self.document.add_section(title)
    }

    pub fn add_subsection(&mut self, title: &str) -> Result<NodeHandle> {
        self.document.add_subsection(title)
    }

    pub fn append(&mut self, handle: &NodeHandle, content: impl Into<Content>) -> Result<()> {
        self.document.append(handle, content)
    }

    pub fn paragraph(&mut self, handle: &NodeHandle, text: impl Into<String>) -> Result<()> {
        self.document.paragraph(handle, text)
    }

    /// A list-table builder labelled with this report's index column label.
    pub fn list_table<I, L, K>(&self, header: I) -> ListTable
    where
        I: IntoIterator<Item = (L, K)>,
        L: Into<String>,
        K: Into<String>,
    {
        ListTable::new(header).index_label(self.config.index_label.clone())
    }

    /// Render the report through `engine` and finalise it.
    ///
    /// The engine is closed exactly once: on success after the page reorder,
    /// otherwise through [`RenderEngine::abort`] before the error is returned.
    #[instrument(skip_all, fields(title = %self.config.title))]
    pub fn close<E: RenderEngine>(self, mut engine: E) -> Result<E::Output> {
        let mut tracker = PaginationTracker::from_config(&self.config);

        if let Err(err) = render_passes(&self.config, self.document, &mut engine, &mut tracker) {
            warn!(%err, "Rendering failed, aborting engine");
            engine.abort();
            return Err(err);
        }

        let total = engine.page_count();
        let order = reorder::front_matter_first(tracker.body_pages() as usize, total)
            .and_then(|order| engine.reorder_pages(&order));
        if let Err(err) = order {
            warn!(%err, "Page reorder failed, aborting engine");
            engine.abort();
            return Err(err);
        }

        info!(
            pages = total,
            body_pages = tracker.body_pages(),
            catalog_pages = tracker.catalog_pages(),
            "Report rendered"
        );
        engine.close()
    }

    /// Render to PDF, writing into `sink`. Returns the flushed sink.
    pub fn write_pdf<W: Write>(self, sink: W) -> Result<W> {
        let engine = PdfEngine::new(sink, &self.config);
        self.close(engine)
    }

    /// Render to a PDF file at `path`.
    pub fn write_pdf_to_file(self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = self.write_pdf(BufWriter::new(file))?;
        writer.flush()?;
        info!(path = %path.display(), "Report written");
        Ok(())
    }
}

fn render_passes<E: RenderEngine>(
    config: &ReportConfig,
    document: ReportAssembler,
    engine: &mut E,
    tracker: &mut PaginationTracker,
) -> Result<()> {
    let body = document.into_blocks();
    info!(blocks = body.len(), "Rendering body");
    tracker.switch_zone(Zone::Body);
    let events = engine.begin_zone(Zone::Body)?;
    dispatch(engine, tracker, events)?;
    for block in &body {
        let events = engine.append(block)?;
        dispatch(engine, tracker, events)?;
    }

    info!("Rendering cover");
    tracker.switch_zone(Zone::Cover);
    let events = engine.begin_zone(Zone::Cover)?;
    dispatch(engine, tracker, events)?;
    let cover = std::iter::once(Block::Paragraph {
        text: config.cover_title.clone(),
        style: TextStyle::CoverTitle,
    })
    .chain(config.cover_lines.iter().map(|line| Block::Paragraph {
        text: line.clone(),
        style: TextStyle::Body,
    }));
    for block in cover {
        let events = engine.append(&block)?;
        dispatch(engine, tracker, events)?;
    }

    let catalog = build_catalog(tracker.take_registry()?);
    info!(entries = catalog.len(), "Rendering catalog");
    tracker.switch_zone(Zone::Catalog);
    let events = engine.begin_zone(Zone::Catalog)?;
    dispatch(engine, tracker, events)?;
    let heading = Block::Paragraph {
        text: config.catalog_title.clone(),
        style: TextStyle::CatalogHeading,
    };
    let events = engine.append(&heading)?;
    dispatch(engine, tracker, events)?;
    for entry in catalog {
        let events = engine.append(&Block::CatalogLine(entry))?;
        dispatch(engine, tracker, events)?;
    }

    let events = engine.finish_pages()?;
    dispatch(engine, tracker, events)
}

/// Feed engine events to the tracker and draw the decorations it returns.
fn dispatch<E: RenderEngine>(
    engine: &mut E,
    tracker: &mut PaginationTracker,
    events: Vec<PageEvent>,
) -> Result<()> {
    for event in &events {
        let decorations = tracker.handle(event)?;
        if let PageEvent::PageEnded { page, .. } = event {
            for decoration in &decorations {
                engine.decorate(*page, decoration)?;
            }
        }
    }
    Ok(())
}
