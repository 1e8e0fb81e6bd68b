// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF engine — lays out report blocks on pages using `printpdf` 0.8, then
// finishes the file with `lopdf`.
//
// printpdf 0.8 uses a data-oriented API: pages are `Vec<Op>` lists serialised
// in one go by `PdfDocument::save()`. The engine keeps every page's ops in
// memory until close, so decorations can still be added to pages that have
// already ended. The saved bytes are then loaded back with lopdf to add what
// printpdf does not model here: table rules, link annotations, named
// destinations, and the final page order.

use std::io::Write;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use printpdf::{
    BuiltinFont, Color, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, Rgb,
    TextItem, TextMatrix,
};
use reportwerk_core::error::{ReportError, Result};
use reportwerk_core::{Alignment, Margins, PaperSize, ReportConfig, TextStyle, Zone};
use tracing::{debug, info, instrument, warn};

use super::text::{char_width, chars_per_line, text_width, wrap_text};
use super::{Block, RenderEngine};
use crate::catalog::CatalogEntry;
use crate::pagination::{Decoration, PageEvent};
use crate::reorder;
use crate::table::{TableCell, TableLayout};

/// Inner padding of a table cell, in points.
const CELL_PADDING: f32 = 5.0;
/// Minimum table row height, in points.
const MIN_ROW_HEIGHT: f32 = 22.0;
/// Space after a table, in points.
const TABLE_SPACING: f32 = 8.0;
/// Distance of the running header from the page edges, in points.
const HEADER_INSET: f32 = 30.0;
/// Baseline of the page number above the bottom edge, in points.
const FOOTER_BASELINE: f32 = 20.0;
/// Counter-clockwise rotation of the watermark, in degrees.
const WATERMARK_ANGLE: f32 = 33.0;
/// Light grey watermark fill, 223/255 per channel.
const WATERMARK_GREY: f32 = 223.0 / 255.0;

/// Vector shapes added in the lopdf pass.
#[derive(Debug, Clone, Copy)]
enum Stroke {
    Rect { x: f32, y: f32, width: f32, height: f32 },
    Line { x1: f32, y1: f32, x2: f32, y2: f32 },
}

#[derive(Debug, Clone)]
struct LinkArea {
    rect: [f32; 4],
    anchor: String,
}

/// A row-spanning cell: its row, its index in that row, and the row after
/// its last.
#[derive(Debug, Clone, Copy)]
struct OpenSpan {
    row: usize,
    cell: usize,
    last: usize,
}

#[derive(Debug, Clone)]
struct Destination {
    anchor: String,
    page: usize,
    x: f32,
    y: f32,
}

/// Everything drawn on one physical page.
struct PageBuffer {
    zone: Zone,
    /// Drawn before `ops` so it sits beneath the content (watermarks).
    underlay: Vec<Op>,
    ops: Vec<Op>,
    strokes: Vec<Stroke>,
    links: Vec<LinkArea>,
}

impl PageBuffer {
    fn new(zone: Zone) -> Self {
        Self {
            zone,
            underlay: Vec::new(),
            ops: Vec::new(),
            strokes: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Write `text` at (`x`, `baseline`) and cover it with a link to `anchor`.
    fn linked_text(&mut self, x: f32, baseline: f32, style: TextStyle, text: &str, anchor: &str) {
        if text.is_empty() {
            return;
        }
        self.ops.extend(text_ops(x, baseline, style, text));
        self.links.push(LinkArea {
            rect: [
                x,
                baseline - 3.0,
                x + text_width(text, style),
                baseline + style.font_size(),
            ],
            anchor: anchor.to_string(),
        });
    }
}

/// Render engine producing a PDF into `W`.
pub struct PdfEngine<W: Write> {
    sink: W,
    title: String,
    paper_size: PaperSize,
    page_width: f32,
    page_height: f32,
    margins: Margins,
    pages: Vec<PageBuffer>,
    page_open: bool,
    cursor_y: f32,
    destinations: Vec<Destination>,
    order: Option<Vec<usize>>,
}

impl<W: Write> PdfEngine<W> {
    pub fn new(sink: W, config: &ReportConfig) -> Self {
        let (page_width, page_height) = config.paper_size.dimensions_pt();
        Self {
            sink,
            title: config.title.clone(),
            paper_size: config.paper_size,
            page_width,
            page_height,
            margins: config.margins,
            pages: Vec::new(),
            page_open: false,
            cursor_y: page_height - config.margins.top,
            destinations: Vec::new(),
            order: None,
        }
    }

    fn content_width(&self) -> f32 {
        self.page_width - self.margins.left - self.margins.right
    }

    fn content_top(&self) -> f32 {
        self.page_height - self.margins.top
    }

    fn at_page_top(&self) -> bool {
        (self.cursor_y - self.content_top()).abs() < 0.01
    }

    fn current_page(&mut self) -> Result<&mut PageBuffer> {
        if !self.page_open {
            return Err(ReportError::logic(
                "no open page; begin a zone before appending content",
            ));
        }
        self.pages
            .last_mut()
            .ok_or_else(|| ReportError::logic("no page has been started"))
    }

    fn start_page(&mut self, zone: Zone, events: &mut Vec<PageEvent>) {
        self.pages.push(PageBuffer::new(zone));
        self.page_open = true;
        self.cursor_y = self.content_top();
        events.push(PageEvent::PageStarted {
            zone,
            page: self.pages.len(),
        });
    }

    fn end_page(&mut self, events: &mut Vec<PageEvent>) {
        if !self.page_open {
            return;
        }
        self.page_open = false;
        if let Some(page) = self.pages.last() {
            events.push(PageEvent::PageEnded {
                zone: page.zone,
                page: self.pages.len(),
            });
        }
    }

    fn break_page(&mut self, events: &mut Vec<PageEvent>) -> Result<()> {
        let zone = self.current_page()?.zone;
        self.end_page(events);
        self.start_page(zone, events);
        debug!(page = self.pages.len(), %zone, "Page break");
        Ok(())
    }

    /// Break the page unless `height` still fits above the bottom margin.
    /// A block taller than a whole page is placed on a fresh page anyway.
    fn ensure_room(&mut self, height: f32, events: &mut Vec<PageEvent>) -> Result<()> {
        if self.cursor_y - height < self.margins.bottom && !self.at_page_top() {
            self.break_page(events)?;
        }
        Ok(())
    }

    fn advance(&mut self, amount: f32) {
        self.cursor_y = (self.cursor_y - amount).max(self.margins.bottom);
    }

    // -- Blocks ---------------------------------------------------------------

    fn place_line(
        &mut self,
        line: &str,
        style: TextStyle,
        indent: f32,
        events: &mut Vec<PageEvent>,
    ) -> Result<f32> {
        let leading = style.leading();
        self.ensure_room(leading, events)?;
        let baseline = self.cursor_y - (leading + style.font_size()) / 2.0;
        let x = align(
            style.alignment(),
            self.margins.left + indent,
            self.content_width() - indent,
            text_width(line, style),
        );
        self.current_page()?
            .ops
            .extend(text_ops(x, baseline, style, line));
        self.cursor_y -= leading;
        Ok(baseline)
    }

    fn place_paragraph(
        &mut self,
        text: &str,
        style: TextStyle,
        events: &mut Vec<PageEvent>,
    ) -> Result<()> {
        let (before, after) = style.spacing();
        let indent = style.first_line_indent();
        self.advance(before);
        let max_chars = chars_per_line(self.content_width() - indent, style);
        for (i, line) in wrap_text(text, max_chars).iter().enumerate() {
            let indent = if i == 0 { indent } else { 0.0 };
            self.place_line(line, style, indent, events)?;
        }
        self.advance(after);
        Ok(())
    }

    fn place_heading(
        &mut self,
        label: &str,
        anchor: &str,
        style: TextStyle,
        events: &mut Vec<PageEvent>,
    ) -> Result<()> {
        let (before, after) = style.spacing();
        self.advance(before);
        self.ensure_room(style.leading(), events)?;

        let page = self.pages.len();
        self.destinations.push(Destination {
            anchor: anchor.to_string(),
            page,
            x: self.margins.left,
            y: self.cursor_y,
        });
        events.push(PageEvent::NodeEmitted {
            label: label.to_string(),
            anchor: anchor.to_string(),
            page,
        });

        for line in wrap_text(label, chars_per_line(self.content_width(), style)) {
            self.place_line(&line, style, 0.0, events)?;
        }
        self.advance(after);
        Ok(())
    }

    fn place_table(&mut self, table: &TableLayout, events: &mut Vec<PageEvent>) -> Result<()> {
        if table.column_count() == 0 {
            return Ok(());
        }
        let width = self.content_width();
        let mut edges = vec![self.margins.left];
        for fraction in table.width_fractions() {
            let last = edges[edges.len() - 1];
            edges.push(last + fraction * width);
        }
        let columns = table.column_count();
        let cell_bounds = |cell: &TableCell| {
            let start = cell.column.min(columns - 1);
            let end = (cell.column + cell.col_span.max(1)).min(columns);
            (edges[start], edges[end] - edges[start])
        };

        let rows: Vec<_> = table.header.iter().chain(table.rows.iter()).collect();

        // Wrap every cell and size the rows. Single-row cells set the row
        // height; a spanned cell that needs more room stretches its last row.
        let mut heights = vec![MIN_ROW_HEIGHT; rows.len()];
        let mut wrapped: Vec<Vec<Vec<String>>> = Vec::with_capacity(rows.len());
        for (r, row) in rows.iter().enumerate() {
            let mut row_lines = Vec::with_capacity(row.cells.len());
            for cell in &row.cells {
                let (_, cell_width) = cell_bounds(cell);
                let max_chars = chars_per_line(cell_width - 2.0 * CELL_PADDING, cell.style);
                let lines = wrap_text(&cell.text, max_chars);
                if cell.row_span <= 1 {
                    let need = lines.len() as f32 * cell.style.leading() + 2.0 * CELL_PADDING;
                    heights[r] = heights[r].max(need);
                }
                row_lines.push(lines);
            }
            wrapped.push(row_lines);
        }
        for (r, row) in rows.iter().enumerate() {
            for (cell, lines) in row.cells.iter().zip(&wrapped[r]) {
                if cell.row_span <= 1 {
                    continue;
                }
                let last = (r + cell.row_span).min(rows.len());
                let have: f32 = heights[r..last].iter().sum();
                let need = lines.len() as f32 * cell.style.leading() + 2.0 * CELL_PADDING;
                if need > have {
                    heights[last - 1] += need - have;
                }
            }
        }

        let max_height = self.content_top() - self.margins.bottom;
        for height in heights.iter_mut().filter(|height| **height > max_height) {
            warn!(height = *height, max_height, "Table row taller than a page; clipping");
            *height = max_height;
        }

        // Spans still running into later rows, redrawn after a page break.
        let mut open: Vec<OpenSpan> = Vec::new();
        for (r, row) in rows.iter().enumerate() {
            let page_before = self.pages.len();
            self.ensure_room(heights[r], events)?;
            open.retain(|span| span.last > r);
            if self.pages.len() != page_before {
                for span in &open {
                    let cell = &rows[span.row].cells[span.cell];
                    let height = self.visible_height(&heights[r..span.last]);
                    self.draw_cell(
                        cell,
                        &wrapped[span.row][span.cell],
                        cell_bounds(cell),
                        height,
                    )?;
                }
            }

            for (c, (cell, lines)) in row.cells.iter().zip(&wrapped[r]).enumerate() {
                let last = (r + cell.row_span.max(1)).min(rows.len());
                let height = self.visible_height(&heights[r..last]);
                self.draw_cell(cell, lines, cell_bounds(cell), height)?;
                if last > r + 1 {
                    open.push(OpenSpan {
                        row: r,
                        cell: c,
                        last,
                    });
                }
            }
            self.cursor_y -= heights[r];
        }
        self.advance(TABLE_SPACING);
        Ok(())
    }

    /// Combined height of the leading `heights` that fit between the cursor
    /// and the bottom margin. The first row always counts.
    fn visible_height(&self, heights: &[f32]) -> f32 {
        let mut y = self.cursor_y;
        let mut total = 0.0;
        for (i, height) in heights.iter().enumerate() {
            if i > 0 && y - height < self.margins.bottom {
                break;
            }
            y -= height;
            total += height;
        }
        total
    }

    /// Draw a cell's border and as many of its lines as fit, vertically
    /// centred, with the cell top at the cursor.
    fn draw_cell(
        &mut self,
        cell: &TableCell,
        lines: &[String],
        (x, width): (f32, f32),
        height: f32,
    ) -> Result<()> {
        let top = self.cursor_y;
        let page = self.current_page()?;
        page.strokes.push(Stroke::Rect {
            x,
            y: top - height,
            width,
            height,
        });

        let leading = cell.style.leading();
        let fit = ((height - 2.0 * CELL_PADDING) / leading + 0.01).floor().max(0.0) as usize;
        let shown = &lines[..lines.len().min(fit)];
        if shown.len() < lines.len() {
            debug!(
                lines = lines.len(),
                shown = shown.len(),
                "Cell text truncated to its visible height"
            );
        }
        let block = shown.len() as f32 * leading;
        let offset = ((height - 2.0 * CELL_PADDING - block) / 2.0).max(0.0);
        for (i, line) in shown.iter().enumerate() {
            let baseline = top
                - CELL_PADDING
                - offset
                - i as f32 * leading
                - (leading + cell.style.font_size()) / 2.0;
            let line_x = align(
                cell.alignment,
                x + CELL_PADDING,
                width - 2.0 * CELL_PADDING,
                text_width(line, cell.style),
            );
            page.ops.extend(text_ops(line_x, baseline, cell.style, line));
        }
        Ok(())
    }

    fn place_catalog_line(
        &mut self,
        entry: &CatalogEntry,
        events: &mut Vec<PageEvent>,
    ) -> Result<()> {
        let leading = entry.style.leading();
        let left = self.margins.left;
        let right = left + self.content_width();
        let [title, leader, number] = entry.fragments();

        let number_width = text_width(&number.text, number.style);
        let number_x = right - number_width;
        // Long titles wrap; the leader and page number follow the last line.
        let title_room = (number_x - left - 4.0 * char_width(leader.style) - 8.0)
            .max(char_width(title.style));
        let lines = wrap_text(&title.text, chars_per_line(title_room, title.style));
        let (tail, head) = match lines.split_last() {
            Some((tail, head)) => (tail.as_str(), head),
            None => ("", &[][..]),
        };

        for line in head {
            self.ensure_room(leading, events)?;
            let baseline = self.cursor_y - (leading + entry.style.font_size()) / 2.0;
            self.current_page()?
                .linked_text(left, baseline, title.style, line, &title.link);
            self.cursor_y -= leading;
        }

        self.ensure_room(leading, events)?;
        let baseline = self.cursor_y - (leading + entry.style.font_size()) / 2.0;
        let leader_start = left + text_width(tail, title.style) + 4.0;
        let leader_room = (number_x - 4.0 - leader_start).max(0.0);
        let dots = (leader_room / char_width(leader.style)).floor() as usize;
        let leader_text = leader.text.repeat(dots);

        let page = self.current_page()?;
        page.linked_text(left, baseline, title.style, tail, &title.link);
        page.linked_text(leader_start, baseline, leader.style, &leader_text, &leader.link);
        page.linked_text(number_x, baseline, number.style, &number.text, &number.link);
        self.cursor_y -= leading;
        Ok(())
    }

    // -- Finalisation ---------------------------------------------------------

    /// Serialise the pages with printpdf, then wire strokes, links,
    /// destinations, and the page order with lopdf.
    fn render_pdf(&mut self) -> Result<Vec<u8>> {
        let (w_mm, h_mm) = self.paper_size.dimensions_mm();
        let (page_w, page_h) = (Mm(w_mm as f32), Mm(h_mm as f32));

        let mut doc = PdfDocument::new(&self.title);
        let pages: Vec<PdfPage> = self
            .pages
            .iter_mut()
            .map(|page| {
                let mut ops = std::mem::take(&mut page.underlay);
                ops.append(&mut page.ops);
                PdfPage::new(page_w, page_h, ops)
            })
            .collect();
        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(warnings = warnings.len(), "printpdf reported warnings");
        }

        let mut pdf = Document::load_mem(&bytes).map_err(|err| {
            ReportError::rendering(format!("failed to reload generated PDF: {err}"))
        })?;
        self.wire_pages(&mut pdf)?;
        if let Some(order) = &self.order {
            reorder::apply_page_order(&mut pdf, order)?;
        }

        let mut output = Vec::new();
        pdf.save_to(&mut output)
            .map_err(|err| ReportError::rendering(format!("failed to serialise PDF: {err}")))?;
        Ok(output)
    }

    fn wire_pages(&self, pdf: &mut Document) -> Result<()> {
        let page_ids: Vec<ObjectId> = pdf.get_pages().into_values().collect();
        if page_ids.len() != self.pages.len() {
            return Err(ReportError::rendering(format!(
                "generated PDF has {} pages, expected {}",
                page_ids.len(),
                self.pages.len()
            )));
        }

        for (page, &page_id) in self.pages.iter().zip(&page_ids) {
            if !page.strokes.is_empty() {
                let content = stroke_content(&page.strokes).encode().map_err(|err| {
                    ReportError::rendering(format!("failed to encode table rules: {err}"))
                })?;
                let stream_id = pdf.add_object(Stream::new(Dictionary::new(), content));
                append_contents(pdf, page_id, stream_id)?;
            }
            if !page.links.is_empty() {
                let annotations: Vec<Object> = page
                    .links
                    .iter()
                    .map(|link| Object::Reference(pdf.add_object(link_annotation(link))))
                    .collect();
                add_annotations(pdf, page_id, annotations)?;
            }
        }

        if !self.destinations.is_empty() {
            let mut dests = Dictionary::new();
            for dest in &self.destinations {
                let page_id = page_ids[dest.page - 1];
                dests.set(
                    dest.anchor.as_bytes().to_vec(),
                    Object::Array(vec![
                        Object::Reference(page_id),
                        Object::Name(b"XYZ".to_vec()),
                        real(dest.x),
                        real(dest.y),
                        Object::Null,
                    ]),
                );
            }
            let dests_id = pdf.add_object(dests);
            let root_id = pdf
                .trailer
                .get(b"Root")
                .and_then(Object::as_reference)
                .map_err(|err| ReportError::rendering(format!("no document catalog: {err}")))?;
            pdf.get_object_mut(root_id)
                .and_then(Object::as_dict_mut)
                .map_err(|err| ReportError::rendering(format!("no document catalog: {err}")))?
                .set("Dests", Object::Reference(dests_id));
        }
        Ok(())
    }
}

impl<W: Write> RenderEngine for PdfEngine<W> {
    type Output = W;

    fn begin_zone(&mut self, zone: Zone) -> Result<Vec<PageEvent>> {
        let mut events = Vec::new();
        self.end_page(&mut events);
        self.start_page(zone, &mut events);
        info!(%zone, page = self.pages.len(), "Zone started");
        Ok(events)
    }

    fn append(&mut self, block: &Block) -> Result<Vec<PageEvent>> {
        self.current_page()?;
        let mut events = Vec::new();
        match block {
            Block::Heading {
                label,
                anchor,
                style,
            } => self.place_heading(label, anchor, *style, &mut events)?,
            Block::Paragraph { text, style } => self.place_paragraph(text, *style, &mut events)?,
            Block::Table(table) => self.place_table(table, &mut events)?,
            Block::CatalogLine(entry) => self.place_catalog_line(entry, &mut events)?,
        }
        Ok(events)
    }

    fn finish_pages(&mut self) -> Result<Vec<PageEvent>> {
        let mut events = Vec::new();
        self.end_page(&mut events);
        Ok(events)
    }

    fn decorate(&mut self, page: usize, decoration: &Decoration) -> Result<()> {
        let (page_width, page_height) = (self.page_width, self.page_height);
        let count = self.pages.len();
        let buffer = page
            .checked_sub(1)
            .and_then(|index| self.pages.get_mut(index))
            .ok_or_else(|| {
                ReportError::logic(format!("cannot decorate page {page} of {count}"))
            })?;

        match decoration {
            Decoration::Header(text) => {
                let style = TextStyle::PageHeader;
                let baseline = page_height - HEADER_INSET;
                let x = page_width - HEADER_INSET - text_width(text, style);
                buffer.ops.extend(text_ops(x, baseline, style, text));
                buffer.strokes.push(Stroke::Line {
                    x1: HEADER_INSET,
                    y1: baseline - 4.0,
                    x2: page_width - HEADER_INSET,
                    y2: baseline - 4.0,
                });
            }
            Decoration::Footer(text) => {
                let style = TextStyle::PageFooter;
                let x = (page_width - text_width(text, style)) / 2.0;
                buffer.ops.extend(text_ops(x, FOOTER_BASELINE, style, text));
            }
            Decoration::Watermark(text) => {
                buffer
                    .underlay
                    .extend(watermark_ops(page_width, page_height, text));
            }
        }
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn reorder_pages(&mut self, order: &[usize]) -> Result<()> {
        if self.order.is_some() {
            return Err(ReportError::logic("page order has already been set"));
        }
        reorder::validate_permutation(order, self.pages.len())?;
        self.order = Some(order.to_vec());
        Ok(())
    }

    #[instrument(skip(self), fields(pages = self.pages.len()))]
    fn close(mut self) -> Result<W> {
        if self.page_open {
            return Err(ReportError::logic(format!(
                "page {} is still open; finish pages before closing",
                self.pages.len()
            )));
        }
        let bytes = self.render_pdf()?;
        self.sink
            .write_all(&bytes)
            .and_then(|()| self.sink.flush())
            .map_err(|err| ReportError::rendering(format!("failed to write PDF: {err}")))?;
        info!(bytes = bytes.len(), "PDF written");
        Ok(self.sink)
    }

    fn abort(mut self) {
        warn!(pages = self.pages.len(), "Discarding unfinished PDF");
        if let Err(err) = self.sink.flush() {
            warn!(%err, "Failed to flush sink while aborting");
        }
    }
}

// -- Helpers -------------------------------------------------------------------

fn builtin_font(style: TextStyle) -> BuiltinFont {
    if style.bold() {
        BuiltinFont::HelveticaBold
    } else {
        BuiltinFont::Helvetica
    }
}

/// printpdf ops that write one line of text with its baseline at (`x`, `y`).
fn text_ops(x: f32, y: f32, style: TextStyle, text: &str) -> Vec<Op> {
    vec![
        Op::StartTextSection,
        Op::SetTextCursor {
            pos: Point { x: Pt(x), y: Pt(y) },
        },
        Op::SetFontSizeBuiltinFont {
            size: Pt(style.font_size()),
            font: builtin_font(style),
        },
        Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font: builtin_font(style),
        },
        Op::EndTextSection,
    ]
}

/// Light grey text rotated about the page centre, in its own graphics state
/// so the fill colour does not leak into the content drawn after it.
fn watermark_ops(page_width: f32, page_height: f32, text: &str) -> Vec<Op> {
    let style = TextStyle::Watermark;
    let (sin, cos) = WATERMARK_ANGLE.to_radians().sin_cos();
    let half_width = text_width(text, style) / 2.0;
    let half_height = style.font_size() / 3.0;
    // Origin chosen so the rotated text box is centred on the page.
    let x = page_width / 2.0 - (cos * half_width - sin * half_height);
    let y = page_height / 2.0 - (sin * half_width + cos * half_height);
    vec![
        Op::SaveGraphicsState,
        Op::StartTextSection,
        Op::SetFillColor {
            col: Color::Rgb(Rgb::new(WATERMARK_GREY, WATERMARK_GREY, WATERMARK_GREY, None)),
        },
        Op::SetFontSizeBuiltinFont {
            size: Pt(style.font_size()),
            font: builtin_font(style),
        },
        Op::SetTextMatrix {
            matrix: TextMatrix::TranslateRotate(Pt(x), Pt(y), WATERMARK_ANGLE),
        },
        Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font: builtin_font(style),
        },
        Op::EndTextSection,
        Op::RestoreGraphicsState,
    ]
}

/// Left edge of a `text_width`-wide line aligned in [`left`, `left + width`].
fn align(alignment: Alignment, left: f32, width: f32, text_width: f32) -> f32 {
    let x = match alignment {
        Alignment::Left => left,
        Alignment::Center => left + (width - text_width) / 2.0,
        Alignment::Right => left + width - text_width,
    };
    x.max(left)
}

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

fn stroke_content(strokes: &[Stroke]) -> Content {
    let mut operations = vec![
        Operation::new("q", vec![]),
        Operation::new("w", vec![real(0.5)]),
        Operation::new("G", vec![real(0.4)]),
    ];
    for stroke in strokes {
        match *stroke {
            Stroke::Rect {
                x,
                y,
                width,
                height,
            } => operations.push(Operation::new(
                "re",
                vec![real(x), real(y), real(width), real(height)],
            )),
            Stroke::Line { x1, y1, x2, y2 } => {
                operations.push(Operation::new("m", vec![real(x1), real(y1)]));
                operations.push(Operation::new("l", vec![real(x2), real(y2)]));
            }
        }
    }
    operations.push(Operation::new("S", vec![]));
    operations.push(Operation::new("Q", vec![]));
    Content { operations }
}

fn link_annotation(link: &LinkArea) -> Dictionary {
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => link.rect.iter().copied().map(real).collect::<Vec<Object>>(),
        "Border" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
        "Dest" => Object::Name(link.anchor.as_bytes().to_vec()),
    }
}

fn page_dict_mut(pdf: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary> {
    pdf.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|err| ReportError::rendering(format!("page object {page_id:?}: {err}")))
}

/// Add a content stream after the page's existing ones.
fn append_contents(pdf: &mut Document, page_id: ObjectId, stream_id: ObjectId) -> Result<()> {
    let page = page_dict_mut(pdf, page_id)?;
    let mut contents = match page.get(b"Contents") {
        Ok(Object::Array(items)) => items.clone(),
        Ok(other) => vec![other.clone()],
        Err(_) => Vec::new(),
    };
    contents.push(Object::Reference(stream_id));
    page.set("Contents", Object::Array(contents));
    Ok(())
}

fn add_annotations(pdf: &mut Document, page_id: ObjectId, annotations: Vec<Object>) -> Result<()> {
    let page = page_dict_mut(pdf, page_id)?;
    let mut annots = match page.get(b"Annots") {
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    };
    annots.extend(annotations);
    page.set("Annots", Object::Array(annots));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{ListTable, RowRecord, TableRow};

    fn engine() -> PdfEngine<Vec<u8>> {
        PdfEngine::new(Vec::new(), &ReportConfig::default())
    }

    fn paragraph(text: &str) -> Block {
        Block::Paragraph {
            text: text.to_string(),
            style: TextStyle::Body,
        }
    }

    /// Text written on a page, one entry per write op.
    fn page_texts(page: &PageBuffer) -> Vec<String> {
        page.ops
            .iter()
            .filter_map(|op| match op {
                Op::WriteTextBuiltinFont { items, .. } => Some(
                    items
                        .iter()
                        .filter_map(|item| match item {
                            TextItem::Text(text) => Some(text.as_str()),
                            TextItem::Offset(_) => None,
                        })
                        .collect(),
                ),
                _ => None,
            })
            .collect()
    }

    fn rect_heights(page: &PageBuffer) -> Vec<f32> {
        page.strokes
            .iter()
            .filter_map(|stroke| match stroke {
                Stroke::Rect { height, .. } => Some(*height),
                Stroke::Line { .. } => None,
            })
            .collect()
    }

    #[test]
    fn append_before_zone_is_logic_error() {
        let mut engine = engine();
        assert!(matches!(
            engine.append(&paragraph("early")),
            Err(ReportError::Logic(_))
        ));
    }

    #[test]
    fn zones_start_and_end_pages() {
        let mut engine = engine();
        let first = engine.begin_zone(Zone::Body).unwrap();
        assert_eq!(first, vec![PageEvent::PageStarted { zone: Zone::Body, page: 1 }]);

        let second = engine.begin_zone(Zone::Cover).unwrap();
        assert_eq!(
            second,
            vec![
                PageEvent::PageEnded { zone: Zone::Body, page: 1 },
                PageEvent::PageStarted { zone: Zone::Cover, page: 2 },
            ]
        );
        assert_eq!(
            engine.finish_pages().unwrap(),
            vec![PageEvent::PageEnded { zone: Zone::Cover, page: 2 }]
        );
        assert_eq!(engine.page_count(), 2);
    }

    #[test]
    fn long_content_breaks_pages() {
        let mut engine = engine();
        engine.begin_zone(Zone::Body).unwrap();
        let mut events = Vec::new();
        for i in 0..80 {
            events.extend(engine.append(&paragraph(&format!("Paragraph {i}"))).unwrap());
        }
        assert!(engine.page_count() > 1);
        assert!(events.contains(&PageEvent::PageStarted { zone: Zone::Body, page: 2 }));
    }

    #[test]
    fn heading_reports_its_page() {
        let mut engine = engine();
        engine.begin_zone(Zone::Body).unwrap();
        let events = engine
            .append(&Block::Heading {
                label: "1 Intro".into(),
                anchor: "Intro".into(),
                style: TextStyle::ChapterTitle,
            })
            .unwrap();
        assert_eq!(
            events,
            vec![PageEvent::NodeEmitted {
                label: "1 Intro".into(),
                anchor: "Intro".into(),
                page: 1,
            }]
        );
    }

    #[test]
    fn decorating_missing_page_is_logic_error() {
        let mut engine = engine();
        engine.begin_zone(Zone::Body).unwrap();
        let header = Decoration::Header("ACME".into());
        assert!(engine.decorate(1, &header).is_ok());
        assert!(matches!(engine.decorate(2, &header), Err(ReportError::Logic(_))));
        assert!(matches!(engine.decorate(0, &header), Err(ReportError::Logic(_))));
    }

    #[test]
    fn reorder_is_validated_and_set_once() {
        let mut engine = engine();
        engine.begin_zone(Zone::Body).unwrap();
        engine.begin_zone(Zone::Cover).unwrap();
        assert!(engine.reorder_pages(&[1]).is_err());
        engine.reorder_pages(&[2, 1]).unwrap();
        assert!(matches!(
            engine.reorder_pages(&[2, 1]),
            Err(ReportError::Logic(_))
        ));
    }

    #[test]
    fn close_with_open_page_is_logic_error() {
        let mut engine = engine();
        engine.begin_zone(Zone::Body).unwrap();
        assert!(matches!(engine.close(), Err(ReportError::Logic(_))));
    }

    #[test]
    fn writes_reordered_pdf_with_destinations() {
        let table = ListTable::new([("Name", "name")])
            .merge_rows(true)
            .rows([
                RowRecord::new().with("name", "A"),
                RowRecord::new().with("name", "A"),
            ])
            .build()
            .unwrap();

        let mut engine = engine();
        engine.begin_zone(Zone::Body).unwrap();
        engine
            .append(&Block::Heading {
                label: "1 Intro".into(),
                anchor: "Intro".into(),
                style: TextStyle::ChapterTitle,
            })
            .unwrap();
        engine.append(&Block::Table(table)).unwrap();
        engine.begin_zone(Zone::Cover).unwrap();
        engine.append(&paragraph("Cover")).unwrap();
        engine.finish_pages().unwrap();
        engine.decorate(1, &Decoration::Footer("1".into())).unwrap();
        engine.reorder_pages(&[2, 1]).unwrap();

        let bytes = engine.close().unwrap();
        let pdf = Document::load_mem(&bytes).unwrap();
        assert_eq!(pdf.get_pages().len(), 2);

        let catalog = pdf.catalog().unwrap();
        let dests_id = catalog.get(b"Dests").unwrap().as_reference().unwrap();
        let dests = pdf.get_dictionary(dests_id).unwrap();
        let target = dests.get(b"Intro").unwrap().as_array().unwrap();
        let intro_page = target[0].as_reference().unwrap();

        // The body page now sits second.
        assert_eq!(pdf.get_pages()[&2], intro_page);
    }

    #[test]
    fn watermark_is_grey_and_rotated() {
        let mut engine = engine();
        engine.begin_zone(Zone::Body).unwrap();
        engine.append(&paragraph("Body")).unwrap();
        engine.finish_pages().unwrap();
        engine
            .decorate(1, &Decoration::Watermark("DRAFT".into()))
            .unwrap();

        let bytes = engine.close().unwrap();
        let pdf = Document::load_mem(&bytes).unwrap();
        let page_id = pdf.get_pages()[&1];
        let content = Content::decode(&pdf.get_page_content(page_id).unwrap()).unwrap();
        let operators: Vec<&str> = content
            .operations
            .iter()
            .map(|op| op.operator.as_str())
            .collect();

        assert!(operators.contains(&"rg"), "no fill colour in {operators:?}");
        let matrix = content
            .operations
            .iter()
            .find(|op| op.operator == "Tm")
            .expect("watermark text matrix");
        // A rotated matrix has a non-zero second component.
        let b = matrix.operands[1].as_float().unwrap();
        assert!((b - WATERMARK_ANGLE.to_radians().sin()).abs() < 0.01);
    }

    #[test]
    fn merged_run_continues_on_next_page() {
        let table = ListTable::new([("Name", "name"), ("Dept", "dept")])
            .merge_columns(["dept"])
            .rows((0..60).map(|i| {
                RowRecord::new()
                    .with("name", format!("Person {i}"))
                    .with("dept", "Sales")
            }))
            .build()
            .unwrap();

        let mut engine = engine();
        engine.begin_zone(Zone::Body).unwrap();
        engine.append(&Block::Table(table)).unwrap();
        assert!(engine.page_count() >= 2);

        let second = &engine.pages[1];
        assert!(page_texts(second).iter().any(|text| text == "Sales"));
        assert!(
            rect_heights(second)
                .iter()
                .any(|height| *height > 2.0 * MIN_ROW_HEIGHT)
        );
        // The first page's part of the run stops at the bottom margin.
        let bottom = engine.margins.bottom;
        for stroke in &engine.pages[0].strokes {
            if let Stroke::Rect { y, .. } = stroke {
                assert!(*y >= bottom - 0.01);
            }
        }
    }

    #[test]
    fn long_catalog_title_wraps_before_page_number() {
        let entry = CatalogEntry {
            depth: 0,
            label: format!("1 {}", "Quarterly revenue summary ".repeat(8)),
            anchor: "Quarterly".into(),
            page: 12,
            style: TextStyle::CatalogChapter,
        };

        let mut engine = engine();
        engine.begin_zone(Zone::Catalog).unwrap();
        engine.append(&Block::CatalogLine(entry)).unwrap();

        let left = engine.margins.left;
        let links = &engine.pages[0].links;
        let (number, rest) = links.split_last().unwrap();
        let title_lines = rest
            .iter()
            .filter(|link| (link.rect[0] - left).abs() < 0.01)
            .count();
        assert!(title_lines >= 2);
        assert!(rest.iter().all(|link| link.rect[2] <= number.rect[0]));
        assert!(page_texts(&engine.pages[0]).contains(&"12".to_string()));
    }

    #[test]
    fn row_taller_than_page_is_clipped() {
        let table = TableLayout {
            widths: vec![1.0],
            header: None,
            rows: vec![TableRow {
                cells: vec![TableCell::new(0, "word ".repeat(3000), TextStyle::TableBody)],
            }],
        };

        let mut engine = engine();
        engine.begin_zone(Zone::Body).unwrap();
        engine.append(&Block::Table(table)).unwrap();

        let bottom = engine.margins.bottom;
        assert_eq!(engine.page_count(), 1);
        assert!(engine.cursor_y >= bottom - 0.01);
        let page = &engine.pages[0];
        assert!(rect_heights(page).iter().all(|height| *height <= 841.89 - 96.0 + 0.01));
        for op in &page.ops {
            if let Op::SetTextCursor { pos } = op {
                assert!(pos.y.0 >= bottom);
            }
        }
    }
}
