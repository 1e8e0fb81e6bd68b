// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagination tracker — a small state machine over the three render zones.
//
// The pipeline switches zone before each render sub-pass and feeds every page
// event the engine reports, in order. The tracker:
//
//   * counts catalog and body pages (cover pages are not counted);
//   * records each emitted heading against the current body page;
//   * answers each finished page with the decorations its zone calls for.
//
// Heading page numbers only exist once the engine has paginated the body,
// which is why the catalog is rendered last and reads the registry from here.

use reportwerk_core::error::{ReportError, Result};
use reportwerk_core::{ReportConfig, Zone};
use tracing::{debug, trace};

use super::event::{Decoration, PageEvent};
use super::registry::TitleRegistry;

#[derive(Debug)]
pub struct PaginationTracker {
    zone: Option<Zone>,
    catalog_page: u32,
    body_page: u32,
    registry: Option<TitleRegistry>,
    header: Option<String>,
    watermark: Option<String>,
}

impl PaginationTracker {
    pub fn new(header: Option<String>, watermark: Option<String>) -> Self {
        Self {
            zone: None,
            catalog_page: 0,
            body_page: 0,
            registry: Some(TitleRegistry::new()),
            header: header.filter(|text| !text.trim().is_empty()),
            watermark: watermark.filter(|text| !text.trim().is_empty()),
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(
            config.header_text().map(str::to_string),
            config.watermark_text().map(str::to_string),
        )
    }

    /// Enter `zone`. Must precede the engine's page start for that zone.
    pub fn switch_zone(&mut self, zone: Zone) {
        debug!(from = ?self.zone, to = %zone, "Switching render zone");
        self.zone = Some(zone);
    }

    pub fn zone(&self) -> Option<Zone> {
        self.zone
    }

    /// Body pages started so far.
    pub fn body_pages(&self) -> u32 {
        self.body_page
    }

    /// Catalog pages started so far.
    pub fn catalog_pages(&self) -> u32 {
        self.catalog_page
    }

    /// Apply one page event. A `PageEnded` event yields the decorations to
    /// draw on that page; every other event yields none.
    pub fn handle(&mut self, event: &PageEvent) -> Result<Vec<Decoration>> {
        match event {
            PageEvent::PageStarted { zone, page } => {
                if self.zone != Some(*zone) {
                    return Err(ReportError::logic(format!(
                        "page {page} started in the {zone} zone while the tracker is in {:?}; \
                         switch zones before rendering",
                        self.zone
                    )));
                }
                match zone {
                    Zone::Catalog => self.catalog_page += 1,
                    Zone::Body => self.body_page += 1,
                    Zone::Cover => {}
                }
                trace!(page, %zone, body = self.body_page, catalog = self.catalog_page, "Page started");
                Ok(Vec::new())
            }
            PageEvent::NodeEmitted {
                label,
                anchor,
                page,
            } => {
                let body_page = self.body_page;
                let registry = self.registry.as_mut().ok_or_else(|| {
                    ReportError::logic(format!(
                        "heading {label:?} emitted after the title registry was handed to the catalog"
                    ))
                })?;
                registry.record(label.as_str(), anchor.as_str(), body_page);
                debug!(label = %label, physical_page = page, body_page, "Heading recorded");
                Ok(Vec::new())
            }
            PageEvent::PageEnded { zone, .. } => Ok(self.decorations(*zone)),
        }
    }

    /// Hand the registry over. Only the first call succeeds.
    pub fn take_registry(&mut self) -> Result<TitleRegistry> {
        self.registry
            .take()
            .ok_or_else(|| ReportError::logic("title registry was already consumed"))
    }

    fn decorations(&self, zone: Zone) -> Vec<Decoration> {
        let header = self.header.clone().map(Decoration::Header);
        let watermark = self.watermark.clone().map(Decoration::Watermark);
        let footer = |page: u32| Some(Decoration::Footer(page.to_string()));

        let parts = match zone {
            Zone::Cover => [header, None, watermark],
            Zone::Catalog => [None, footer(self.catalog_page), watermark],
            Zone::Body => [header, footer(self.body_page), watermark],
        };
        parts.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(zone: Zone, page: usize) -> PageEvent {
        PageEvent::PageStarted { zone, page }
    }

    fn ended(zone: Zone, page: usize) -> PageEvent {
        PageEvent::PageEnded { zone, page }
    }

    fn heading(label: &str, page: usize) -> PageEvent {
        PageEvent::NodeEmitted {
            label: label.into(),
            anchor: label.into(),
            page,
        }
    }

    #[test]
    fn counts_body_and_catalog_but_not_cover() {
        let mut tracker = PaginationTracker::new(None, None);
        tracker.switch_zone(Zone::Body);
        tracker.handle(&started(Zone::Body, 1)).unwrap();
        tracker.handle(&ended(Zone::Body, 1)).unwrap();
        tracker.handle(&started(Zone::Body, 2)).unwrap();
        tracker.switch_zone(Zone::Cover);
        tracker.handle(&ended(Zone::Body, 2)).unwrap();
        tracker.handle(&started(Zone::Cover, 3)).unwrap();
        tracker.switch_zone(Zone::Catalog);
        tracker.handle(&ended(Zone::Cover, 3)).unwrap();
        tracker.handle(&started(Zone::Catalog, 4)).unwrap();

        assert_eq!(tracker.body_pages(), 2);
        assert_eq!(tracker.catalog_pages(), 1);
    }

    #[test]
    fn headings_record_current_body_page() {
        let mut tracker = PaginationTracker::new(None, None);
        tracker.switch_zone(Zone::Body);
        tracker.handle(&started(Zone::Body, 1)).unwrap();
        tracker.handle(&heading("1 Intro", 1)).unwrap();
        tracker.handle(&heading("1.1 Scope", 1)).unwrap();
        tracker.handle(&ended(Zone::Body, 1)).unwrap();
        tracker.handle(&started(Zone::Body, 2)).unwrap();
        tracker.handle(&heading("2 Design", 2)).unwrap();

        let pages: Vec<(String, u32)> = tracker
            .take_registry()
            .unwrap()
            .into_iter()
            .map(|e| (e.label, e.page))
            .collect();
        assert_eq!(
            pages,
            vec![
                ("1 Intro".to_string(), 1),
                ("1.1 Scope".to_string(), 1),
                ("2 Design".to_string(), 2),
            ]
        );
    }

    #[test]
    fn registry_is_consumed_once() {
        let mut tracker = PaginationTracker::new(None, None);
        tracker.take_registry().unwrap();
        assert!(matches!(tracker.take_registry(), Err(ReportError::Logic(_))));
        assert!(tracker.handle(&heading("1 Late", 1)).is_err());
    }

    #[test]
    fn decorations_follow_zone() {
        let mut tracker = PaginationTracker::new(Some("ACME".into()), Some("DRAFT".into()));
        tracker.switch_zone(Zone::Body);
        tracker.handle(&started(Zone::Body, 1)).unwrap();

        let body = tracker.handle(&ended(Zone::Body, 1)).unwrap();
        assert_eq!(
            body,
            vec![
                Decoration::Header("ACME".into()),
                Decoration::Footer("1".into()),
                Decoration::Watermark("DRAFT".into()),
            ]
        );

        let cover = tracker.handle(&ended(Zone::Cover, 2)).unwrap();
        assert_eq!(
            cover,
            vec![
                Decoration::Header("ACME".into()),
                Decoration::Watermark("DRAFT".into()),
            ]
        );

        tracker.switch_zone(Zone::Catalog);
        tracker.handle(&started(Zone::Catalog, 3)).unwrap();
        let catalog = tracker.handle(&ended(Zone::Catalog, 3)).unwrap();
        assert_eq!(
            catalog,
            vec![
                Decoration::Footer("1".into()),
                Decoration::Watermark("DRAFT".into()),
            ]
        );
    }

    #[test]
    fn blank_header_and_watermark_are_skipped() {
        let mut tracker = PaginationTracker::new(Some(" ".into()), None);
        tracker.switch_zone(Zone::Cover);
        let cover = tracker.handle(&ended(Zone::Cover, 1)).unwrap();
        assert!(cover.is_empty());
    }

    #[test]
    fn page_start_outside_current_zone_is_logic_error() {
        let mut tracker = PaginationTracker::new(None, None);
        tracker.switch_zone(Zone::Cover);
        assert!(matches!(
            tracker.handle(&started(Zone::Body, 1)),
            Err(ReportError::Logic(_))
        ));
    }
}
