// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-page overlay storage.

use std::collections::BTreeMap;

use image::RgbaImage;

/// State kept for a visited page.
#[derive(Debug, Clone)]
pub struct PageRecord {
    /// 1-based page index.
    pub page: u32,
    pub width: u32,
    pub height: u32,
    /// Background plus ink as last captured; `None` until the page is drawn on.
    overlay: Option<RgbaImage>,
}

impl PageRecord {
    pub fn overlay(&self) -> Option<&RgbaImage> {
        self.overlay.as_ref()
    }
}

/// Page records keyed by page index.
#[derive(Debug, Clone, Default)]
pub struct PageStore {
    records: BTreeMap<u32, PageRecord>,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, page: u32) -> Option<&PageRecord> {
        self.records.get(&page)
    }

    /// Record a visit to `page` rendered at `width`×`height`.
    pub fn visit(&mut self, page: u32, width: u32, height: u32) -> &mut PageRecord {
        let record = self.records.entry(page).or_insert_with(|| PageRecord {
            page,
            width,
            height,
            overlay: None,
        });
        record.width = width;
        record.height = height;
        record
    }

    pub fn overlay(&self, page: u32) -> Option<&RgbaImage> {
        self.records.get(&page).and_then(PageRecord::overlay)
    }

    pub fn has_overlay(&self, page: u32) -> bool {
        self.overlay(page).is_some()
    }

    /// Store `overlay` for `page`, creating the record if needed.
    pub fn set_overlay(&mut self, page: u32, overlay: RgbaImage) {
        let (width, height) = overlay.dimensions();
        self.visit(page, width, height).overlay = Some(overlay);
    }

    pub fn discard_overlay(&mut self, page: u32) {
        if let Some(record) = self.records.get_mut(&page) {
            record.overlay = None;
        }
    }

    /// Pages holding an overlay, in page order.
    pub fn inked_pages(&self) -> Vec<u32> {
        self.records
            .values()
            .filter(|record| record.overlay.is_some())
            .map(|record| record.page)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn overlays_are_kept_per_page() {
        let mut store = PageStore::new();
        store.visit(1, 10, 10);
        store.visit(2, 10, 10);
        store.set_overlay(3, RgbaImage::from_pixel(4, 4, Rgba([1, 1, 1, 255])));

        assert_eq!(store.len(), 3);
        assert!(!store.has_overlay(1));
        assert_eq!(store.get(3).unwrap().width, 4);
        assert_eq!(store.inked_pages(), vec![3]);

        store.discard_overlay(3);
        assert!(store.inked_pages().is_empty());
        store.clear();
        assert!(store.is_empty());
    }
}
