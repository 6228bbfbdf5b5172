// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open a PDF from memory and inspect its page tree (page count,
// MediaBox geometry, inherited resources) using the `lopdf` crate.

use lopdf::{Dictionary, Document, Object, ObjectId};
use inkpad_core::error::InkpadError;
use tracing::{debug, instrument, warn};

/// Fallback page size in points (A4) when a page carries no usable MediaBox.
pub const DEFAULT_MEDIA_BOX: MediaBox = MediaBox {
    llx: 0.0,
    lly: 0.0,
    urx: 595.0,
    ury: 842.0,
};

/// A page's MediaBox in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
}

impl MediaBox {
    pub fn width(&self) -> f64 {
        (self.urx - self.llx).abs()
    }

    pub fn height(&self) -> f64 {
        (self.ury - self.lly).abs()
    }
}

/// Reads an existing PDF held in memory.
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, InkpadError> {
        let document = Document::load_mem(data).map_err(|err| {
            InkpadError::DocumentLoad(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// MediaBox of every page, in page order.
    pub fn media_boxes(&self) -> Vec<MediaBox> {
        self.document
            .get_pages()
            .values()
            .map(|page_id| {
                media_box(&self.document, *page_id).unwrap_or_else(|| {
                    warn!(?page_id, "page has no usable MediaBox, assuming A4");
                    DEFAULT_MEDIA_BOX
                })
            })
            .collect()
    }
}

/// Resolve a page's MediaBox, walking up the page tree for inherited values.
pub(crate) fn media_box(doc: &Document, page_id: ObjectId) -> Option<MediaBox> {
    let mut current = Some(page_id);
    while let Some(id) = current {
        let dict = doc.get_object(id).and_then(|o| o.as_dict()).ok()?;
        if let Some(found) = extract_media_box(doc, dict) {
            return Some(found);
        }
        current = dict.get(b"Parent").and_then(|p| p.as_reference()).ok();
    }
    None
}

fn extract_media_box(doc: &Document, dict: &Dictionary) -> Option<MediaBox> {
    let raw = dict.get(b"MediaBox").ok()?;
    let resolved = match raw {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let arr = resolved.as_array().ok()?;
    if arr.len() != 4 {
        return None;
    }
    let media_box = MediaBox {
        llx: obj_to_f64(&arr[0])?,
        lly: obj_to_f64(&arr[1])?,
        urx: obj_to_f64(&arr[2])?,
        ury: obj_to_f64(&arr[3])?,
    };
    if media_box.width() <= 0.0 || media_box.height() <= 0.0 {
        return None;
    }
    Some(media_box)
}

fn obj_to_f64(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some((*f).into()),
        _ => None,
    }
}

/// Resolve the resource dictionary in effect for a page (own or inherited),
/// returned as an owned copy. Pages without resources get an empty dictionary.
pub(crate) fn inherited_resources(
    doc: &Document,
    page_id: ObjectId,
) -> Result<Dictionary, InkpadError> {
    let mut current = Some(page_id);
    while let Some(id) = current {
        let dict = doc
            .get_object(id)
            .and_then(|o| o.as_dict())
            .map_err(|err| InkpadError::PdfError(format!("page node {:?} unreadable: {}", id, err)))?;
        if let Ok(resources) = dict.get(b"Resources") {
            return resolve_dictionary(doc, resources);
        }
        current = dict.get(b"Parent").and_then(|p| p.as_reference()).ok();
    }
    Ok(Dictionary::new())
}

/// Follow a reference (if any) and clone the dictionary it points at.
pub(crate) fn resolve_dictionary(doc: &Document, object: &Object) -> Result<Dictionary, InkpadError> {
    match object {
        Object::Dictionary(dict) => Ok(dict.clone()),
        Object::Reference(id) => doc
            .get_object(*id)
            .and_then(|o| o.as_dict())
            .cloned()
            .map_err(|err| InkpadError::PdfError(format!("cannot resolve {:?}: {}", id, err))),
        _ => Err(InkpadError::PdfError(
            "expected a dictionary or a reference to one".to_string(),
        )),
    }
}
