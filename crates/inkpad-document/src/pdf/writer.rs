// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF ink writer — composite transparent ink layers back into an existing PDF
// using `lopdf`.
//
// Each layer becomes an RGB image XObject with a DeviceGray soft mask carrying
// the alpha channel. The page's existing content is wrapped in `q … Q` so that
// whatever graphics state it leaves behind cannot skew the overlay, and a new
// content stream draws the layer stretched over the page's MediaBox.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use inkpad_core::error::InkpadError;
use tracing::{debug, info, instrument, warn};

use crate::pdf::reader::{DEFAULT_MEDIA_BOX, inherited_resources, media_box, resolve_dictionary};
use crate::raster::processor::ImageProcessor;
use crate::traits::DocumentMutator;

/// Mutates a PDF by embedding ink layers page by page.
pub struct PdfInkWriter {
    /// The document being mutated.
    document: Document,
    /// Number of layers embedded so far (for diagnostics).
    embedded: usize,
}

impl PdfInkWriter {
    /// Open a PDF from memory for mutation.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, InkpadError> {
        let document = Document::load_mem(data).map_err(|err| {
            InkpadError::PdfError(format!("failed to load PDF for export: {}", err))
        })?;
        Ok(Self {
            document,
            embedded: 0,
        })
    }

    /// Number of ink layers embedded so far.
    pub fn embedded_layers(&self) -> usize {
        self.embedded
    }

    fn page_id(&self, page: u32) -> Result<ObjectId, InkpadError> {
        let pages = self.document.get_pages();
        pages.get(&page).copied().ok_or_else(|| {
            InkpadError::PdfError(format!(
                "page {} not found (document has {} pages)",
                page,
                pages.len()
            ))
        })
    }

    /// Embed an RGBA PNG over the whole of `page`.
    #[instrument(skip(self, png), fields(png_len = png.len()))]
    pub fn embed_png(&mut self, page: u32, png: &[u8]) -> Result<(), InkpadError> {
        let page_id = self.page_id(page)?;
        let layer = ImageProcessor::from_bytes(png)?.into_rgba();
        let (width, height) = layer.dimensions();

        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        let mut alpha = Vec::with_capacity((width * height) as usize);
        for pixel in layer.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
        }

        let smask_id = self.document.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            alpha,
        ));
        let image_id = self.document.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "SMask" => smask_id,
            },
            rgb,
        ));

        // Register the image in the page's resources. Inherited resources are
        // copied onto the page so sibling pages are unaffected.
        let mut resources = inherited_resources(&self.document, page_id)?;
        let mut xobjects = match resources.get(b"XObject") {
            Ok(existing) => resolve_dictionary(&self.document, existing)?,
            Err(_) => Dictionary::new(),
        };
        let name = unique_name(&xobjects, page);
        xobjects.set(name.clone(), image_id);
        resources.set("XObject", Object::Dictionary(xobjects));

        let media_box = media_box(&self.document, page_id).unwrap_or_else(|| {
            warn!(page, "page has no usable MediaBox, assuming A4");
            DEFAULT_MEDIA_BOX
        });
        let draw = format!(
            "Q\nq {} 0 0 {} {} {} cm /{} Do Q\n",
            media_box.width(),
            media_box.height(),
            media_box.llx.min(media_box.urx),
            media_box.lly.min(media_box.ury),
            name
        );
        let open_id = self
            .document
            .add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let draw_id = self
            .document
            .add_object(Stream::new(Dictionary::new(), draw.into_bytes()));

        let page_dict = self
            .document
            .get_object_mut(page_id)
            .and_then(|o| o.as_dict_mut())
            .map_err(|err| InkpadError::PdfError(format!("page {} unreadable: {}", page, err)))?;
        page_dict.set("Resources", Object::Dictionary(resources));

        let mut contents = vec![Object::Reference(open_id)];
        match page_dict.remove(b"Contents") {
            Some(Object::Array(existing)) => contents.extend(existing),
            Some(existing) => contents.push(existing),
            None => {}
        }
        contents.push(Object::Reference(draw_id));
        page_dict.set("Contents", Object::Array(contents));

        self.embedded += 1;
        debug!(page, width, height, xobject = %name, "ink layer embedded");
        Ok(())
    }

    /// Serialise the document with compressed streams.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>, InkpadError> {
        self.document.compress();
        let mut output = Vec::new();
        self.document.save_to(&mut output).map_err(|err| {
            InkpadError::PdfError(format!("failed to serialise signed PDF: {}", err))
        })?;
        info!(
            layers = self.embedded,
            output_bytes = output.len(),
            "signed PDF serialised"
        );
        Ok(output)
    }
}

impl DocumentMutator for PdfInkWriter {
    fn load(bytes: &[u8]) -> Result<Self, InkpadError> {
        Self::from_bytes(bytes)
    }

    fn embed_image(&mut self, page: u32, png: &[u8]) -> Result<(), InkpadError> {
        self.embed_png(page, png)
    }

    fn serialize(&mut self) -> Result<Vec<u8>, InkpadError> {
        self.to_bytes()
    }
}

/// Pick an XObject name for `page` that does not clash with existing entries.
fn unique_name(xobjects: &Dictionary, page: u32) -> String {
    let mut name = format!("InkLayer{page}");
    let mut suffix = 1;
    while xobjects.has(name.as_bytes()) {
        name = format!("InkLayer{page}_{suffix}");
        suffix += 1;
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::pdf_with_pages;
    use crate::raster::processor::encode_png;
    use image::{Rgba, RgbaImage};

    fn ink_png(width: u32, height: u32) -> Vec<u8> {
        let mut layer = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
        layer.put_pixel(1, 1, Rgba([10, 20, 30, 255]));
        encode_png(&layer).unwrap()
    }

    fn page_dict(doc: &Document, page: u32) -> Dictionary {
        let id = *doc.get_pages().get(&page).unwrap();
        doc.get_object(id).unwrap().as_dict().unwrap().clone()
    }

    #[test]
    fn embeds_layer_with_soft_mask() {
        let mut writer = PdfInkWriter::from_bytes(&pdf_with_pages(&[(200, 100)], false)).unwrap();
        writer.embed_image(1, &ink_png(4, 2)).unwrap();
        let bytes = writer.serialize().unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let page = page_dict(&doc, 1);
        let resources = resolve_dictionary(&doc, page.get(b"Resources").unwrap()).unwrap();
        let xobjects = resolve_dictionary(&doc, resources.get(b"XObject").unwrap()).unwrap();
        let image_id = xobjects.get(b"InkLayer1").unwrap().as_reference().unwrap();
        let image = doc.get_object(image_id).unwrap().as_stream().unwrap();

        assert_eq!(image.dict.get(b"Width").unwrap().as_i64().unwrap(), 4);
        assert_eq!(image.dict.get(b"Height").unwrap().as_i64().unwrap(), 2);
        assert!(image.dict.get(b"SMask").is_ok());
        // Fonts inherited from the page tree are still reachable.
        assert!(resources.has(b"Font"));
        assert_eq!(page.get(b"Contents").unwrap().as_array().unwrap().len(), 3);
    }

    #[test]
    fn untouched_pages_keep_their_content() {
        let mut writer =
            PdfInkWriter::from_bytes(&pdf_with_pages(&[(200, 100), (200, 100)], true)).unwrap();
        writer.embed_image(1, &ink_png(2, 2)).unwrap();
        let bytes = writer.serialize().unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let second = page_dict(&doc, 2);
        assert!(second.get(b"Contents").unwrap().as_reference().is_ok());
        assert!(second.get(b"Resources").is_err());
        assert_eq!(writer.embedded_layers(), 1);
    }

    #[test]
    fn out_of_range_page_is_rejected() {
        let mut writer = PdfInkWriter::from_bytes(&pdf_with_pages(&[(200, 100)], false)).unwrap();
        let err = writer.embed_image(2, &ink_png(2, 2)).unwrap_err();
        assert!(matches!(err, InkpadError::PdfError(_)));
    }

    #[test]
    fn names_do_not_clash() {
        let mut xobjects = Dictionary::new();
        xobjects.set("InkLayer1", Object::Null);
        assert_eq!(unique_name(&xobjects, 1), "InkLayer1_1");
        assert_eq!(unique_name(&xobjects, 2), "InkLayer2");
    }
}
