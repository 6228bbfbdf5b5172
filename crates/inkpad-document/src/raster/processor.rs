// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode raster inputs to RGBA, scale them for rendering and
// encode surfaces and ink layers as PNG. Operates on in-memory images using the
// `image` crate.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbaImage};
use inkpad_core::error::InkpadError;
use tracing::{debug, instrument};

/// Raster pipeline operating on a single in-memory image.
///
/// Transformations consume `self` and return a new `ImageProcessor`, enabling
/// method chaining:
///
/// ```ignore
/// let page = ImageProcessor::from_bytes(&jpeg)?.scale(2.0).into_rgba();
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, InkpadError> {
        let img = image::load_from_memory(data)
            .map_err(|err| InkpadError::ImageError(format!("failed to decode image: {}", err)))?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded RGBA buffer.
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self {
            image: DynamicImage::ImageRgba8(image),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Consume the processor and return the pixels as RGBA8.
    pub fn into_rgba(self) -> RgbaImage {
        self.image.into_rgba8()
    }

    // -- Transformations ------------------------------------------------------

    /// Scale both dimensions by `factor` using Lanczos3 filtering.
    ///
    /// A factor of 1.0 (or a non-finite / non-positive factor) is a no-op.
    /// Dimensions never drop below one pixel.
    #[instrument(skip(self))]
    pub fn scale(self, factor: f32) -> Self {
        if !factor.is_finite() || factor <= 0.0 || (factor - 1.0).abs() < f32::EPSILON {
            return self;
        }
        let width = ((self.image.width() as f32 * factor).round() as u32).max(1);
        let height = ((self.image.height() as f32 * factor).round() as u32).max(1);
        debug!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            width,
            height,
            "Scaling image"
        );
        let resized = self
            .image
            .resize_exact(width, height, image::imageops::FilterType::Lanczos3);
        Self { image: resized }
    }
}

/// Encode an RGBA buffer as PNG without taking ownership of it.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, InkpadError> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|err| InkpadError::ImageError(format!("PNG encoding failed: {}", err)))?;
    Ok(buffer)
}
