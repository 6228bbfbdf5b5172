// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Inkpad overlay engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{InkpadError, Result};

/// Unique identifier for an editor session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a failure is surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Oversized or wrongly typed input. Nothing changed.
    InputRejected,
    /// Malformed or empty document. The previous document is still active.
    DocumentLoadFailed,
    /// The rendering collaborator failed. The last rendered page stays active.
    RenderFailed,
    /// Export could not be produced. No file is handed over.
    ExportFailed,
    /// The operation is not valid in the current session state.
    InvalidState,
    /// Local file or serialisation failure.
    Storage,
}

/// A position in either device or surface space, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point halfway between `self` and `other`.
    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Active drawing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Paints opaque ink whose width thins with speed.
    #[default]
    Pen,
    /// Clears pixels to full transparency at constant width.
    Eraser,
}

/// Opaque ink colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InkColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl InkColor {
    pub const BLACK: InkColor = InkColor { r: 0, g: 0, b: 0 };

    /// Parse a `#rrggbb` (or `rrggbb`) colour string.
    pub fn from_hex(value: &str) -> Result<Self> {
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(InkpadError::UnsupportedFormat(format!(
                "colour must be #rrggbb, got {value:?}"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|err| {
                InkpadError::UnsupportedFormat(format!("invalid colour {value:?}: {err}"))
            })
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Format as a lowercase `#rrggbb` string.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl Default for InkColor {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Whether a document is drawn on as a single image or navigated page by page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    /// A raster image; one implicit page.
    Image,
    /// A multi-page document whose source bytes are kept for re-embedding.
    Paged,
}

/// Supported input document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Pdf,
    Png,
    Jpeg,
    Gif,
    Webp,
    Bmp,
    Tiff,
}

impl DocumentType {
    /// Canonical MIME type string.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }

    /// Infer the document type from a declared MIME type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(Self::Pdf),
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            "image/bmp" | "image/x-ms-bmp" => Some(Self::Bmp),
            "image/tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Infer the document type from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            "bmp" => Some(Self::Bmp),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Pdf => DocumentKind::Paged,
            _ => DocumentKind::Image,
        }
    }
}

/// Pixel dimensions of a rendered page or surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
}

impl PageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Kind of artifact produced by an export, which fixes its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportKind {
    /// The source PDF with ink embedded page by page.
    SignedDocumentPdf,
    /// A flattened PNG of an image document with ink.
    SignedDocumentPng,
    /// A flattened PNG of the mark alone (no document loaded).
    StandaloneMark,
}

impl ExportKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::SignedDocumentPdf => "signed-document.pdf",
            Self::SignedDocumentPng => "signed-document.png",
            Self::StandaloneMark => "signature.png",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::SignedDocumentPdf => DocumentType::Pdf.mime_type(),
            Self::SignedDocumentPng | Self::StandaloneMark => DocumentType::Png.mime_type(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colour_round_trips() {
        let colour = InkColor::from_hex("#1a2B3c").unwrap();
        assert_eq!(colour, InkColor { r: 0x1a, g: 0x2b, b: 0x3c });
        assert_eq!(colour.to_hex(), "#1a2b3c");
    }

    #[test]
    fn malformed_hex_colour_is_rejected() {
        assert!(InkColor::from_hex("#12345").is_err());
        assert!(InkColor::from_hex("#zzzzzz").is_err());
    }

    #[test]
    fn mime_parameters_are_ignored() {
        assert_eq!(
            DocumentType::from_mime("application/pdf; charset=binary"),
            Some(DocumentType::Pdf)
        );
        assert_eq!(DocumentType::from_mime("text/plain"), None);
    }

    #[test]
    fn only_pdf_is_paged() {
        assert_eq!(DocumentType::Pdf.kind(), DocumentKind::Paged);
        assert_eq!(DocumentType::Jpeg.kind(), DocumentKind::Image);
    }

    #[test]
    fn export_names_distinguish_signed_documents() {
        assert_eq!(ExportKind::StandaloneMark.file_name(), "signature.png");
        assert_eq!(ExportKind::SignedDocumentPng.file_name(), "signed-document.png");
        assert_eq!(ExportKind::SignedDocumentPdf.mime_type(), "application/pdf");
    }
}
