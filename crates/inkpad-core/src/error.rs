// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Inkpad.

use thiserror::Error;

use crate::types::ErrorClass;

/// Top-level error type for all Inkpad operations.
#[derive(Debug, Error)]
pub enum InkpadError {
    // -- Input rejection --
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("input is {size} bytes, limit is {limit} bytes")]
    OversizeInput { size: usize, limit: usize },

    // -- Document loading --
    #[error("document has no pages")]
    EmptyDocument,

    #[error("document could not be loaded: {0}")]
    DocumentLoad(String),

    // -- Rendering --
    #[error("rendering page {page} failed: {reason}")]
    RenderFailed { page: u32, reason: String },

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Session state --
    #[error("no document loaded")]
    NoDocument,

    #[error("page navigation requires a multi-page document")]
    NotPaged,

    #[error("page {page} out of range (document has {count} pages)")]
    PageOutOfRange { page: u32, count: u32 },

    #[error("surface not ready: a page render is in flight")]
    SurfaceNotReady,

    #[error("render of page {page} was superseded by a newer request")]
    Superseded { page: u32 },

    // -- Export --
    #[error("export failed: {0}")]
    ExportFailed(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Storage --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl InkpadError {
    /// Coarse class used to decide how the failure is surfaced.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::UnsupportedFormat(_) | Self::OversizeInput { .. } => ErrorClass::InputRejected,
            Self::EmptyDocument | Self::DocumentLoad(_) => ErrorClass::DocumentLoadFailed,
            Self::RenderFailed { .. } | Self::ImageError(_) => ErrorClass::RenderFailed,
            Self::ExportFailed(_) | Self::PdfError(_) => ErrorClass::ExportFailed,
            Self::NoDocument
            | Self::NotPaged
            | Self::PageOutOfRange { .. }
            | Self::SurfaceNotReady
            | Self::Superseded { .. } => ErrorClass::InvalidState,
            Self::Io(_) | Self::Serialization(_) => ErrorClass::Storage,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, InkpadError>;
