// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the signing UI.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how the UI presents it (toast, dialog, inline hint).

use crate::error::InkpadError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Retrying the same action may succeed.
    Transient,
    /// The user must do something first (pick another file, wait for the page).
    ActionRequired,
    /// Retrying will not help.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether offering a "Try again" button makes sense.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert an `InkpadError` into a `HumanError`.
pub fn humanize_error(err: &InkpadError) -> HumanError {
    match err {
        // -- Input rejection --
        InkpadError::UnsupportedFormat(detail) => HumanError {
            message: "This type of file can't be signed.".into(),
            suggestion: format!("Please choose a PDF or an image (PNG, JPG). (File type: {detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        InkpadError::OversizeInput { limit, .. } => HumanError {
            message: "This file is too large.".into(),
            suggestion: format!(
                "Please choose a file smaller than {} MB.",
                limit / (1024 * 1024)
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Document loading --
        InkpadError::EmptyDocument => HumanError {
            message: "This document has no pages.".into(),
            suggestion: "Check that the file isn't damaged, or choose a different one.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        InkpadError::DocumentLoad(_) => HumanError {
            message: "We couldn't open this document.".into(),
            suggestion: "Please try again with a valid PDF or image file.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- Rendering --
        InkpadError::RenderFailed { page, .. } => HumanError {
            message: format!("Page {page} couldn't be displayed."),
            suggestion: "You're still on the previous page. Try opening the page again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        InkpadError::ImageError(_) => HumanError {
            message: "The picture couldn't be processed.".into(),
            suggestion: "Try again, or load the document once more.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Session state --
        InkpadError::NoDocument => HumanError {
            message: "No document is open.".into(),
            suggestion: "Import a PDF or an image first.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        InkpadError::NotPaged | InkpadError::PageOutOfRange { .. } => HumanError {
            message: "That page doesn't exist.".into(),
            suggestion: "Use the page buttons to move between pages.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        InkpadError::SurfaceNotReady | InkpadError::Superseded { .. } => HumanError {
            message: "The page is still loading.".into(),
            suggestion: "Wait a moment for the page to appear, then draw again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Export --
        InkpadError::ExportFailed(_) | InkpadError::PdfError(_) => HumanError {
            message: "We couldn't save the signed document.".into(),
            suggestion: "Your signature is still here. Please try saving again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Storage --
        InkpadError::Io(io_err) => HumanError {
            message: "The file couldn't be read or written.".into(),
            suggestion: format!("Check the folder exists and you have permission to use it. ({io_err})"),
            retriable: true,
            severity: Severity::Transient,
        },

        InkpadError::Serialization(_) => HumanError {
            message: "A settings file is damaged.".into(),
            suggestion: "Delete the settings file to go back to the defaults.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversize_mentions_limit_in_megabytes() {
        let err = InkpadError::OversizeInput {
            size: 11 * 1024 * 1024,
            limit: 10 * 1024 * 1024,
        };
        let human = humanize_error(&err);
        assert!(human.suggestion.contains("10 MB"));
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn render_failure_is_retriable() {
        let err = InkpadError::RenderFailed {
            page: 3,
            reason: "worker crashed".into(),
        };
        let human = humanize_error(&err);
        assert!(human.retriable);
        assert!(human.message.contains("Page 3"));
    }

    #[test]
    fn export_failure_keeps_user_work() {
        let human = humanize_error(&InkpadError::ExportFailed("disk full".into()));
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.suggestion.contains("still here"));
    }

    #[test]
    fn malformed_document_is_permanent() {
        let human = humanize_error(&InkpadError::DocumentLoad("bad xref".into()));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(!human.retriable);
    }
}
