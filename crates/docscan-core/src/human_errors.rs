// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to a plain sentence with a suggestion. The
// severity drives how the front end presents it.

use crate::error::DocscanError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Worth trying again as-is.
    Transient,
    /// The user must change something first (pick another file, fix settings).
    ActionRequired,
    /// Retrying will not help.
    Permanent,
}

/// A human-readable error with a plain message and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether retrying the same operation may succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `DocscanError` into a `HumanError`.
pub fn humanize_error(err: &DocscanError) -> HumanError {
    match err {
        DocscanError::Decode(_) => HumanError {
            message: "This image couldn't be opened.".into(),
            suggestion: "The file may be damaged or in an unusual format. Try a JPEG or PNG photo.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DocscanError::Encode(_) => HumanError {
            message: "The filtered image couldn't be saved.".into(),
            suggestion: "Your previous version is unchanged. Try the filter again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        DocscanError::UnsupportedMode(mode) => HumanError {
            message: "That filter doesn't exist.".into(),
            suggestion: format!(
                "Choose one of original, lighten, magic, grayscale, or bw. (Got: {mode})"
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DocscanError::InvalidId(detail) => HumanError {
            message: "That isn't a valid document id.".into(),
            suggestion: format!("Copy the id from `docscan list`. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DocscanError::Ocr(_) => HumanError {
            message: "Failed to extract text from the document.".into(),
            suggestion: "Please try again. Switching the filter to B&W or Magic often helps.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        DocscanError::DocumentNotFound(id) => HumanError {
            message: "That document no longer exists.".into(),
            suggestion: format!("It may have been deleted. Check the list of documents. ({id})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        DocscanError::Storage(_) | DocscanError::Serialization(_) => HumanError {
            message: "Your documents couldn't be saved or loaded.".into(),
            suggestion: "Check that the data folder is writable and has free space.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        DocscanError::Io(io) => HumanError {
            message: "A file couldn't be read or written.".into(),
            suggestion: format!("Check the path and its permissions. ({io})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DocscanError::Config(detail) => HumanError {
            message: "The settings are invalid.".into(),
            suggestion: format!("Fix or delete config.json in the data folder. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DocscanError::PlatformUnavailable => HumanError {
            message: "This feature isn't available in this build.".into(),
            suggestion: "Install a build with text recognition enabled.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}
