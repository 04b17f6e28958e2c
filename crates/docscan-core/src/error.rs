// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Docscan.

use thiserror::Error;

use crate::types::DocId;

/// Top-level error type for all Docscan operations.
#[derive(Debug, Error)]
pub enum DocscanError {
    // -- Filter engine errors --
    #[error("image decode failed: {0}")]
    Decode(String),

    #[error("image encode failed: {0}")]
    Encode(String),

    #[error("unsupported filter mode: {0}")]
    UnsupportedMode(String),

    #[error("invalid document id: {0}")]
    InvalidId(String),

    // -- Text extraction --
    #[error("OCR failed: {0}")]
    Ocr(String),

    // -- Storage / persistence --
    #[error("document not found: {0}")]
    DocumentNotFound(DocId),

    #[error("document storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform --
    #[error("feature not available in this build")]
    PlatformUnavailable,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocscanError>;
