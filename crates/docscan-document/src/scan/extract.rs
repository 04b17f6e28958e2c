// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text extraction seam. The editor only depends on this trait; the concrete
// recogniser lives behind the `ocr` feature.

use docscan_core::error::Result;

use crate::image::codec::EncodedImage;

/// Returned when recognition succeeds but finds nothing.
pub const NO_TEXT_PLACEHOLDER: &str = "No text extracted.";

/// Anything that can turn a page image into text.
pub trait TextExtractor {
    /// Extract the text of `image`.
    ///
    /// Fails with `DocscanError::Ocr` when recognition itself fails.
    fn extract_text(&self, image: &EncodedImage) -> Result<String>;
}

/// Substitute the placeholder for a blank recognition result.
pub fn or_placeholder(text: String) -> String {
    if text.trim().is_empty() {
        NO_TEXT_PLACEHOLDER.to_string()
    } else {
        text
    }
}
