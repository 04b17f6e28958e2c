// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docscan-document — Image processing for the Docscan document scanner.
//
// Provides the scan-look filter engine (grayscale, black/white, contrast boost,
// gamma lighten), the data URL / JPEG boundary it works across, and text
// extraction from processed pages.

pub mod filter;
pub mod image;
pub mod scan;

// Re-export the primary types so callers can use `docscan_document::FilterEngine` etc.
pub use filter::engine::FilterEngine;
pub use crate::image::codec::{EncodedImage, OutputFormat};
pub use scan::extract::TextExtractor;

#[cfg(feature = "ocr")]
pub use scan::ocr::OcrEngine;
