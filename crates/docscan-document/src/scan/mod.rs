// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text extraction from scanned pages.

pub mod extract;

#[cfg(feature = "ocr")]
pub mod ocr;

pub use extract::TextExtractor;

#[cfg(feature = "ocr")]
pub use ocr::OcrEngine;
