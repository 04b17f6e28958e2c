// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Editor session — the working state while one document is being edited.
//
// Filter results arrive asynchronously. Each request is stamped with a
// generation number and only the result for the latest request is accepted,
// so a slow earlier filter can never overwrite a newer choice.

use docscan_core::error::Result;
use docscan_core::{FilterMode, ScannedDoc};
use docscan_document::scan::extract::TextExtractor;
use docscan_document::{EncodedImage, FilterEngine};
use tracing::{debug, info, warn};

/// Ticket for one filter request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterRequest {
    pub generation: u64,
    pub mode: FilterMode,
}

/// Editing state for a single document.
#[derive(Debug, Clone)]
pub struct EditorSession {
    doc: ScannedDoc,
    /// Mode most recently asked for.
    requested: FilterMode,
    /// Mode the preview currently reflects.
    applied: FilterMode,
    preview: String,
    extracted_text: Option<String>,
    generation: u64,
}

#[allow(dead_code)]
impl EditorSession {
    pub fn open(doc: ScannedDoc) -> Self {
        Self {
            requested: doc.filter,
            applied: doc.filter,
            preview: doc.processed_image.clone(),
            extracted_text: doc.extracted_text.clone(),
            generation: 0,
            doc,
        }
    }

    pub fn requested_filter(&self) -> FilterMode {
        self.requested
    }

    pub fn applied_filter(&self) -> FilterMode {
        self.applied
    }

    /// The processed image as a data URL.
    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn extracted_text(&self) -> Option<&str> {
        self.extracted_text.as_deref()
    }

    /// Start a new filter request, superseding any in flight.
    pub fn request_filter(&mut self, mode: FilterMode) -> FilterRequest {
        self.generation += 1;
        self.requested = mode;
        debug!(generation = self.generation, mode = %mode, "filter requested");
        FilterRequest {
            generation: self.generation,
            mode,
        }
    }

    /// Deliver the outcome of `request`.
    ///
    /// Returns `Ok(true)` if the preview was replaced and `Ok(false)` if the
    /// result was stale and dropped. A failed current request returns the
    /// error and keeps the previous preview.
    pub fn complete_filter(&mut self, request: FilterRequest, result: Result<String>) -> Result<bool> {
        if request.generation != self.generation {
            debug!(
                generation = request.generation,
                latest = self.generation,
                "dropping stale filter result"
            );
            return Ok(false);
        }
        match result {
            Ok(preview) => {
                self.preview = preview;
                self.applied = request.mode;
                Ok(true)
            }
            Err(err) => {
                warn!(mode = %request.mode, error = %err, "filter failed; keeping previous preview");
                Err(err)
            }
        }
    }

    /// Apply `mode` to the original image and take the result if still current.
    pub async fn select_filter(&mut self, engine: &FilterEngine, mode: FilterMode) -> Result<bool> {
        let request = self.request_filter(mode);
        let result = match EncodedImage::from_data_url(&self.doc.original_image) {
            Ok(original) => engine
                .apply_async(original, mode)
                .await
                .map(|output| output.to_data_url()),
            Err(err) => Err(err),
        };
        self.complete_filter(request, result)
    }

    /// Text of the current preview, running OCR only if none is cached yet.
    pub fn extract_text(&mut self, extractor: &dyn TextExtractor) -> Result<String> {
        if let Some(text) = self.extracted_text.as_ref().filter(|t| !t.is_empty()) {
            debug!("using cached text");
            return Ok(text.clone());
        }
        let page = EncodedImage::from_data_url(&self.preview)?;
        let text = extractor.extract_text(&page)?;
        info!(chars = text.len(), "text extracted");
        self.extracted_text = Some(text.clone());
        Ok(text)
    }

    /// The document with this session's edits applied.
    pub fn document(&self) -> ScannedDoc {
        ScannedDoc {
            filter: self.applied,
            processed_image: self.preview.clone(),
            extracted_text: self.extracted_text.clone(),
            ..self.doc.clone()
        }
    }

    pub fn finish(self) -> ScannedDoc {
        self.document()
    }
}
