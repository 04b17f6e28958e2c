// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — owns the config, the document store, and the filter
// engine, and exposes the operations the front end needs.
//
// The store is loaded once in `init` and saved by every mutating call.

use std::path::{Path, PathBuf};

use docscan_core::error::Result;
use docscan_core::{AppConfig, DocId, FilterMode, ScannedDoc};
use docscan_document::image::codec;
use docscan_document::scan::extract::TextExtractor;
use docscan_document::{EncodedImage, FilterEngine};
use docscan_store::DocumentStore;
use tracing::info;

use super::data_dir;
use crate::session::EditorSession;

/// Backend services for one process run.
pub struct AppServices {
    data_dir: Option<PathBuf>,
    config: AppConfig,
    store: DocumentStore,
    engine: FilterEngine,
}

#[allow(dead_code)]
impl AppServices {
    /// Load config and documents from the data directory, creating it if
    /// needed. Call once at startup.
    pub fn init(explicit_dir: Option<PathBuf>) -> Result<Self> {
        let dir = data_dir::data_dir(explicit_dir);
        std::fs::create_dir_all(&dir)?;
        info!(path = %dir.display(), "initialising app services");

        let config = AppConfig::load_or_default(&dir);
        let store = DocumentStore::open_in_dir(&dir, &config.storage_key)?;
        let engine = FilterEngine::from_config(&config);

        Ok(Self {
            data_dir: Some(dir),
            config,
            store,
            engine,
        })
    }

    /// Services with nothing on disk.
    pub fn in_memory(config: AppConfig) -> Self {
        Self {
            data_dir: None,
            engine: FilterEngine::from_config(&config),
            store: DocumentStore::in_memory(),
            config,
        }
    }

    /// Swap the engine (e.g. for lossless output).
    pub fn with_engine(mut self, engine: FilterEngine) -> Self {
        self.engine = engine;
        self
    }

    // -- Config ----------------------------------------------------------------

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Replace and persist the config. The engine picks up the new settings.
    pub fn save_config(&mut self, config: AppConfig) -> Result<()> {
        config.validate()?;
        if let Some(dir) = &self.data_dir {
            config.save(dir)?;
        }
        self.engine = FilterEngine::from_config(&config);
        self.config = config;
        Ok(())
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    // -- Documents -------------------------------------------------------------

    pub fn documents(&self) -> &[ScannedDoc] {
        self.store.all()
    }

    pub fn document(&self, id: &DocId) -> Result<&ScannedDoc> {
        self.store.require(id)
    }

    /// Turn captured image bytes into a new document at the top of the list.
    ///
    /// The bytes must decode. `filter` is applied if given, otherwise the
    /// configured default filter.
    pub fn import_bytes(&mut self, bytes: Vec<u8>, filter: Option<FilterMode>) -> Result<ScannedDoc> {
        let image = EncodedImage::from_bytes(bytes);
        codec::decode_rgba(&image)?;

        let mut doc = ScannedDoc::new(image.to_data_url());
        let mode = filter.unwrap_or(self.config.default_filter);
        if mode != FilterMode::Original {
            doc.processed_image = self.engine.apply(&image, mode)?.to_data_url();
            doc.filter = mode;
        }
        self.store.insert_front(doc.clone())?;
        info!(id = %doc.id, title = %doc.title, "document imported");
        Ok(doc)
    }

    /// Read an image file and import it.
    pub fn import_file(&mut self, path: impl AsRef<Path>, filter: Option<FilterMode>) -> Result<ScannedDoc> {
        let bytes = std::fs::read(path.as_ref())?;
        info!(path = %path.as_ref().display(), bytes = bytes.len(), "image loaded");
        self.import_bytes(bytes, filter)
    }

    /// Re-filter a document from its original image and save it.
    pub async fn apply_filter(&mut self, id: &DocId, mode: FilterMode) -> Result<ScannedDoc> {
        let mut session = EditorSession::open(self.store.require(id)?.clone());
        session.select_filter(&self.engine, mode).await?;
        let updated = session.finish();
        self.store.update(updated.clone())?;
        Ok(updated)
    }

    /// Extract (or return cached) text for a document; new text is saved.
    pub fn extract_text(&mut self, id: &DocId, extractor: &dyn TextExtractor) -> Result<String> {
        let mut session = EditorSession::open(self.store.require(id)?.clone());
        let had_text = session.extracted_text().is_some_and(|t| !t.is_empty());
        let text = session.extract_text(extractor)?;
        if !had_text {
            self.store.update(session.finish())?;
        }
        Ok(text)
    }

    pub fn delete(&mut self, id: &DocId) -> Result<ScannedDoc> {
        self.store.delete(id)
    }

    /// Write a document's processed image to `path` as raw image bytes.
    pub fn export(&self, id: &DocId, path: impl AsRef<Path>) -> Result<()> {
        let doc = self.store.require(id)?;
        let image = EncodedImage::from_data_url(&doc.processed_image)?;
        std::fs::write(path.as_ref(), &image.bytes)?;
        info!(id = %id, path = %path.as_ref().display(), "document exported");
        Ok(())
    }
}
