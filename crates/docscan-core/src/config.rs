// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DocscanError, Result};
use crate::types::FilterMode;

/// File name of the persisted configuration inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JPEG quality (1-100) for filtered output images.
    pub jpeg_quality: u8,
    /// Filter recorded on newly imported documents.
    pub default_filter: FilterMode,
    /// Key under which the document list is stored.
    pub storage_key: String,
    /// Pixel count at which the filter loop is split across threads.
    pub parallel_threshold: usize,
    /// Directory holding the OCR detection/recognition models.
    pub ocr_model_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 90,
            default_filter: FilterMode::Original,
            storage_key: "webscanner_docs_v1".into(),
            parallel_threshold: 1 << 18,
            ocr_model_dir: None,
        }
    }
}

impl AppConfig {
    /// Reject settings the engine cannot honour.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(DocscanError::Config(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        if self.storage_key.trim().is_empty() {
            return Err(DocscanError::Config("storage_key must not be empty".into()));
        }
        Ok(())
    }

    /// Load the config from `data_dir`, falling back to defaults when the file
    /// is missing, unreadable, or invalid.
    pub fn load_or_default(data_dir: &Path) -> Self {
        let path = data_dir.join(CONFIG_FILE);
        let data = match std::fs::read_to_string(&path) {
            Ok(data) => data,
            Err(_) => {
                debug!(path = %path.display(), "no config file; using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str::<Self>(&data) {
            Ok(config) => match config.validate() {
                Ok(()) => config,
                Err(err) => {
                    warn!(error = %err, "invalid config; using defaults");
                    Self::default()
                }
            },
            Err(err) => {
                warn!(path = %path.display(), error = %err, "unparsable config; using defaults");
                Self::default()
            }
        }
    }

    /// Persist the config as pretty JSON into `data_dir`.
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        self.validate()?;
        let path = data_dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        debug!(path = %path.display(), "config saved");
        Ok(())
    }
}
