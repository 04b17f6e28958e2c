// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// On-device OCR for processed pages, backed by the `ocrs` engine and `rten`
// models. Only compiled with the `ocr` feature.
//
// Two model files are needed, `text-detection.rten` and
// `text-recognition.rten`. Running `ocrs-cli` once downloads them into
// `$XDG_CACHE_HOME/ocrs` (usually `~/.cache/ocrs`), which is where
// `OcrConfig::default()` looks.

use std::path::{Path, PathBuf};

use docscan_core::error::{DocscanError, Result};
use image::DynamicImage;
use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams};
use rten::Model;
use tracing::{debug, info, instrument};

use super::extract::{TextExtractor, or_placeholder};
use crate::image::codec::{self, EncodedImage};

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// `$XDG_CACHE_HOME/ocrs`, else `~/.cache/ocrs`, else `./ocrs-models`.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        return PathBuf::from(xdg).join("ocrs");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".cache").join("ocrs");
    }
    PathBuf::from("ocrs-models")
}

/// Where to find the OCR model files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrConfig {
    pub detection_model_path: PathBuf,
    pub recognition_model_path: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrConfig {
    /// Expect both models inside `dir` under their well-known names.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    /// Use the configured model directory, or the cache default.
    pub fn from_app_config(config: &docscan_core::AppConfig) -> Self {
        match &config.ocr_model_dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::default(),
        }
    }

    /// Check that both model files exist.
    pub fn validate(&self) -> Result<()> {
        for (kind, path) in [
            ("detection", &self.detection_model_path),
            ("recognition", &self.recognition_model_path),
        ] {
            if !path.exists() {
                return Err(DocscanError::Ocr(format!(
                    "{} model not found at {}; run `ocrs-cli` once to download the models",
                    kind,
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Extracts text from page images with a local neural OCR model.
///
/// Loading the models is the expensive part; build one engine and reuse it.
pub struct OcrEngine {
    engine: OcrsEngine,
}

impl OcrEngine {
    /// Load both models named by `config`.
    ///
    /// Build `ocrs` and `rten` in release mode; debug builds are far too slow.
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: &OcrConfig) -> Result<Self> {
        config.validate()?;

        let load = |path: &Path| {
            Model::load_file(path).map_err(|err| {
                DocscanError::Ocr(format!("failed to load model {}: {}", path.display(), err))
            })
        };
        let detection_model = load(&config.detection_model_path)?;
        let recognition_model = load(&config.recognition_model_path)?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| DocscanError::Ocr(format!("failed to initialise OCR engine: {}", err)))?;

        info!("OCR engine ready");
        Ok(Self { engine })
    }

    /// Recognise all text on a decoded page, one line per output line.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn recognize(&self, image: &DynamicImage) -> Result<String> {
        let rgb = image.to_rgb8();
        let source = ImageSource::from_bytes(rgb.as_raw(), rgb.dimensions()).map_err(|err| {
            DocscanError::Ocr(format!("unusable page image: {}", err))
        })?;
        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| DocscanError::Ocr(format!("OCR preprocessing failed: {}", err)))?;
        let text = self
            .engine
            .get_text(&input)
            .map_err(|err| DocscanError::Ocr(format!("OCR recognition failed: {}", err)))?;

        debug!(lines = text.lines().count(), chars = text.len(), "OCR complete");
        Ok(text)
    }
}

impl TextExtractor for OcrEngine {
    fn extract_text(&self, image: &EncodedImage) -> Result<String> {
        let raster = codec::decode_rgba(image)
            .map_err(|err| DocscanError::Ocr(format!("cannot read page: {}", err)))?;
        let text = self.recognize(&DynamicImage::ImageRgba8(raster))?;
        Ok(or_placeholder(text))
    }
}
