// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filter engine — decode, apply a scan-look filter, re-encode.

use docscan_core::error::{DocscanError, Result};
use docscan_core::{AppConfig, FilterMode};
use image::RgbaImage;
use tracing::{debug, info, instrument};

use super::kernel;
use crate::image::codec::{self, EncodedImage, OutputFormat};

/// Stateless filter engine.
///
/// Every call decodes a fresh raster, transforms it, and encodes the result;
/// nothing is retained between calls, so one engine can be shared freely.
///
/// ```ignore
/// let engine = FilterEngine::default();
/// let scanned = engine.apply(&EncodedImage::from_data_url(&photo)?, FilterMode::Bw)?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FilterEngine {
    output: OutputFormat,
    parallel_threshold: usize,
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl FilterEngine {
    pub fn new(output: OutputFormat, parallel_threshold: usize) -> Self {
        Self {
            output,
            parallel_threshold,
        }
    }

    /// Build an engine emitting JPEG at the configured quality.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            OutputFormat::Jpeg {
                quality: config.jpeg_quality,
            },
            config.parallel_threshold,
        )
    }

    /// The encoding used for results.
    pub fn output_format(&self) -> OutputFormat {
        self.output
    }

    /// Apply `mode` to an encoded image and return the re-encoded result.
    ///
    /// # Errors
    ///
    /// [`DocscanError::Decode`] if the input is not a readable, non-empty
    /// image; [`DocscanError::Encode`] if the result cannot be serialized.
    #[instrument(skip(self, input), fields(mode = %mode, input_len = input.bytes.len()))]
    pub fn apply(&self, input: &EncodedImage, mode: FilterMode) -> Result<EncodedImage> {
        let raster = codec::decode_rgba(input)?;
        let filtered = self.apply_raster(raster, mode)?;
        let output = codec::encode(&filtered, self.output)?;
        info!(
            width = filtered.width(),
            height = filtered.height(),
            output_len = output.bytes.len(),
            "Filter applied"
        );
        Ok(output)
    }

    /// Apply `mode` to a data URL, returning a data URL.
    pub fn apply_data_url(&self, data_url: &str, mode: FilterMode) -> Result<String> {
        let input = EncodedImage::from_data_url(data_url)?;
        Ok(self.apply(&input, mode)?.to_data_url())
    }

    /// Apply `mode` to an already-decoded raster in place.
    pub fn apply_raster(&self, mut raster: RgbaImage, mode: FilterMode) -> Result<RgbaImage> {
        codec::ensure_non_empty(raster.width(), raster.height())?;
        debug!(
            pixels = raster.width() as u64 * raster.height() as u64,
            parallel_threshold = self.parallel_threshold,
            "Transforming raster"
        );
        kernel::apply_in_place(&mut raster, mode, self.parallel_threshold);
        Ok(raster)
    }

    /// Run [`apply`](Self::apply) on the blocking thread pool.
    ///
    /// The engine has no cancellation: a caller that no longer wants the result
    /// simply drops it.
    pub async fn apply_async(&self, input: EncodedImage, mode: FilterMode) -> Result<EncodedImage> {
        let engine = *self;
        tokio::task::spawn_blocking(move || engine.apply(&input, mode))
            .await
            .map_err(|err| DocscanError::Encode(format!("filter task did not complete: {}", err)))?
    }
}
