// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Encoded image boundary — data URL parsing, decoding to an RGBA raster, and
// re-encoding as JPEG (or PNG) using the `image` crate.

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use docscan_core::error::{DocscanError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::{debug, instrument};

/// Media type assumed when a payload carries no header and cannot be sniffed.
const DEFAULT_MIME: &str = "image/jpeg";

/// An image in its compressed, transportable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Media type, e.g. `image/jpeg`.
    pub mime: String,
    /// The compressed image bytes.
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    /// Wrap raw encoded bytes, sniffing the media type from the content.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let mime = sniff_mime(&bytes);
        Self { mime, bytes }
    }

    /// Parse a `data:<mime>;base64,<payload>` URL.
    ///
    /// A bare base64 payload without a header is accepted too; its media type
    /// is sniffed from the decoded bytes.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let url = url.trim();
        let payload = strip_data_url_prefix(url);

        let declared_mime = match url.strip_prefix("data:") {
            Some(rest) => {
                let header = rest.split(',').next().unwrap_or_default();
                if !header.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
                    return Err(DocscanError::Decode(
                        "data URL is not base64-encoded".into(),
                    ));
                }
                let mime = header.split(';').next().unwrap_or_default();
                (!mime.is_empty()).then(|| mime.to_string())
            }
            None => None,
        };

        let bytes = STANDARD.decode(payload).map_err(|err| {
            DocscanError::Decode(format!("invalid base64 image payload: {}", err))
        })?;
        let mime = declared_mime.unwrap_or_else(|| sniff_mime(&bytes));
        Ok(Self { mime, bytes })
    }

    /// Render as a `data:` URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// Return the base64 payload of a data URL, or the input unchanged when it
/// has no header.
pub fn strip_data_url_prefix(url: &str) -> &str {
    match url.split_once(',') {
        Some((_, payload)) => payload,
        None => url,
    }
}

fn sniff_mime(bytes: &[u8]) -> String {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or(DEFAULT_MIME)
        .to_string()
}

/// Output encoding for filtered images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossy JPEG with the given quality (1-100). Alpha is dropped.
    Jpeg { quality: u8 },
    /// Lossless PNG; keeps every channel exact.
    Png,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Jpeg { quality: 90 }
    }
}

impl OutputFormat {
    /// Media type written into the output.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Jpeg { .. } => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// Decode an encoded image into an RGBA raster.
///
/// Sources without an alpha channel come out fully opaque. Images with zero
/// width or height are rejected.
#[instrument(skip_all, fields(mime = %image.mime, data_len = image.bytes.len()))]
pub fn decode_rgba(image: &EncodedImage) -> Result<RgbaImage> {
    if image.bytes.is_empty() {
        return Err(DocscanError::Decode("empty image payload".into()));
    }
    let decoded = image::load_from_memory(&image.bytes).map_err(|err| {
        DocscanError::Decode(format!("failed to decode image: {}", err))
    })?;
    ensure_non_empty(decoded.width(), decoded.height())?;
    debug!(
        width = decoded.width(),
        height = decoded.height(),
        "Image decoded"
    );
    Ok(decoded.to_rgba8())
}

/// Reject zero-area rasters.
pub fn ensure_non_empty(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(DocscanError::Decode(format!(
            "image has zero area ({}x{})",
            width, height
        )));
    }
    Ok(())
}

/// Encode an RGBA raster into the requested output format.
#[instrument(skip(raster), fields(width = raster.width(), height = raster.height()))]
pub fn encode(raster: &RgbaImage, format: OutputFormat) -> Result<EncodedImage> {
    let mut buffer = Vec::new();
    match format {
        OutputFormat::Jpeg { quality } => {
            let rgb = DynamicImage::ImageRgba8(raster.clone()).to_rgb8();
            let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
            rgb.write_with_encoder(encoder).map_err(|err| {
                DocscanError::Encode(format!("JPEG encoding failed: {}", err))
            })?;
        }
        OutputFormat::Png => {
            let mut cursor = Cursor::new(&mut buffer);
            raster.write_to(&mut cursor, ImageFormat::Png).map_err(|err| {
                DocscanError::Encode(format!("PNG encoding failed: {}", err))
            })?;
        }
    }
    debug!(encoded_len = buffer.len(), "Image encoded");
    Ok(EncodedImage {
        mime: format.mime().to_string(),
        bytes: buffer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn png_fixture() -> EncodedImage {
        let raster = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 128]));
        encode(&raster, OutputFormat::Png).expect("encode png")
    }

    #[test]
    fn data_url_round_trip_keeps_mime_and_bytes() {
        let image = png_fixture();
        let url = image.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"), "got {url}");

        let parsed = EncodedImage::from_data_url(&url).expect("parse data url");
        assert_eq!(parsed, image);
    }

    #[test]
    fn bare_base64_payload_is_sniffed() {
        let image = png_fixture();
        let bare = STANDARD.encode(&image.bytes);
        let parsed = EncodedImage::from_data_url(&bare).expect("parse bare payload");
        assert_eq!(parsed.mime, "image/png");
        assert_eq!(parsed.bytes, image.bytes);
    }

    #[test]
    fn strip_prefix_handles_both_shapes() {
        assert_eq!(strip_data_url_prefix("data:image/jpeg;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_url_prefix("QUJD"), "QUJD");
    }

    #[test]
    fn non_base64_data_url_is_a_decode_error() {
        let err = EncodedImage::from_data_url("data:image/png,rawbytes").expect_err("not base64");
        assert!(matches!(err, DocscanError::Decode(_)));

        let err = EncodedImage::from_data_url("data:image/png;base64,@@@").expect_err("bad base64");
        assert!(matches!(err, DocscanError::Decode(_)));
    }

    #[test]
    fn png_decode_is_exact() {
        let raster = decode_rgba(&png_fixture()).expect("decode");
        assert_eq!(raster.dimensions(), (3, 2));
        assert!(raster.pixels().all(|p| p.0 == [10, 20, 30, 128]));
    }

    #[test]
    fn jpeg_output_decodes_as_opaque() {
        let raster = RgbaImage::from_pixel(8, 8, Rgba([200, 100, 50, 40]));
        let jpeg = encode(&raster, OutputFormat::default()).expect("encode jpeg");
        assert_eq!(jpeg.mime, "image/jpeg");

        let decoded = decode_rgba(&jpeg).expect("decode jpeg");
        assert_eq!(decoded.dimensions(), (8, 8));
        assert!(decoded.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn empty_and_garbage_bytes_fail_to_decode() {
        let empty = EncodedImage::from_bytes(Vec::new());
        assert!(matches!(decode_rgba(&empty), Err(DocscanError::Decode(_))));

        let garbage = EncodedImage::from_bytes(b"definitely not an image".to_vec());
        assert_eq!(garbage.mime, "image/jpeg");
        assert!(matches!(decode_rgba(&garbage), Err(DocscanError::Decode(_))));
    }

    #[test]
    fn zero_area_is_rejected() {
        assert!(ensure_non_empty(0, 10).is_err());
        assert!(ensure_non_empty(10, 0).is_err());
        assert!(ensure_non_empty(1, 1).is_ok());
    }
}
