// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Docscan.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DocscanError;

/// Unique identifier for a scanned document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocId(pub Uuid);

impl DocId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DocId {
    type Err = DocscanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|err| DocscanError::InvalidId(format!("{s:?}: {err}")))
    }
}

/// The scan-look filter applied to a document's original image.
///
/// A closed set: every mode maps to one fixed per-pixel transform and carries
/// no parameters of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Pass-through; the image is only re-encoded.
    #[default]
    Original,
    /// BT.709 luma in all three colour channels.
    Grayscale,
    /// Hard black/white threshold on luma.
    Bw,
    /// Linear contrast stretch around mid-grey.
    Magic,
    /// Gamma brightening of the midtones.
    Lighten,
}

impl FilterMode {
    /// Every mode, in the order the editor presents them.
    pub const ALL: [FilterMode; 5] = [
        Self::Original,
        Self::Lighten,
        Self::Magic,
        Self::Grayscale,
        Self::Bw,
    ];

    /// Stable tag used in storage and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Grayscale => "grayscale",
            Self::Bw => "bw",
            Self::Magic => "magic",
            Self::Lighten => "lighten",
        }
    }

    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Original => "Original",
            Self::Grayscale => "Gray",
            Self::Bw => "B&W",
            Self::Magic => "Magic",
            Self::Lighten => "Lighten",
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FilterMode {
    type Err = DocscanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "original" => Ok(Self::Original),
            "grayscale" | "gray" | "grey" => Ok(Self::Grayscale),
            "bw" | "b&w" => Ok(Self::Bw),
            "magic" => Ok(Self::Magic),
            "lighten" => Ok(Self::Lighten),
            other => Err(DocscanError::UnsupportedMode(other.to_string())),
        }
    }
}

/// A scanned document as kept in the document list.
///
/// Images are stored as data URLs (`data:image/jpeg;base64,...`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedDoc {
    pub id: DocId,
    pub title: String,
    /// The image as captured; filters are always applied to this.
    pub original_image: String,
    /// The image after the last applied filter.
    pub processed_image: String,
    /// Creation time, stored as milliseconds since the Unix epoch.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    pub filter: FilterMode,
}

impl ScannedDoc {
    /// Create a new document from a freshly captured image.
    ///
    /// The processed image starts out identical to the original.
    pub fn new(original_image: String) -> Self {
        let title = format!("Scan {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
        Self {
            id: DocId::new(),
            title,
            processed_image: original_image.clone(),
            original_image,
            created_at: Utc::now(),
            extracted_text: None,
            filter: FilterMode::Original,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_mode_parses_tags_and_labels() {
        for mode in FilterMode::ALL {
            let parsed: FilterMode = mode.as_str().parse().expect("tag should parse");
            assert_eq!(parsed, mode);
        }
        assert_eq!("B&W".parse::<FilterMode>().expect("label"), FilterMode::Bw);
        assert_eq!("Gray".parse::<FilterMode>().expect("label"), FilterMode::Grayscale);
    }

    #[test]
    fn unknown_filter_mode_is_unsupported() {
        let err = "sepia".parse::<FilterMode>().expect_err("sepia is not a mode");
        assert!(
            matches!(err, DocscanError::UnsupportedMode(ref tag) if tag == "sepia"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn filter_mode_serializes_as_lowercase_tag() {
        let json = serde_json::to_string(&FilterMode::Bw).expect("serialize");
        assert_eq!(json, "\"bw\"");
        let mode: FilterMode = serde_json::from_str("\"lighten\"").expect("deserialize");
        assert_eq!(mode, FilterMode::Lighten);
    }

    #[test]
    fn new_document_starts_unfiltered() {
        let doc = ScannedDoc::new("data:image/jpeg;base64,AAAA".into());
        assert_eq!(doc.original_image, doc.processed_image);
        assert_eq!(doc.filter, FilterMode::Original);
        assert!(doc.extracted_text.is_none());
        assert!(doc.title.starts_with("Scan "), "title was {}", doc.title);
    }

    #[test]
    fn document_json_uses_camel_case_and_millis() {
        let doc = ScannedDoc::new("data:image/png;base64,AAAA".into());
        let value = serde_json::to_value(&doc).expect("serialize");
        assert!(value.get("originalImage").is_some());
        assert!(value.get("processedImage").is_some());
        assert!(value.get("extractedText").is_none());
        assert_eq!(
            value["createdAt"].as_i64(),
            Some(doc.created_at.timestamp_millis())
        );
    }

    #[test]
    fn doc_id_round_trips_through_display() {
        let id = DocId::new();
        let parsed: DocId = id.to_string().parse().expect("parse id");
        assert_eq!(parsed, id);
        assert!(matches!(
            "not-a-uuid".parse::<DocId>(),
            Err(DocscanError::InvalidId(_))
        ));
    }
}
