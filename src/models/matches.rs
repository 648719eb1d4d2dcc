//! Match records and their normalization from raw backend payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::risk::{self, RiskTier};

/// Validation failure for a raw match record.
///
/// Only the two mandatory fields can fail normalization; every optional
/// field falls back to a safe default instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("match record has no chunk index")]
    MissingChunkIndex,
    #[error("chunk index is not numeric: {0}")]
    InvalidChunkIndex(String),
    #[error("match record has no similarity score")]
    MissingSimilarity,
    #[error("similarity score is not numeric: {0}")]
    InvalidSimilarity(String),
}

/// Fractional bounding box on a PDF page.
///
/// All coordinates are fractions of the page dimensions, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Build a box if every coordinate is a valid page fraction.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if valid(x) && valid(y) && valid(width) && valid(height) {
            Some(Self { x, y, width, height })
        } else {
            None
        }
    }
}

/// Raw match record as deserialized from the backend.
///
/// The API emits both snake_case and camelCase variants of most fields
/// depending on which endpoint produced the record, so aliases cover both.
/// Mandatory numerics are kept as raw JSON values so normalization can
/// distinguish "absent" from "present but not a number".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMatch {
    #[serde(alias = "chunkIndex")]
    pub chunk_index: Option<Value>,
    pub similarity: Option<Value>,
    pub score: Option<f64>,
    pub page: Option<i64>,
    pub text: Option<String>,
    #[serde(alias = "originalText")]
    pub original_text: Option<String>,
    #[serde(alias = "matchedText")]
    pub matched_text: Option<String>,
    pub source: Option<String>,
    #[serde(alias = "sourceUrl")]
    pub source_url: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// One detected correspondence between a submitted chunk and a source chunk.
///
/// Immutable once normalized; the chunk index doubles as the record
/// identifier within an analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    /// Zero-based index of the submitted chunk; identifies the match.
    pub chunk_index: u32,
    /// 1-based page of the submitted document.
    pub page: u32,
    /// Location on the page, when the backend supplies spatial data.
    pub bbox: Option<BoundingBox>,
    /// Similarity score in `[0, 100]`.
    pub similarity: f64,
    /// Submitted text snippet.
    pub text: String,
    /// Matched source text snippet.
    pub matched_text: String,
    /// Source label (site or corpus name).
    pub source: String,
    /// Source URL, when available.
    pub source_url: Option<String>,
}

/// Extract a number from a JSON value, accepting numeric strings.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

impl Match {
    /// Normalize a raw backend record into a canonical match.
    ///
    /// Fails only when the chunk index or similarity score is absent or
    /// non-numeric. Everything else defaults: page to 1, snippets to empty
    /// strings, the bounding box to `None` when any coordinate is missing
    /// or out of range.
    pub fn from_raw(raw: RawMatch) -> Result<Self, NormalizeError> {
        let chunk_value = raw.chunk_index.ok_or(NormalizeError::MissingChunkIndex)?;
        let chunk_index = as_number(&chunk_value)
            .ok_or_else(|| NormalizeError::InvalidChunkIndex(chunk_value.to_string()))?;

        let similarity_value = raw.similarity.ok_or(NormalizeError::MissingSimilarity)?;
        let similarity = as_number(&similarity_value)
            .ok_or_else(|| NormalizeError::InvalidSimilarity(similarity_value.to_string()))?;

        let bbox = match (raw.x, raw.y, raw.width, raw.height) {
            (Some(x), Some(y), Some(w), Some(h)) => BoundingBox::new(x, y, w, h),
            _ => None,
        };

        Ok(Self {
            chunk_index: chunk_index.max(0.0) as u32,
            page: raw.page.unwrap_or(1).max(1) as u32,
            bbox,
            similarity: risk::clamp_score(similarity),
            text: raw.text.or(raw.original_text).unwrap_or_default(),
            matched_text: raw.matched_text.unwrap_or_default(),
            source: raw.source.unwrap_or_default(),
            source_url: raw.source_url.filter(|s| !s.is_empty()),
        })
    }

    /// Risk tier for this match's similarity score.
    pub fn tier(&self) -> RiskTier {
        risk::classify(self.similarity)
    }

    /// 1-based number shown in listings and accepted back as a lookup handle.
    pub fn display_number(&self) -> u32 {
        self.chunk_index + 1
    }

    /// Case-insensitive free-text search across the match's text fields.
    pub fn matches_filter(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        self.text.to_lowercase().contains(&needle)
            || self.matched_text.to_lowercase().contains(&needle)
            || self.source.to_lowercase().contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::RiskTier;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawMatch {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalizes_snake_case_record() {
        let m = Match::from_raw(raw(json!({
            "chunk_index": 3,
            "similarity": 85.5,
            "page": 2,
            "text": "texte soumis",
            "matched_text": "texte trouvé",
            "source": "wikipedia.org",
            "source_url": "https://fr.wikipedia.org/wiki/Plagiat"
        })))
        .unwrap();

        assert_eq!(m.chunk_index, 3);
        assert_eq!(m.page, 2);
        assert_eq!(m.similarity, 85.5);
        assert_eq!(m.tier(), RiskTier::High);
        assert_eq!(m.source_url.as_deref(), Some("https://fr.wikipedia.org/wiki/Plagiat"));
    }

    #[test]
    fn test_normalizes_camel_case_record() {
        let m = Match::from_raw(raw(json!({
            "chunkIndex": 0,
            "similarity": 20,
            "matchedText": "source text",
            "originalText": "submitted text",
            "sourceUrl": "https://example.com"
        })))
        .unwrap();

        assert_eq!(m.chunk_index, 0);
        assert_eq!(m.matched_text, "source text");
        assert_eq!(m.text, "submitted text");
        assert_eq!(m.tier(), RiskTier::Low);
    }

    #[test]
    fn test_missing_optionals_default() {
        let m = Match::from_raw(raw(json!({
            "chunk_index": 1,
            "similarity": 50
        })))
        .unwrap();

        assert_eq!(m.page, 1);
        assert_eq!(m.text, "");
        assert_eq!(m.matched_text, "");
        assert_eq!(m.source, "");
        assert_eq!(m.source_url, None);
        assert_eq!(m.bbox, None);
    }

    #[test]
    fn test_missing_mandatory_fields_error() {
        let err = Match::from_raw(raw(json!({ "similarity": 50 }))).unwrap_err();
        assert_eq!(err, NormalizeError::MissingChunkIndex);

        let err = Match::from_raw(raw(json!({ "chunk_index": 1 }))).unwrap_err();
        assert_eq!(err, NormalizeError::MissingSimilarity);
    }

    #[test]
    fn test_non_numeric_mandatory_fields_error() {
        let err = Match::from_raw(raw(json!({
            "chunk_index": 1,
            "similarity": "not a number"
        })))
        .unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidSimilarity(_)));
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let m = Match::from_raw(raw(json!({
            "chunk_index": "4",
            "similarity": "72.5"
        })))
        .unwrap();
        assert_eq!(m.chunk_index, 4);
        assert_eq!(m.similarity, 72.5);
    }

    #[test]
    fn test_similarity_clamped() {
        let m = Match::from_raw(raw(json!({ "chunk_index": 0, "similarity": 130 }))).unwrap();
        assert_eq!(m.similarity, 100.0);

        let m = Match::from_raw(raw(json!({ "chunk_index": 0, "similarity": -3 }))).unwrap();
        assert_eq!(m.similarity, 0.0);
    }

    #[test]
    fn test_bounding_box_requires_valid_fractions() {
        let m = Match::from_raw(raw(json!({
            "chunk_index": 0,
            "similarity": 10,
            "x": 0.1, "y": 0.2, "width": 0.3, "height": 0.05
        })))
        .unwrap();
        assert_eq!(
            m.bbox,
            Some(BoundingBox { x: 0.1, y: 0.2, width: 0.3, height: 0.05 })
        );

        // Out-of-range coordinate drops the whole box.
        let m = Match::from_raw(raw(json!({
            "chunk_index": 0,
            "similarity": 10,
            "x": 1.5, "y": 0.2, "width": 0.3, "height": 0.05
        })))
        .unwrap();
        assert_eq!(m.bbox, None);

        // Partial coordinates drop the box too.
        let m = Match::from_raw(raw(json!({
            "chunk_index": 0,
            "similarity": 10,
            "x": 0.5, "y": 0.2
        })))
        .unwrap();
        assert_eq!(m.bbox, None);
    }

    #[test]
    fn test_empty_source_url_becomes_none() {
        let m = Match::from_raw(raw(json!({
            "chunk_index": 0,
            "similarity": 10,
            "source_url": ""
        })))
        .unwrap();
        assert_eq!(m.source_url, None);
    }

    #[test]
    fn test_filter_matching() {
        let m = Match::from_raw(raw(json!({
            "chunk_index": 0,
            "similarity": 10,
            "text": "Les réseaux de neurones",
            "source": "wikipedia.org"
        })))
        .unwrap();

        assert!(m.matches_filter(""));
        assert!(m.matches_filter("neurones"));
        assert!(m.matches_filter("WIKIPEDIA"));
        assert!(!m.matches_filter("introuvable"));
    }
}
