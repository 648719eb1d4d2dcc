//! Analysis aggregates: the full result of one document's plagiarism scan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::matches::{Match, RawMatch};
use crate::risk::{self, RiskTier, ScoreValue};

/// Document statistics reported alongside an analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub words: u64,
    pub characters: u64,
    pub paragraphs: u64,
    pub unique_words: u64,
    /// Readability estimate in `[0, 100]`.
    pub readability: f64,
}

/// Nested student record on the raw payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawStudentInfo {
    pub prenom: Option<String>,
    pub name: Option<String>,
}

/// Nested rapport record on the raw payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRapportInfo {
    pub filename: Option<String>,
    #[serde(alias = "storagePath")]
    pub storage_path: Option<String>,
}

/// Raw analysis payload from `GET /api/plagiat/analysis/{id}`.
///
/// Field naming mixes camelCase and snake_case across backend versions;
/// aliases accept both.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAnalysis {
    #[serde(alias = "analysisId")]
    pub analysis_id: Option<i64>,
    #[serde(alias = "rapportId")]
    pub rapport_id: Option<i64>,
    #[serde(alias = "studentInfo")]
    pub student_info: RawStudentInfo,
    #[serde(alias = "rapportInfo")]
    pub rapport_info: RawRapportInfo,
    #[serde(alias = "similarityScore", alias = "similarity")]
    pub similarity_score: Option<f64>,
    #[serde(alias = "originalityScore", alias = "originality")]
    pub originality_score: Option<f64>,
    #[serde(alias = "riskLevel", alias = "risk")]
    pub risk_level: Option<String>,
    pub matches: Vec<RawMatch>,
    #[serde(alias = "aiScore")]
    pub ai_score: Option<f64>,
    #[serde(alias = "avgSimilarity")]
    pub avg_similarity: Option<f64>,
    #[serde(alias = "chunksAnalyzed")]
    pub chunks_analyzed: Option<u32>,
    #[serde(alias = "chunksWithMatches")]
    pub chunks_with_matches: Option<u32>,
    #[serde(alias = "totalMatches")]
    pub total_matches: Option<u32>,
    #[serde(alias = "wordCount", alias = "total_words")]
    pub word_count: Option<u64>,
    #[serde(alias = "characterCount", alias = "total_characters")]
    pub character_count: Option<u64>,
    #[serde(alias = "paragraphCount", alias = "total_paragraphs")]
    pub paragraph_count: Option<u64>,
    #[serde(alias = "uniqueWords")]
    pub unique_words: Option<u64>,
    #[serde(alias = "readabilityScore")]
    pub readability_score: Option<f64>,
    #[serde(alias = "analyzedAt")]
    pub analyzed_at: Option<DateTime<Utc>>,
}

/// Normalized result of one document's plagiarism analysis.
///
/// Replaced wholesale on refresh; never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub analysis_id: i64,
    /// Rapport behind this analysis; needed to trigger a reanalysis.
    pub rapport_id: Option<i64>,
    pub student: String,
    pub rapport: String,
    /// Overall similarity score in `[0, 100]`, or unknown when the backend
    /// sent none. Kept distinct from zero so displays can say so.
    pub similarity: ScoreValue,
    /// Originality score; `100 - similarity` unless the backend overrides.
    pub originality: ScoreValue,
    /// Backend-provided risk level, falling back to the classifier.
    pub risk: RiskTier,
    pub matches: Vec<Match>,
    pub ai_score: f64,
    pub avg_similarity: f64,
    pub chunks_analyzed: u32,
    pub chunks_with_matches: u32,
    pub total_matches: u32,
    pub stats: DocumentStats,
    pub analyzed_at: Option<DateTime<Utc>>,
    pub storage_path: Option<String>,
}

impl AnalysisResult {
    /// Map a raw payload into the canonical result.
    ///
    /// Individual match records that fail validation are logged and skipped
    /// rather than failing the whole analysis.
    pub fn from_raw(raw: RawAnalysis, analysis_id: i64) -> Self {
        let mut matches = Vec::with_capacity(raw.matches.len());
        for (idx, record) in raw.matches.into_iter().enumerate() {
            match Match::from_raw(record) {
                Ok(m) => matches.push(m),
                Err(err) => warn!(record = idx, %err, "skipping invalid match record"),
            }
        }

        let similarity = ScoreValue::from_option(raw.similarity_score);
        let originality = match raw.originality_score {
            Some(v) => ScoreValue::new(v),
            None => match similarity.known() {
                Some(s) => ScoreValue::Known(100.0 - s),
                None => ScoreValue::Unknown,
            },
        };
        let risk = raw
            .risk_level
            .as_deref()
            .and_then(RiskTier::parse)
            .unwrap_or_else(|| risk::classify(similarity.value()));

        let student = format!(
            "{} {}",
            raw.student_info.prenom.as_deref().unwrap_or(""),
            raw.student_info.name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string();

        let total_matches = raw.total_matches.unwrap_or(matches.len() as u32);

        Self {
            analysis_id: raw.analysis_id.unwrap_or(analysis_id),
            rapport_id: raw.rapport_id,
            student: if student.is_empty() { "Inconnu".to_string() } else { student },
            rapport: raw.rapport_info.filename.unwrap_or_else(|| "Rapport".to_string()),
            similarity,
            originality,
            risk,
            matches,
            ai_score: raw.ai_score.unwrap_or(0.0),
            avg_similarity: raw.avg_similarity.unwrap_or(0.0),
            chunks_analyzed: raw.chunks_analyzed.unwrap_or(0),
            chunks_with_matches: raw.chunks_with_matches.unwrap_or(0),
            total_matches,
            stats: DocumentStats {
                words: raw.word_count.unwrap_or(0),
                characters: raw.character_count.unwrap_or(0),
                paragraphs: raw.paragraph_count.unwrap_or(0),
                unique_words: raw.unique_words.unwrap_or(0),
                readability: raw.readability_score.unwrap_or(0.0),
            },
            analyzed_at: raw.analyzed_at,
            storage_path: raw.rapport_info.storage_path,
        }
    }

    /// Share of analyzed chunks that produced at least one match, in percent.
    pub fn match_rate(&self) -> f64 {
        if self.chunks_analyzed == 0 {
            0.0
        } else {
            self.chunks_with_matches as f64 / self.chunks_analyzed as f64 * 100.0
        }
    }

    /// Look up a match by its chunk index.
    pub fn match_by_chunk(&self, chunk_index: u32) -> Option<&Match> {
        self.matches.iter().find(|m| m.chunk_index == chunk_index)
    }

    /// Look up a match by the 1-based number printed in listings.
    ///
    /// Listings show [`Match::display_number`]; feeding that number back in
    /// here returns the same match. Zero is never a valid number.
    pub fn match_by_number(&self, number: u32) -> Option<&Match> {
        number.checked_sub(1).and_then(|idx| self.match_by_chunk(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> RawAnalysis {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_maps_camel_case_payload() {
        let raw = parse(json!({
            "rapport_id": 12,
            "studentInfo": { "prenom": "Amina", "name": "Benali" },
            "rapportInfo": { "filename": "memoire.pdf", "storagePath": "/data/memoire.pdf" },
            "similarityScore": 75.0,
            "originalityScore": 25.0,
            "riskLevel": "high",
            "aiScore": 40.0,
            "chunksAnalyzed": 20,
            "chunksWithMatches": 5,
            "wordCount": 12000,
            "characterCount": 70000,
            "paragraphCount": 140,
            "uniqueWords": 3200,
            "readabilityScore": 55.0,
            "matches": [
                { "chunkIndex": 0, "similarity": 85, "page": 1 },
                { "chunkIndex": 1, "similarity": 20, "page": 3 }
            ]
        }));

        let result = AnalysisResult::from_raw(raw, 7);
        assert_eq!(result.analysis_id, 7);
        assert_eq!(result.rapport_id, Some(12));
        assert_eq!(result.student, "Amina Benali");
        assert_eq!(result.rapport, "memoire.pdf");
        assert_eq!(result.risk, RiskTier::High);
        assert_eq!(result.matches.len(), 2);
        assert_eq!(result.total_matches, 2);
        assert_eq!(result.stats.words, 12000);
        assert_eq!(result.match_rate(), 25.0);
    }

    #[test]
    fn test_per_match_tiers_from_scenario() {
        // similarity=75 -> overall high; 85 -> high badge; 20 -> low badge.
        let raw = parse(json!({
            "similarityScore": 75.0,
            "matches": [
                { "chunk_index": 0, "similarity": 85 },
                { "chunk_index": 1, "similarity": 20 }
            ]
        }));
        let result = AnalysisResult::from_raw(raw, 1);

        assert_eq!(result.risk, RiskTier::High);
        assert_eq!(result.matches[0].tier(), RiskTier::High);
        assert_eq!(result.matches[1].tier(), RiskTier::Low);
    }

    #[test]
    fn test_originality_defaults_to_complement() {
        let raw = parse(json!({ "similarityScore": 30.0, "matches": [] }));
        let result = AnalysisResult::from_raw(raw, 1);
        assert_eq!(result.originality, ScoreValue::Known(70.0));

        // Backend override takes precedence.
        let raw = parse(json!({
            "similarityScore": 30.0,
            "originalityScore": 65.0,
            "matches": []
        }));
        let result = AnalysisResult::from_raw(raw, 1);
        assert_eq!(result.originality, ScoreValue::Known(65.0));
    }

    #[test]
    fn test_backend_risk_takes_precedence_over_classifier() {
        // Classifier would say Low for 25, backend insists on medium.
        let raw = parse(json!({
            "similarityScore": 25.0,
            "riskLevel": "medium",
            "matches": []
        }));
        let result = AnalysisResult::from_raw(raw, 1);
        assert_eq!(result.risk, RiskTier::Medium);
    }

    #[test]
    fn test_unknown_risk_falls_back_to_classifier() {
        let raw = parse(json!({
            "similarityScore": 65.0,
            "riskLevel": "???",
            "matches": []
        }));
        let result = AnalysisResult::from_raw(raw, 1);
        assert_eq!(result.risk, RiskTier::High);
    }

    #[test]
    fn test_invalid_match_records_are_skipped() {
        let raw = parse(json!({
            "similarityScore": 40.0,
            "matches": [
                { "chunk_index": 0, "similarity": 50 },
                { "similarity": 90 },
                { "chunk_index": 2, "similarity": "oops" }
            ]
        }));
        let result = AnalysisResult::from_raw(raw, 1);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].chunk_index, 0);
    }

    #[test]
    fn test_empty_payload_defaults() {
        let result = AnalysisResult::from_raw(RawAnalysis::default(), 3);
        assert_eq!(result.analysis_id, 3);
        assert_eq!(result.student, "Inconnu");
        assert_eq!(result.rapport, "Rapport");
        assert_eq!(result.similarity, ScoreValue::Unknown);
        assert_eq!(result.originality, ScoreValue::Unknown);
        assert_eq!(result.risk, RiskTier::Low);
        assert!(result.matches.is_empty());
        assert_eq!(result.match_rate(), 0.0);
    }

    #[test]
    fn test_missing_scores_display_as_unknown_not_zero() {
        // A payload with matches but no document score must not pretend 0%.
        let raw = parse(json!({ "matches": [] }));
        let result = AnalysisResult::from_raw(raw, 1);
        assert_eq!(result.similarity.display(), "inconnu");
        assert_eq!(result.originality.display(), "inconnu");

        // A real zero still renders as a percentage.
        let raw = parse(json!({ "similarityScore": 0.0, "matches": [] }));
        let result = AnalysisResult::from_raw(raw, 1);
        assert_eq!(result.similarity.display(), "0.0%");
        assert_eq!(result.originality.display(), "100.0%");
    }

    #[test]
    fn test_match_by_chunk() {
        let raw = parse(json!({
            "matches": [
                { "chunk_index": 4, "similarity": 10 },
                { "chunk_index": 9, "similarity": 70 }
            ]
        }));
        let result = AnalysisResult::from_raw(raw, 1);
        assert_eq!(result.match_by_chunk(9).unwrap().similarity, 70.0);
        assert!(result.match_by_chunk(5).is_none());
    }

    #[test]
    fn test_listed_number_round_trips_to_same_match() {
        let raw = parse(json!({
            "matches": [
                { "chunk_index": 0, "similarity": 40, "text": "premier" },
                { "chunk_index": 1, "similarity": 60, "text": "second" }
            ]
        }));
        let result = AnalysisResult::from_raw(raw, 1);

        // The number printed next to a match looks it back up.
        assert_eq!(result.matches[0].display_number(), 1);
        assert_eq!(result.match_by_number(1).unwrap().text, "premier");
        assert_eq!(result.match_by_number(2).unwrap().text, "second");

        // Numbers are 1-based; zero and past-the-end find nothing.
        assert!(result.match_by_number(0).is_none());
        assert!(result.match_by_number(3).is_none());
    }
}
