//! Canonical data model for plagiarism analyses.
//!
//! Backend payloads arrive with inconsistent field naming and optional
//! fields; everything is normalized into these types at the API boundary so
//! the rest of the crate never sees raw JSON shapes.

mod analysis;
mod matches;

pub use analysis::{AnalysisResult, DocumentStats, RawAnalysis};
pub use matches::{BoundingBox, Match, NormalizeError, RawMatch};
