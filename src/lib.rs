//! Plagiview - plagiarism analysis review client.
//!
//! Client for the soutenance platform's plagiarism detection API: fetches
//! analysis results, normalizes the backend's loose payload shapes into a
//! canonical model, and renders scores, match tables, word-level diffs and
//! PDF highlight-overlay geometry.

pub mod cli;
pub mod client;
pub mod config;
pub mod diff;
pub mod models;
pub mod risk;
pub mod viewer;
