//! Similarity score classification.
//!
//! Buckets 0-100 similarity scores into risk tiers. The same thresholds feed
//! badges, progress bars and highlight overlay colors so every surface agrees
//! on what "high risk" looks like.

use serde::{Deserialize, Serialize};

/// Emphasis threshold used by score cards on top of the regular tiers.
pub const CRITICAL_THRESHOLD: f64 = 80.0;

/// Risk tier derived from a similarity score.
///
/// Ordering follows risk: `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    /// Human-readable label (platform UI is French).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Faible",
            Self::Medium => "Moyen",
            Self::High => "Élevé",
            Self::Critical => "Critique",
        }
    }

    /// Parse a backend-provided risk level string.
    ///
    /// The backend emits `low`/`medium`/`high` (occasionally `critical` or
    /// `none`); anything unrecognized yields `None` so callers fall back to
    /// [`classify`].
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "low" | "faible" => Some(Self::Low),
            "medium" | "moyen" => Some(Self::Medium),
            "high" | "eleve" | "élevé" => Some(Self::High),
            "critical" | "very-high" | "critique" => Some(Self::Critical),
            _ => None,
        }
    }

    /// Base color for this tier as an RGB triple.
    ///
    /// Green / orange / red, matching the legend shown under the viewer.
    pub fn base_rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Low => (76, 175, 80),
            Self::Medium => (255, 152, 0),
            Self::High => (244, 67, 54),
            Self::Critical => (211, 47, 47),
        }
    }

    /// Overlay fill color (translucent).
    pub fn fill(&self) -> Rgba {
        Rgba::from_rgb(self.base_rgb(), 0.3)
    }

    /// Overlay border color.
    pub fn border(&self) -> Rgba {
        Rgba::from_rgb(self.base_rgb(), 0.6)
    }

    /// Overlay fill color while hovered.
    pub fn hover_fill(&self) -> Rgba {
        Rgba::from_rgb(self.base_rgb(), 0.5)
    }

    /// Overlay border color while hovered.
    pub fn hover_border(&self) -> Rgba {
        Rgba::from_rgb(self.base_rgb(), 0.9)
    }
}

/// An RGBA color in CSS notation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32,
}

impl Rgba {
    fn from_rgb((r, g, b): (u8, u8, u8), alpha: f32) -> Self {
        Self { r, g, b, alpha }
    }

    /// Render as a CSS `rgba(...)` string.
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.alpha)
    }
}

/// A similarity score as received from the backend.
///
/// NaN (or a missing value coerced to NaN upstream) is kept distinct from a
/// real zero so the UI can say "unknown" instead of rendering `0%`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreValue {
    Known(f64),
    Unknown,
}

impl ScoreValue {
    /// Wrap a raw score, clamping known values to `[0, 100]`.
    pub fn new(raw: f64) -> Self {
        if raw.is_nan() {
            Self::Unknown
        } else {
            Self::Known(clamp_score(raw))
        }
    }

    /// Wrap a score the backend may not have sent at all.
    pub fn from_option(raw: Option<f64>) -> Self {
        match raw {
            Some(v) => Self::new(v),
            None => Self::Unknown,
        }
    }

    /// Numeric value used for classification (unknown counts as 0).
    pub fn value(&self) -> f64 {
        match self {
            Self::Known(v) => *v,
            Self::Unknown => 0.0,
        }
    }

    /// The score, when the backend actually provided one.
    pub fn known(&self) -> Option<f64> {
        match self {
            Self::Known(v) => Some(*v),
            Self::Unknown => None,
        }
    }

    /// Display string: `"42.5%"` or `"inconnu"`.
    pub fn display(&self) -> String {
        match self {
            Self::Known(v) => format!("{:.1}%", v),
            Self::Unknown => "inconnu".to_string(),
        }
    }
}

impl serde::Serialize for ScoreValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(v) => serializer.serialize_f64(*v),
            Self::Unknown => serializer.serialize_none(),
        }
    }
}

/// Clamp a score to `[0, 100]`, mapping NaN to 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

/// Classify a similarity score into a risk tier.
///
/// Boundary values belong to the lower-risk tier: 30 is still `Low`,
/// 60 is still `Medium`.
pub fn classify(score: f64) -> RiskTier {
    let score = clamp_score(score);
    if score <= 30.0 {
        RiskTier::Low
    } else if score <= 60.0 {
        RiskTier::Medium
    } else {
        RiskTier::High
    }
}

/// Classify with the `Critical` emphasis tier used by score cards.
pub fn classify_emphasis(score: f64) -> RiskTier {
    let score = clamp_score(score);
    if score > CRITICAL_THRESHOLD {
        RiskTier::Critical
    } else {
        classify(score)
    }
}

/// Document-level caption for an overall similarity score.
///
/// Finer bands than the tiers, used purely for the human-readable message
/// next to the score gauge. Does not change the tier.
pub fn originality_message(score: f64) -> &'static str {
    let score = clamp_score(score);
    if score <= 10.0 {
        "Originalité excellente"
    } else if score <= 20.0 {
        "Très bon niveau d'originalité"
    } else if score <= 30.0 {
        "Originalité satisfaisante"
    } else if score <= 40.0 {
        "Présence de similitudes modérées"
    } else if score <= 50.0 {
        "Risque de plagiat significatif"
    } else if score <= 70.0 {
        "Risque de plagiat élevé"
    } else {
        "Risque de plagiat très élevé"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(classify(0.0), RiskTier::Low);
        assert_eq!(classify(29.9), RiskTier::Low);
        assert_eq!(classify(30.1), RiskTier::Medium);
        assert_eq!(classify(60.1), RiskTier::High);
        assert_eq!(classify(100.0), RiskTier::High);
    }

    #[test]
    fn test_boundaries_resolve_to_lower_tier() {
        assert_eq!(classify(30.0), RiskTier::Low);
        assert_eq!(classify(60.0), RiskTier::Medium);
    }

    #[test]
    fn test_classify_is_monotonic() {
        let mut previous = classify(0.0);
        for i in 0..=1000 {
            let tier = classify(i as f64 / 10.0);
            assert!(tier >= previous, "tier regressed at score {}", i as f64 / 10.0);
            previous = tier;
        }
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        assert_eq!(classify(-5.0), RiskTier::Low);
        assert_eq!(classify(150.0), RiskTier::High);
        assert_eq!(classify(f64::NAN), RiskTier::Low);
    }

    #[test]
    fn test_emphasis_tier() {
        assert_eq!(classify_emphasis(80.0), RiskTier::High);
        assert_eq!(classify_emphasis(80.1), RiskTier::Critical);
        assert_eq!(classify_emphasis(45.0), RiskTier::Medium);
    }

    #[test]
    fn test_nan_is_unknown_not_zero_percent() {
        let score = ScoreValue::new(f64::NAN);
        assert_eq!(score, ScoreValue::Unknown);
        assert_eq!(score.display(), "inconnu");
        assert_eq!(classify(score.value()), RiskTier::Low);

        let zero = ScoreValue::new(0.0);
        assert_eq!(zero.display(), "0.0%");
    }

    #[test]
    fn test_tier_colors() {
        assert_eq!(RiskTier::Low.fill().css(), "rgba(76, 175, 80, 0.3)");
        assert_eq!(RiskTier::Medium.border().css(), "rgba(255, 152, 0, 0.6)");
        assert_eq!(RiskTier::High.hover_fill().css(), "rgba(244, 67, 54, 0.5)");
    }

    #[test]
    fn test_parse_backend_levels() {
        assert_eq!(RiskTier::parse("high"), Some(RiskTier::High));
        assert_eq!(RiskTier::parse("Medium"), Some(RiskTier::Medium));
        assert_eq!(RiskTier::parse("none"), Some(RiskTier::Low));
        assert_eq!(RiskTier::parse("garbage"), None);
    }

    #[test]
    fn test_originality_messages() {
        assert_eq!(originality_message(5.0), "Originalité excellente");
        assert_eq!(originality_message(35.0), "Présence de similitudes modérées");
        assert_eq!(originality_message(90.0), "Risque de plagiat très élevé");
    }
}
