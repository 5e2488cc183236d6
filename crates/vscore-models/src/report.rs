//! Analysis report models.
//!
//! A report is either a genuine result parsed from the remote scorer's JSON or
//! the fallback produced when remote analysis fails. Both share one shape so
//! consumers never branch on the variant; the fallback is recognisable only by
//! its `error` marker and zeroed fields.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Error marker carried by the fallback report.
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to analyze with Gemini, providing fallback data.";

/// A 0-100 score.
///
/// Deserialization accepts any JSON number and rounds/clamps it into range,
/// since generative output routinely drifts into `87.5` or `105`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    pub const MAX: u8 = 100;

    /// Create a score, clamping to 100.
    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self(0);
        }
        Self(value.round().clamp(0.0, f64::from(Self::MAX)) as u8)
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        f64::deserialize(deserializer).map(Score::from_f64)
    }
}

impl From<u8> for Score {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scored aspects of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    Thumbnail,
    Title,
    Description,
    Tags,
    Engagement,
    Seo,
}

impl ScoreCategory {
    /// All categories in prompt order.
    pub const ALL: [ScoreCategory; 6] = [
        ScoreCategory::Thumbnail,
        ScoreCategory::Title,
        ScoreCategory::Description,
        ScoreCategory::Tags,
        ScoreCategory::Engagement,
        ScoreCategory::Seo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreCategory::Thumbnail => "thumbnail",
            ScoreCategory::Title => "title",
            ScoreCategory::Description => "description",
            ScoreCategory::Tags => "tags",
            ScoreCategory::Engagement => "engagement",
            ScoreCategory::Seo => "seo",
        }
    }
}

impl fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Priority of an improvement suggestion.
///
/// Serialized lowercase; parsed case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    const NAMES: &'static [&'static str] = &["high", "medium", "low"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(D::Error::unknown_variant(&raw, Self::NAMES)),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single prioritized suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Improvement {
    pub category: String,
    pub priority: Priority,
    pub suggestion: String,
    /// Expected effect of applying the suggestion
    #[serde(default)]
    pub impact: String,
}

/// Quality report for one video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisReport {
    /// Present only on the fallback report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub overall_score: Score,

    /// Per-category scores; empty on the fallback report
    #[serde(default)]
    pub scores: BTreeMap<ScoreCategory, Score>,

    /// Suggestions in the order the scorer returned them
    #[serde(default)]
    pub improvements: Vec<Improvement>,

    pub viral_potential: Score,

    #[serde(default)]
    pub strengths: Vec<String>,

    #[serde(default)]
    pub weaknesses: Vec<String>,
}

impl AnalysisReport {
    /// The degraded report returned whenever remote analysis cannot produce
    /// a genuine result.
    pub fn fallback() -> Self {
        Self {
            error: Some(FALLBACK_ERROR_MESSAGE.to_string()),
            ..Default::default()
        }
    }

    /// Returns true if this is the fallback variant.
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }

    /// Score for a category, if the scorer provided one.
    pub fn score(&self, category: ScoreCategory) -> Option<Score> {
        self.scores.get(&category).copied()
    }

    /// Improvements with the given priority, in report order.
    pub fn improvements_with(&self, priority: Priority) -> impl Iterator<Item = &Improvement> {
        self.improvements
            .iter()
            .filter(move |i| i.priority == priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn sample_report_json() -> Value {
        json!({
            "overall_score": 78,
            "scores": {
                "thumbnail": 80, "title": 72, "description": 65,
                "tags": 55, "engagement": 90, "seo": 70
            },
            "improvements": [
                {"category": "tags", "priority": "high", "suggestion": "Add niche tags", "impact": "Better discovery"},
                {"category": "title", "priority": "Low", "suggestion": "Shorten title", "impact": "Higher CTR"}
            ],
            "viral_potential": 64,
            "strengths": ["Strong hook"],
            "weaknesses": ["Sparse tags"]
        })
    }

    fn keys(value: &Value) -> Vec<String> {
        let mut keys: Vec<String> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_parse_full_report() {
        let report: AnalysisReport = serde_json::from_value(sample_report_json()).unwrap();
        assert!(!report.is_fallback());
        assert_eq!(report.overall_score.value(), 78);
        assert_eq!(report.score(ScoreCategory::Seo), Some(Score::new(70)));
        assert_eq!(report.improvements.len(), 2);
        assert_eq!(report.improvements[1].priority, Priority::Low);
        assert_eq!(report.improvements_with(Priority::High).count(), 1);
    }

    #[test]
    fn test_scores_are_rounded_and_clamped() {
        let report: AnalysisReport = serde_json::from_value(json!({
            "overall_score": 87.6,
            "scores": {"seo": 140, "tags": -3},
            "viral_potential": 12.2
        }))
        .unwrap();
        assert_eq!(report.overall_score.value(), 88);
        assert_eq!(report.viral_potential.value(), 12);
        assert_eq!(report.score(ScoreCategory::Seo), Some(Score::new(100)));
        assert_eq!(report.score(ScoreCategory::Tags), Some(Score::new(0)));
    }

    #[test]
    fn test_priority_ignores_case() {
        for (raw, expected) in [
            ("hIgh", Priority::High),
            ("MEDIUM", Priority::Medium),
            ("Low", Priority::Low),
            (" low ", Priority::Low),
        ] {
            let parsed: Priority = serde_json::from_value(json!(raw)).unwrap();
            assert_eq!(parsed, expected, "{raw:?}");
        }
        assert_eq!(serde_json::to_value(Priority::High).unwrap(), json!("high"));
    }

    #[test]
    fn test_unknown_priority_is_rejected() {
        let result: Result<AnalysisReport, _> = serde_json::from_value(json!({
            "overall_score": 50,
            "viral_potential": 50,
            "improvements": [{"category": "seo", "priority": "urgent", "suggestion": "x"}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_fallback_values() {
        let fallback = AnalysisReport::fallback();
        assert!(fallback.is_fallback());
        assert_eq!(fallback.error.as_deref(), Some(FALLBACK_ERROR_MESSAGE));
        assert_eq!(fallback.overall_score.value(), 0);
        assert_eq!(fallback.viral_potential.value(), 0);
        assert!(fallback.scores.is_empty());
        assert!(fallback.improvements.is_empty());
        assert!(fallback.strengths.is_empty());
        assert!(fallback.weaknesses.is_empty());
    }

    #[test]
    fn test_fallback_shares_shape_with_genuine_report() {
        let genuine: AnalysisReport = serde_json::from_value(sample_report_json()).unwrap();
        let genuine = serde_json::to_value(&genuine).unwrap();
        let fallback = serde_json::to_value(AnalysisReport::fallback()).unwrap();

        let mut expected = keys(&genuine);
        expected.push("error".to_string());
        expected.sort();
        assert_eq!(keys(&fallback), expected);

        for key in keys(&genuine) {
            let a = &genuine[&key];
            let b = &fallback[&key];
            assert_eq!(
                std::mem::discriminant(a),
                std::mem::discriminant(b),
                "type mismatch for {key}"
            );
        }
    }

    #[test]
    fn test_fallback_serializes_like_the_legacy_payload() {
        let fallback = serde_json::to_value(AnalysisReport::fallback()).unwrap();
        assert_eq!(
            fallback,
            json!({
                "error": FALLBACK_ERROR_MESSAGE,
                "overall_score": 0,
                "scores": {},
                "improvements": [],
                "viral_potential": 0,
                "strengths": [],
                "weaknesses": []
            })
        );
    }
}
