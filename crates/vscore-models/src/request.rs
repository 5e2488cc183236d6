//! Request and response shapes exchanged with the HTTP front end.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::report::AnalysisReport;
use crate::video::VideoMetadata;

/// Request to analyze a single video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeRequest {
    /// Video URL; missing or blank is a client error
    #[serde(default)]
    pub url: Option<String>,

    /// Also sample the media itself and submit it for analysis
    #[serde(default)]
    pub analyze_video_content: bool,
}

impl AnalyzeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            analyze_video_content: false,
        }
    }

    pub fn with_video_content(mut self, enabled: bool) -> Self {
        self.analyze_video_content = enabled;
        self
    }
}

/// Successful analysis response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeResponse {
    pub video_info: VideoMetadata,
    pub analysis: AnalysisReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req: AnalyzeRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.url, None);
        assert!(!req.analyze_video_content);

        let req: AnalyzeRequest =
            serde_json::from_str(r#"{"url": "https://youtu.be/abc123", "analyze_video_content": true}"#)
                .unwrap();
        assert_eq!(req, AnalyzeRequest::new("https://youtu.be/abc123").with_video_content(true));
    }

    #[test]
    fn test_response_shape() {
        let response = AnalyzeResponse {
            video_info: VideoMetadata {
                video_id: "abc123".to_string(),
                ..Default::default()
            },
            analysis: AnalysisReport::fallback(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["video_info"]["video_id"], "abc123");
        assert_eq!(value["analysis"]["overall_score"], 0);
    }

    #[test]
    fn test_response_schema_lists_top_level_fields() {
        let schema = serde_json::to_value(schemars::schema_for!(AnalyzeResponse)).unwrap();
        assert!(schema["properties"]["video_info"].is_object());
        assert!(schema["properties"]["analysis"].is_object());
        assert!(schema["definitions"]["AnalysisReport"].is_object());
    }
}
