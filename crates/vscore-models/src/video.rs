//! Video metadata models.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Immutable snapshot of a video's public metadata.
///
/// Built once per request from the media-info provider's response. Every
/// field has a zero-value default so a sparse provider response never
/// prevents the request from proceeding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VideoMetadata {
    /// Provider-side video identifier
    #[serde(default)]
    pub video_id: String,

    /// Video title
    #[serde(default)]
    pub title: String,

    /// Full description text
    #[serde(default)]
    pub description: String,

    /// Thumbnail image URL
    #[serde(default)]
    pub thumbnail_url: String,

    /// Duration in whole seconds
    #[serde(default)]
    pub duration: u64,

    #[serde(default)]
    pub view_count: u64,

    #[serde(default)]
    pub like_count: u64,

    #[serde(default)]
    pub comment_count: u64,

    /// Upload date as reported by the provider (`YYYYMMDD` for YouTube)
    #[serde(default)]
    pub upload_date: String,

    /// Uploader / channel display name
    #[serde(default)]
    pub channel_name: String,

    /// Tags in provider order
    #[serde(default)]
    pub tags: Vec<String>,
}

impl VideoMetadata {
    /// Parse `upload_date` as a calendar date.
    pub fn upload_date_parsed(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.upload_date, "%Y%m%d").ok()
    }

    /// Description cut to at most `max_chars` characters (not bytes).
    pub fn description_excerpt(&self, max_chars: usize) -> &str {
        match self.description.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.description[..idx],
            None => &self.description,
        }
    }

    /// The first `limit` tags.
    pub fn leading_tags(&self, limit: usize) -> &[String] {
        &self.tags[..self.tags.len().min(limit)]
    }
}
