//! Media-info provider capability.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::MediaResult;

/// Format selector for samples: a moderate-resolution single-file mp4.
pub const DEFAULT_SAMPLE_FORMAT: &str = "best[ext=mp4][height<=720]/best[ext=mp4]";

/// Raw provider metadata. Every field is optional; normalization into
/// `VideoMetadata` happens in [`crate::metadata`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Seconds; may be fractional
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub view_count: Option<f64>,
    #[serde(default)]
    pub like_count: Option<f64>,
    #[serde(default)]
    pub comment_count: Option<f64>,
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Constraints for a bounded download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Stop after this many seconds of media
    pub max_duration_secs: u32,
    /// yt-dlp format selector
    pub format: String,
}

impl DownloadOptions {
    pub fn new(max_duration_secs: u32) -> Self {
        Self {
            max_duration_secs,
            format: DEFAULT_SAMPLE_FORMAT.to_string(),
        }
    }
}

/// The external media-info/download provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Fetch metadata for a video without downloading it.
    async fn extract_info(&self, url: &str) -> MediaResult<VideoInfo>;

    /// Download at most `options.max_duration_secs` of media into `target`.
    async fn download(
        &self,
        url: &str,
        target: &Path,
        options: &DownloadOptions,
    ) -> MediaResult<()>;
}
