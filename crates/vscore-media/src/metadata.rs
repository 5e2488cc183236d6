//! Video metadata fetching.

use tracing::{info, warn};
use vscore_models::{extract_video_id, VideoMetadata};

use crate::provider::{MediaProvider, VideoInfo};

/// Fetch and normalize metadata for `url`.
///
/// Provider failures (network errors, unsupported URLs, private or removed
/// videos) are logged and reported as `None`; they never propagate.
pub async fn fetch_metadata<P>(provider: &P, url: &str) -> Option<VideoMetadata>
where
    P: MediaProvider + ?Sized,
{
    match provider.extract_info(url).await {
        Ok(info) => {
            let metadata = normalize(info, url);
            info!(
                video_id = %metadata.video_id,
                title = %metadata.title,
                duration = metadata.duration,
                "Fetched video metadata"
            );
            Some(metadata)
        }
        Err(e) => {
            warn!(url = url, error = %e, "Error extracting video info");
            None
        }
    }
}

/// Convert a raw provider record, substituting zero values for anything
/// missing or out of range.
fn normalize(info: VideoInfo, url: &str) -> VideoMetadata {
    let video_id = info
        .id
        .filter(|id| !id.is_empty())
        .or_else(|| extract_video_id(url))
        .unwrap_or_default();

    VideoMetadata {
        video_id,
        title: info.title.unwrap_or_default(),
        description: info.description.unwrap_or_default(),
        thumbnail_url: info.thumbnail.unwrap_or_default(),
        duration: non_negative(info.duration),
        view_count: non_negative(info.view_count),
        like_count: non_negative(info.like_count),
        comment_count: non_negative(info.comment_count),
        upload_date: info.upload_date.unwrap_or_default(),
        channel_name: info.uploader.or(info.channel).unwrap_or_default(),
        tags: info.tags.unwrap_or_default(),
    }
}

fn non_negative(value: Option<f64>) -> u64 {
    value
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v.round() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediaError;
    use crate::provider::MockMediaProvider;

    fn full_info() -> VideoInfo {
        VideoInfo {
            id: Some("dQw4w9WgXcQ".to_string()),
            title: Some("Never Gonna Give You Up".to_string()),
            description: Some("Official video".to_string()),
            thumbnail: Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg".to_string()),
            duration: Some(212.0),
            view_count: Some(1_500_000_000.0),
            like_count: Some(17_000_000.0),
            comment_count: Some(2_300_000.0),
            upload_date: Some("20091025".to_string()),
            uploader: Some("Rick Astley".to_string()),
            channel: Some("Rick Astley Channel".to_string()),
            tags: Some(vec!["rick astley".to_string(), "80s".to_string()]),
        }
    }

    #[tokio::test]
    async fn test_fetch_metadata_maps_all_fields() {
        let mut provider = MockMediaProvider::new();
        provider
            .expect_extract_info()
            .times(1)
            .returning(|_| Ok(full_info()));

        let meta = fetch_metadata(&provider, "https://youtu.be/dQw4w9WgXcQ")
            .await
            .unwrap();

        assert_eq!(meta.video_id, "dQw4w9WgXcQ");
        assert_eq!(meta.duration, 212);
        assert_eq!(meta.view_count, 1_500_000_000);
        assert_eq!(meta.channel_name, "Rick Astley");
        assert_eq!(meta.upload_date, "20091025");
        assert_eq!(meta.tags, vec!["rick astley", "80s"]);
    }

    #[tokio::test]
    async fn test_missing_counts_default_to_zero() {
        let mut provider = MockMediaProvider::new();
        provider.expect_extract_info().returning(|_| {
            Ok(VideoInfo {
                view_count: None,
                like_count: None,
                ..full_info()
            })
        });

        let meta = fetch_metadata(&provider, "https://youtu.be/dQw4w9WgXcQ")
            .await
            .unwrap();
        assert_eq!(meta.view_count, 0);
        assert_eq!(meta.like_count, 0);
        assert_eq!(meta.comment_count, 2_300_000);
    }

    #[tokio::test]
    async fn test_empty_record_normalizes_to_defaults() {
        let mut provider = MockMediaProvider::new();
        provider
            .expect_extract_info()
            .returning(|_| Ok(VideoInfo::default()));

        let meta = fetch_metadata(&provider, "https://youtu.be/abc123")
            .await
            .unwrap();
        assert_eq!(meta.video_id, "abc123");
        assert_eq!(
            meta,
            VideoMetadata {
                video_id: "abc123".to_string(),
                ..Default::default()
            }
        );
    }

    #[tokio::test]
    async fn test_channel_falls_back_and_bad_numbers_clamp() {
        let mut provider = MockMediaProvider::new();
        provider.expect_extract_info().returning(|_| {
            Ok(VideoInfo {
                uploader: None,
                duration: Some(59.6),
                view_count: Some(-4.0),
                like_count: Some(f64::NAN),
                ..full_info()
            })
        });

        let meta = fetch_metadata(&provider, "https://youtu.be/dQw4w9WgXcQ")
            .await
            .unwrap();
        assert_eq!(meta.channel_name, "Rick Astley Channel");
        assert_eq!(meta.duration, 60);
        assert_eq!(meta.view_count, 0);
        assert_eq!(meta.like_count, 0);
    }

    #[tokio::test]
    async fn test_provider_failure_yields_none() {
        let mut provider = MockMediaProvider::new();
        provider
            .expect_extract_info()
            .returning(|_| Err(MediaError::extraction_failed("ERROR: Private video")));

        assert!(fetch_metadata(&provider, "https://youtu.be/private1")
            .await
            .is_none());
    }
}
