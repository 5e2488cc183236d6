//! Shared data models for the VScore backend.
//!
//! This crate provides Serde-serializable types for:
//! - Video metadata snapshots returned by the media-info provider
//! - Analysis reports (genuine and fallback) produced by the remote scorer
//! - The request/response shapes exchanged with the HTTP front end
//! - Video identifier extraction from user-supplied URLs

pub mod report;
pub mod request;
pub mod utils;
pub mod video;

// Re-export common types
pub use report::{
    AnalysisReport, Improvement, Priority, Score, ScoreCategory, FALLBACK_ERROR_MESSAGE,
};
pub use request::{AnalyzeRequest, AnalyzeResponse};
pub use utils::{extract_video_id, validate_url, UrlError, UrlResult};
pub use video::VideoMetadata;
