//! yt-dlp wrapper for video metadata and media sampling.
//!
//! This crate provides:
//! - The `MediaProvider` capability (info extraction + bounded download)
//! - A `YtDlp` implementation spawning the yt-dlp binary
//! - Metadata fetching with zero-value defaults for sparse responses
//! - Best-effort sampling of the first seconds of a video into a temp file

pub mod error;
pub mod metadata;
pub mod provider;
pub mod sampler;
pub mod ytdlp;

pub use error::{MediaError, MediaResult};
pub use metadata::fetch_metadata;
pub use provider::{DownloadOptions, MediaProvider, VideoInfo, DEFAULT_SAMPLE_FORMAT};
pub use sampler::{MediaSample, SegmentSampler, DEFAULT_SAMPLE_DURATION_SECS};
pub use ytdlp::{YtDlp, YtDlpConfig};
