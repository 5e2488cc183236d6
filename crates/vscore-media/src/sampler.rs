//! Best-effort media sampling.
//!
//! A sample is the leading window of a video written to a uniquely named
//! temporary file. Sampling never fails the request: any problem is logged
//! and reported as `None`, which only disables media-based analysis.

use std::io;
use std::path::{Path, PathBuf};

use metrics::counter;
use tracing::{debug, info, warn};

use crate::error::{MediaError, MediaResult};
use crate::provider::{DownloadOptions, MediaProvider};

/// Default sample window in seconds.
pub const DEFAULT_SAMPLE_DURATION_SECS: u32 = 60;

const SAMPLE_PREFIX: &str = "vscore-";
const SAMPLE_SUFFIX: &str = ".mp4";

/// A local media file handed from the sampler to the analyzer.
///
/// The holder is responsible for calling [`MediaSample::remove`] (or
/// [`MediaSample::remove_blocking`] where it cannot await); the file is not
/// deleted on drop.
#[derive(Debug, PartialEq, Eq)]
pub struct MediaSample {
    path: PathBuf,
}

impl MediaSample {
    /// Wrap an existing file.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file is still on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// File size in bytes.
    pub async fn size(&self) -> MediaResult<u64> {
        Ok(tokio::fs::metadata(&self.path).await?.len())
    }

    /// Delete the file. Returns `Ok(false)` if it was already gone.
    pub async fn remove(&self) -> io::Result<bool> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Synchronous [`MediaSample::remove`], for `Drop` paths.
    pub fn remove_blocking(&self) -> io::Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Produces media samples in a temp directory.
#[derive(Debug, Clone)]
pub struct SegmentSampler {
    temp_dir: PathBuf,
}

impl Default for SegmentSampler {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

impl SegmentSampler {
    pub fn new(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
        }
    }

    /// Create from environment variables (`SAMPLE_DIR`, default system temp).
    pub fn from_env() -> Self {
        std::env::var("SAMPLE_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Download at most `max_duration_secs` of `url` into a fresh temp file.
    ///
    /// Returns `None` on any failure; in that case no file is left behind.
    pub async fn sample<P>(
        &self,
        provider: &P,
        url: &str,
        max_duration_secs: u32,
    ) -> Option<MediaSample>
    where
        P: MediaProvider + ?Sized,
    {
        let sample = match self.reserve() {
            Ok(sample) => sample,
            Err(e) => {
                warn!(error = %e, dir = %self.temp_dir.display(), "Could not allocate sample file");
                counter!("vscore_samples_total", "outcome" => "failed").increment(1);
                return None;
            }
        };

        match self.fill(provider, url, max_duration_secs, &sample).await {
            Ok(size) => {
                info!(
                    output = %sample.path().display(),
                    size_mb = size as f64 / (1024.0 * 1024.0),
                    "Downloaded video sample"
                );
                counter!("vscore_samples_total", "outcome" => "ok").increment(1);
                Some(sample)
            }
            Err(e) => {
                warn!(url = url, error = %e, "Error downloading video sample");
                if let Err(e) = sample.remove().await {
                    warn!(path = %sample.path().display(), error = %e, "Failed to remove partial sample");
                }
                counter!("vscore_samples_total", "outcome" => "failed").increment(1);
                None
            }
        }
    }

    /// Reserve a uniquely named file in the temp directory.
    fn reserve(&self) -> MediaResult<MediaSample> {
        let path = tempfile::Builder::new()
            .prefix(SAMPLE_PREFIX)
            .suffix(SAMPLE_SUFFIX)
            .tempfile_in(&self.temp_dir)?
            .into_temp_path()
            .keep()
            .map_err(|e| MediaError::Io(e.error))?;

        debug!(path = %path.display(), "Reserved sample file");
        Ok(MediaSample::from_path(path))
    }

    async fn fill<P>(
        &self,
        provider: &P,
        url: &str,
        max_duration_secs: u32,
        sample: &MediaSample,
    ) -> MediaResult<u64>
    where
        P: MediaProvider + ?Sized,
    {
        let options = DownloadOptions::new(max_duration_secs);
        provider.download(url, sample.path(), &options).await?;

        match sample.size().await {
            Ok(size) if size > 0 => Ok(size),
            _ => Err(MediaError::EmptyOutput(sample.path().to_path_buf())),
        }
    }
}
