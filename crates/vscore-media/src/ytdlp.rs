//! yt-dlp backed media provider.
//!
//! Metadata comes from `--dump-single-json`; samples are fetched with
//! `--download-sections` so only the requested leading window is transferred.

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{MediaError, MediaResult};
use crate::provider::{DownloadOptions, MediaProvider, VideoInfo};

/// Minimum size for a valid cookies file (bytes).
/// A real Netscape cookies file is at least ~50 bytes.
const MIN_COOKIES_FILE_SIZE: u64 = 50;

/// yt-dlp configuration.
#[derive(Debug, Clone)]
pub struct YtDlpConfig {
    /// Binary name or path
    pub binary: String,
    /// Optional Netscape cookies file for authenticated extraction
    pub cookies_path: Option<PathBuf>,
    /// Upper bound for a single yt-dlp invocation
    pub timeout: Duration,
}

impl Default for YtDlpConfig {
    fn default() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
            cookies_path: None,
            timeout: Duration::from_secs(300),
        }
    }
}

impl YtDlpConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            binary: std::env::var("YTDLP_PATH").unwrap_or_else(|_| "yt-dlp".to_string()),
            cookies_path: std::env::var("YTDLP_COOKIES_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            timeout: Duration::from_secs(
                std::env::var("YTDLP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
        }
    }
}

/// Handle to the yt-dlp binary.
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
    config: YtDlpConfig,
}

impl YtDlp {
    /// Locate the binary and build a handle.
    pub fn new(config: YtDlpConfig) -> MediaResult<Self> {
        let binary = which::which(&config.binary)
            .map_err(|_| MediaError::YtDlpNotFound(config.binary.clone()))?;
        debug!(binary = %binary.display(), "Using yt-dlp");

        Ok(Self { binary, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> MediaResult<Self> {
        Self::new(YtDlpConfig::from_env())
    }

    /// Cookie arguments, if a usable cookies file is configured.
    async fn cookies_args(&self) -> Vec<String> {
        let Some(path) = self.config.cookies_path.as_deref() else {
            return Vec::new();
        };

        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.len() >= MIN_COOKIES_FILE_SIZE => {}
            Ok(meta) => {
                debug!(
                    "Cookies file {} is too small ({} bytes), skipping",
                    path.display(),
                    meta.len()
                );
                return Vec::new();
            }
            Err(e) => {
                debug!("Cookies file {} unavailable: {}", path.display(), e);
                return Vec::new();
            }
        }

        match tokio::fs::read_to_string(path).await {
            Ok(content) if is_valid_netscape_cookies(&content) => {
                vec!["--cookies".to_string(), path.to_string_lossy().into_owned()]
            }
            Ok(_) => {
                debug!(
                    "Cookies file {} is not in valid Netscape format, skipping",
                    path.display()
                );
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to read cookies file: {}", e);
                Vec::new()
            }
        }
    }

    /// Run yt-dlp with the given arguments, bounded by the configured timeout.
    async fn run(&self, args: &[String]) -> MediaResult<Output> {
        debug!(args = ?args, "Running yt-dlp");

        let child = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(self.config.timeout, child).await {
            Ok(output) => Ok(output?),
            Err(_) => Err(MediaError::Timeout(self.config.timeout.as_secs())),
        }
    }
}

#[async_trait]
impl MediaProvider for YtDlp {
    async fn extract_info(&self, url: &str) -> MediaResult<VideoInfo> {
        info!(url = url, "Extracting video metadata with yt-dlp");

        let mut args: Vec<String> = [
            "--dump-single-json",
            "--no-playlist",
            "--skip-download",
            "--no-warnings",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        args.extend(self.cookies_args().await);
        args.push(url.to_string());

        let output = self.run(&args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);
            warn_if_rate_limited(url, &stderr);
            return Err(MediaError::extraction_failed(format!(
                "yt-dlp failed: {}",
                last_line(&stderr)
            )));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }

    async fn download(
        &self,
        url: &str,
        target: &Path,
        options: &DownloadOptions,
    ) -> MediaResult<()> {
        info!(
            url = url,
            output = %target.display(),
            max_duration = options.max_duration_secs,
            "Downloading video sample with yt-dlp"
        );

        let mut args: Vec<String> = vec![
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--force-overwrites".to_string(),
            "--no-part".to_string(),
            "--download-sections".to_string(),
            section_arg(options.max_duration_secs),
            "-f".to_string(),
            options.format.clone(),
            "-o".to_string(),
            target.to_string_lossy().into_owned(),
        ];
        args.extend(self.cookies_args().await);
        args.push(url.to_string());

        let output = self.run(&args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp sample download stderr: {}", stderr);
            warn_if_rate_limited(url, &stderr);
            return Err(MediaError::download_failed(format!(
                "yt-dlp failed: {}",
                last_line(&stderr)
            )));
        }

        Ok(())
    }
}

/// `--download-sections` value covering the first `max_duration_secs` seconds.
fn section_arg(max_duration_secs: u32) -> String {
    format!("*0-{}", max_duration_secs)
}

fn last_line(stderr: &str) -> &str {
    stderr
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("Unknown error")
}

fn warn_if_rate_limited(url: &str, stderr: &str) {
    let is_rate_limited = stderr.contains("429")
        || stderr.contains("Too Many Requests")
        || stderr.contains("rate limit")
        || stderr.contains("Sign in to confirm");

    if is_rate_limited {
        warn!(url = %url, "YouTube rate limit detected");
    }
}

/// Validate that a cookies file appears to be in Netscape format.
///
/// Netscape cookies files either start with "# Netscape HTTP Cookie File"
/// or contain tab-separated lines with domain entries.
fn is_valid_netscape_cookies(content: &str) -> bool {
    if content.starts_with("# Netscape HTTP Cookie File")
        || content.starts_with("# HTTP Cookie File")
    {
        return true;
    }

    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .any(|line| line.split('\t').count() >= 6)
}
