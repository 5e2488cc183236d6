//! Utility functions for URL parsing and validation.
//!
//! Video identifiers are pulled out of user-supplied URLs with an ordered list
//! of patterns. Order is significant: short links, canonical watch URLs and
//! embeds can overlap inside a single string, and the first pattern that
//! matches wins.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Identifier patterns, highest priority first. Capture group 1 is the ID.
const ID_PATTERNS: &[&str] = &[
    r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)",
    r"youtube\.com/v/([^&\n?#]+)",
    r"youtube\.com/shorts/([^&\n?#/]+)",
];

static COMPILED_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

fn patterns() -> &'static [Regex] {
    COMPILED_PATTERNS.get_or_init(|| {
        ID_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("identifier pattern must compile"))
            .collect()
    })
}

/// Errors raised when a request URL cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    /// No URL was supplied, or it was blank
    #[error("URL is required")]
    MissingUrl,
    /// The URL does not contain a recognisable video identifier
    #[error("Invalid YouTube URL")]
    InvalidUrl,
}

/// Result type for URL validation.
pub type UrlResult<T> = Result<T, UrlError>;

/// Extract the video identifier from a URL.
///
/// Supported shapes:
/// - https://youtube.com/watch?v=VIDEO_ID
/// - https://youtu.be/VIDEO_ID
/// - https://youtube.com/embed/VIDEO_ID
/// - https://youtube.com/v/VIDEO_ID
/// - https://youtube.com/shorts/VIDEO_ID
///
/// Returns the capture of the first pattern that matches anywhere in the
/// string, or `None` when no pattern matches. The identifier is not
/// length-checked; the provider is the authority on whether it exists.
pub fn extract_video_id(url: &str) -> Option<String> {
    let url = url.trim();

    patterns()
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Validate a possibly-missing request URL and return it with its identifier.
pub fn validate_url(url: Option<&str>) -> UrlResult<(String, String)> {
    let url = url.map(str::trim).unwrap_or_default();
    if url.is_empty() {
        return Err(UrlError::MissingUrl);
    }

    let id = extract_video_id(url).ok_or(UrlError::InvalidUrl)?;
    Ok((url.to_string(), id))
}
