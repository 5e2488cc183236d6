//! Remote media-analysis capability.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

use crate::error::AnalysisResult;

/// Processing state of an uploaded file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileState {
    #[default]
    Processing,
    Ready,
    Failed,
}

impl FileState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileState::Processing => "PROCESSING",
            FileState::Ready => "READY",
            FileState::Failed => "FAILED",
        }
    }
}

impl<'de> Deserialize<'de> for FileState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "ACTIVE" | "READY" => FileState::Ready,
            "FAILED" => FileState::Failed,
            // PROCESSING, STATE_UNSPECIFIED and anything new keep us polling
            _ => FileState::Processing,
        })
    }
}

impl std::fmt::Display for FileState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to a file held by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    /// Resource name, e.g. `files/abc123`
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub state: FileState,
}

impl RemoteFile {
    pub fn new(name: impl Into<String>, state: FileState) -> Self {
        Self {
            name: name.into(),
            uri: String::new(),
            mime_type: String::new(),
            state,
        }
    }
}

/// The remote generative-analysis service.
///
/// Every successful `upload` must eventually be paired with a `delete`
/// of the same name; the analyzer guarantees this.
#[async_trait]
pub trait MediaAnalysisService: Send + Sync {
    /// Upload a local media file.
    async fn upload(&self, path: &Path) -> AnalysisResult<RemoteFile>;

    /// Re-read the state of an uploaded file.
    async fn get_file(&self, name: &str) -> AnalysisResult<RemoteFile>;

    /// Run the prompt, optionally grounded on an uploaded file, and return
    /// the generated text.
    async fn generate(&self, prompt: &str, file: Option<&RemoteFile>) -> AnalysisResult<String>;

    /// Delete an uploaded file.
    async fn delete(&self, name: &str) -> AnalysisResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_state_wire_values() {
        let parse = |s: &str| serde_json::from_str::<FileState>(&format!("\"{}\"", s)).unwrap();
        assert_eq!(parse("PROCESSING"), FileState::Processing);
        assert_eq!(parse("ACTIVE"), FileState::Ready);
        assert_eq!(parse("READY"), FileState::Ready);
        assert_eq!(parse("FAILED"), FileState::Failed);
        assert_eq!(parse("STATE_UNSPECIFIED"), FileState::Processing);
    }

    #[test]
    fn test_remote_file_from_api_json() {
        let file: RemoteFile = serde_json::from_str(
            r#"{
                "name": "files/abc-123",
                "displayName": "vscore-x.mp4",
                "mimeType": "video/mp4",
                "sizeBytes": "1024",
                "uri": "https://generativelanguage.googleapis.com/v1beta/files/abc-123",
                "state": "ACTIVE"
            }"#,
        )
        .unwrap();

        assert_eq!(file.name, "files/abc-123");
        assert_eq!(file.mime_type, "video/mp4");
        assert_eq!(file.state, FileState::Ready);
    }

    #[test]
    fn test_remote_file_without_state_is_processing() {
        let file: RemoteFile = serde_json::from_str(r#"{"name": "files/x"}"#).unwrap();
        assert_eq!(file, RemoteFile::new("files/x", FileState::Processing));
    }
}
