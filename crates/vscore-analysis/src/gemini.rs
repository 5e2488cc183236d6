//! Gemini REST client.
//!
//! Uses the File API for media (resumable upload, state polling, delete) and
//! `generateContent` for the analysis itself.

use std::path::Path;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::GeminiConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::service::{MediaAnalysisService, RemoteFile};

const API_KEY_HEADER: &str = "x-goog-api-key";
const UPLOAD_URL_HEADER: &str = "x-goog-upload-url";

/// Gemini API client.
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

/// Gemini API request.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    File {
        #[serde(rename = "fileData")]
        file_data: FileData,
    },
}

#[derive(Debug, Serialize)]
struct FileData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    #[serde(rename = "fileUri")]
    file_uri: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Body of a finalized upload.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: RemoteFile,
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(config: GeminiConfig) -> AnalysisResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { config, client })
    }

    /// Create from environment variables. Fails without `GEMINI_API_KEY`.
    pub fn from_env() -> AnalysisResult<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn file_url(&self, name: &str) -> String {
        format!("{}/v1beta/{}", self.config.base_url, name)
    }
}

#[async_trait]
impl MediaAnalysisService for GeminiClient {
    async fn upload(&self, path: &Path) -> AnalysisResult<RemoteFile> {
        let bytes = tokio::fs::read(path).await?;
        let mime_type = mime_type_for(path);
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sample".to_string());

        info!(
            file = %display_name,
            size_bytes = bytes.len(),
            mime_type = mime_type,
            "Uploading media to Gemini"
        );

        let start = self
            .client
            .post(format!("{}/upload/v1beta/files", self.config.base_url))
            .header(API_KEY_HEADER, &self.config.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", bytes.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&serde_json::json!({ "file": { "display_name": display_name } }))
            .send()
            .await?;
        let start = ensure_success(start).await?;

        let upload_url = start
            .headers()
            .get(UPLOAD_URL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| AnalysisError::protocol("upload start returned no upload URL"))?;

        let finish = self
            .client
            .post(&upload_url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(bytes)
            .send()
            .await?;
        let uploaded: UploadResponse = ensure_success(finish).await?.json().await?;

        debug!(name = %uploaded.file.name, state = %uploaded.file.state, "Upload finalized");
        Ok(uploaded.file)
    }

    async fn get_file(&self, name: &str) -> AnalysisResult<RemoteFile> {
        let response = self
            .client
            .get(self.file_url(name))
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await?;

        Ok(ensure_success(response).await?.json().await?)
    }

    async fn generate(&self, prompt: &str, file: Option<&RemoteFile>) -> AnalysisResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        let mut parts = vec![Part::Text {
            text: prompt.to_string(),
        }];
        if let Some(file) = file {
            parts.push(Part::File {
                file_data: FileData {
                    mime_type: file.mime_type.clone(),
                    file_uri: file.uri.clone(),
                },
            });
        }

        let request = GeminiRequest {
            contents: vec![Content { role: "user", parts }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        info!(model = %self.config.model, with_media = file.is_some(), "Calling Gemini generateContent");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request)
            .send()
            .await?;
        let gemini_response: GeminiResponse = ensure_success(response).await?.json().await?;

        let text: String = gemini_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AnalysisError::protocol("No content in Gemini response"));
        }
        Ok(text)
    }

    async fn delete(&self, name: &str) -> AnalysisResult<()> {
        let response = self
            .client
            .delete(self.file_url(name))
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await?;

        ensure_success(response).await?;
        debug!(name = name, "Deleted remote file");
        Ok(())
    }
}

/// Map non-2xx responses to `AnalysisError::Api`.
async fn ensure_success(response: Response) -> AnalysisResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AnalysisError::api(status.as_u16(), body))
}

/// MIME type for an upload, by file extension.
fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("webm") => "video/webm",
        Some("mov") => "video/quicktime",
        Some("mkv") => "video/x-matroska",
        // samples are written as mp4
        _ => "video/mp4",
    }
}
