//! Counting fakes shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use vscore_analysis::{
    AnalysisError, AnalysisResult, Analyzer, AnalyzerConfig, FileState, MediaAnalysisService,
    RemoteFile,
};
use vscore_media::{DownloadOptions, MediaError, MediaProvider, MediaResult, VideoInfo};

pub const REPORT_JSON: &str = r#"{
    "overall_score": 74,
    "scores": {"thumbnail": 70, "title": 82, "description": 60, "tags": 45, "engagement": 88, "seo": 71},
    "improvements": [
        {"category": "tags", "priority": "high", "suggestion": "Add specific tags", "impact": "Better discovery"},
        {"category": "description", "priority": "medium", "suggestion": "Add timestamps", "impact": "Higher retention"}
    ],
    "viral_potential": 58,
    "strengths": ["Clear title"],
    "weaknesses": ["Sparse tags"]
}"#;

/// Everything the fake service observed.
#[derive(Debug, Default, Clone)]
pub struct Calls {
    pub upload_attempts: usize,
    /// Successful uploads only
    pub uploads: usize,
    pub polls: usize,
    pub generates: usize,
    /// Generations that returned, after any delay
    pub answers: usize,
    pub deletes: usize,
    pub upload_at: Option<Instant>,
    pub poll_times: Vec<Instant>,
    pub uploaded_paths: Vec<PathBuf>,
    pub deleted: Vec<String>,
    pub generated_with: Vec<Option<String>>,
    pub prompts: Vec<String>,
}

/// Scripted remote analysis service.
#[derive(Debug)]
pub struct FakeService {
    upload_state: Option<FileState>,
    poll_states: Mutex<VecDeque<FileState>>,
    fail_poll: bool,
    response: Option<String>,
    generate_delay: Option<Duration>,
    fail_delete: bool,
    calls: Mutex<Calls>,
}

impl FakeService {
    /// Uploads succeed in `Ready` state and generation returns `response`.
    pub fn responding(response: &str) -> Self {
        Self {
            upload_state: Some(FileState::Ready),
            poll_states: Mutex::new(VecDeque::new()),
            fail_poll: false,
            response: Some(response.to_string()),
            generate_delay: None,
            fail_delete: false,
            calls: Mutex::new(Calls::default()),
        }
    }

    pub fn upload_state(mut self, state: FileState) -> Self {
        self.upload_state = Some(state);
        self
    }

    pub fn failing_upload(mut self) -> Self {
        self.upload_state = None;
        self
    }

    /// States returned by successive polls; once exhausted, polls keep
    /// returning `Processing`.
    pub fn poll_states(self, states: impl IntoIterator<Item = FileState>) -> Self {
        *self.poll_states.lock().unwrap() = states.into_iter().collect();
        self
    }

    pub fn failing_poll(mut self) -> Self {
        self.fail_poll = true;
        self
    }

    /// Generation sleeps for `delay` before answering.
    pub fn slow_generate(mut self, delay: Duration) -> Self {
        self.generate_delay = Some(delay);
        self
    }

    pub fn failing_generate(mut self) -> Self {
        self.response = None;
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaAnalysisService for FakeService {
    async fn upload(&self, path: &Path) -> AnalysisResult<RemoteFile> {
        let mut calls = self.calls.lock().unwrap();
        calls.upload_attempts += 1;
        calls.upload_at = Some(Instant::now());
        calls.uploaded_paths.push(path.to_path_buf());

        let Some(state) = self.upload_state else {
            return Err(AnalysisError::api(503, "upload unavailable"));
        };
        calls.uploads += 1;
        Ok(RemoteFile {
            name: format!("files/fake-{}", calls.uploads),
            uri: format!("https://fake.test/files/fake-{}", calls.uploads),
            mime_type: "video/mp4".to_string(),
            state,
        })
    }

    async fn get_file(&self, name: &str) -> AnalysisResult<RemoteFile> {
        let mut calls = self.calls.lock().unwrap();
        calls.polls += 1;
        calls.poll_times.push(Instant::now());

        if self.fail_poll {
            return Err(AnalysisError::api(503, "file lookup unavailable"));
        }
        let state = self
            .poll_states
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(FileState::Processing);
        Ok(RemoteFile {
            name: name.to_string(),
            uri: format!("https://fake.test/{name}"),
            mime_type: "video/mp4".to_string(),
            state,
        })
    }

    async fn generate(&self, prompt: &str, file: Option<&RemoteFile>) -> AnalysisResult<String> {
        {
            let mut calls = self.calls.lock().unwrap();
            calls.generates += 1;
            calls.prompts.push(prompt.to_string());
            calls.generated_with.push(file.map(|f| f.name.clone()));
        }

        if let Some(delay) = self.generate_delay {
            tokio::time::sleep(delay).await;
        }
        self.calls.lock().unwrap().answers += 1;
        self.response
            .clone()
            .ok_or_else(|| AnalysisError::api(500, "model overloaded"))
    }

    async fn delete(&self, name: &str) -> AnalysisResult<()> {
        let mut calls = self.calls.lock().unwrap();
        calls.deletes += 1;
        calls.deleted.push(name.to_string());

        if self.fail_delete {
            Err(AnalysisError::api(500, "delete failed"))
        } else {
            Ok(())
        }
    }
}

pub fn analyzer(service: &Arc<FakeService>, config: AnalyzerConfig) -> Analyzer {
    let service: Arc<dyn MediaAnalysisService> = service.clone();
    Analyzer::new(service, config)
}

/// Media provider returning fixed metadata and writing a small file on download.
#[derive(Debug, Default)]
pub struct FakeProvider {
    info: Option<VideoInfo>,
    fail_download: bool,
    calls: Mutex<ProviderCalls>,
}

#[derive(Debug, Default, Clone)]
pub struct ProviderCalls {
    pub extracts: usize,
    pub downloads: usize,
    pub download_options: Vec<DownloadOptions>,
}

impl FakeProvider {
    pub fn with_info(info: VideoInfo) -> Self {
        Self {
            info: Some(info),
            ..Default::default()
        }
    }

    /// Extraction always fails.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn failing_download(mut self) -> Self {
        self.fail_download = true;
        self
    }

    pub fn calls(&self) -> ProviderCalls {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaProvider for FakeProvider {
    async fn extract_info(&self, _url: &str) -> MediaResult<VideoInfo> {
        self.calls.lock().unwrap().extracts += 1;
        self.info
            .clone()
            .ok_or_else(|| MediaError::extraction_failed("ERROR: Video unavailable"))
    }

    async fn download(
        &self,
        _url: &str,
        target: &Path,
        options: &DownloadOptions,
    ) -> MediaResult<()> {
        {
            let mut calls = self.calls.lock().unwrap();
            calls.downloads += 1;
            calls.download_options.push(options.clone());
        }

        if self.fail_download {
            return Err(MediaError::download_failed("Requested format is not available"));
        }
        std::fs::write(target, b"\x00\x00\x00\x18ftypmp42")?;
        Ok(())
    }
}
