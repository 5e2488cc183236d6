//! Request-level analysis pipeline.
//!
//! validate URL -> fetch metadata -> (optional) sample -> analyze.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, info_span, Instrument};
use vscore_media::{fetch_metadata, MediaProvider, SegmentSampler, DEFAULT_SAMPLE_DURATION_SECS};
use vscore_models::{
    validate_url, AnalysisReport, AnalyzeRequest, AnalyzeResponse, UrlError, VideoMetadata,
};

use crate::orchestrator::Analyzer;

/// Errors surfaced to the caller. Analysis failures are not among them; they
/// degrade to the fallback report instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] UrlError),

    #[error("Failed to extract video information")]
    Extraction { url: String },
}

impl PipelineError {
    /// Whether the URL itself was rejected, before any provider call.
    pub fn is_input_error(&self) -> bool {
        matches!(self, PipelineError::Input(_))
    }
}

/// Pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Length of the media sample, in seconds
    pub sample_max_duration_secs: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_max_duration_secs: DEFAULT_SAMPLE_DURATION_SECS,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            sample_max_duration_secs: std::env::var("SAMPLE_MAX_DURATION_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_SAMPLE_DURATION_SECS),
        }
    }
}

/// Runs one analysis request end to end.
#[derive(Clone)]
pub struct AnalysisPipeline {
    provider: Arc<dyn MediaProvider>,
    sampler: SegmentSampler,
    analyzer: Analyzer,
    config: PipelineConfig,
}

impl AnalysisPipeline {
    pub fn new(
        provider: Arc<dyn MediaProvider>,
        sampler: SegmentSampler,
        analyzer: Analyzer,
        config: PipelineConfig,
    ) -> Self {
        Self {
            provider,
            sampler,
            analyzer,
            config,
        }
    }

    /// Validate, fetch, sample (when requested) and analyze.
    pub async fn run(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, PipelineError> {
        let (url, video_id) = validate_url(request.url.as_deref())?;

        let span = info_span!("analyze", video_id = %video_id, with_media = request.analyze_video_content);
        async move {
            info!(url = %url, "Analyzing video");

            let video_info = fetch_metadata(self.provider.as_ref(), &url)
                .await
                .ok_or_else(|| PipelineError::Extraction { url: url.clone() })?;

            // Detached so a dropped request still finishes and cleans up
            let worker = self.clone();
            let metadata = video_info.clone();
            let with_media = request.analyze_video_content;
            let task = tokio::spawn(
                async move { worker.sample_and_analyze(&url, &metadata, with_media).await }
                    .in_current_span(),
            );

            let analysis = match task.await {
                Ok(report) => report,
                Err(e) => {
                    error!(error = %e, "Analysis task failed");
                    AnalysisReport::fallback()
                }
            };
            Ok(AnalyzeResponse {
                video_info,
                analysis,
            })
        }
        .instrument(span)
        .await
    }

    async fn sample_and_analyze(
        &self,
        url: &str,
        metadata: &VideoMetadata,
        with_media: bool,
    ) -> AnalysisReport {
        let sample = if with_media {
            self.sampler
                .sample(self.provider.as_ref(), url, self.config.sample_max_duration_secs)
                .await
        } else {
            None
        };

        self.analyzer.analyze(metadata, sample).await
    }
}
