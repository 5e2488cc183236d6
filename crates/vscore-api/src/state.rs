//! Application state.

use std::sync::Arc;

use tracing::info;
use vscore_analysis::{
    AnalysisPipeline, Analyzer, AnalyzerConfig, GeminiClient, MediaAnalysisService, PipelineConfig,
};
use vscore_media::{MediaProvider, SegmentSampler, YtDlp};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub pipeline: Arc<AnalysisPipeline>,
}

impl AppState {
    pub fn new(config: ApiConfig, pipeline: AnalysisPipeline) -> Self {
        Self {
            config,
            pipeline: Arc::new(pipeline),
        }
    }

    /// Build the production pipeline from environment variables.
    ///
    /// Fails if `GEMINI_API_KEY` is missing or yt-dlp cannot be found.
    pub fn from_env(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let provider: Arc<dyn MediaProvider> = Arc::new(YtDlp::from_env()?);
        let gemini = GeminiClient::from_env()?;
        let sampler = SegmentSampler::from_env();
        let analyzer_config = AnalyzerConfig::from_env();
        let pipeline_config = PipelineConfig::from_env();

        info!(
            model = gemini.model(),
            sample_dir = %sampler.temp_dir().display(),
            sample_secs = pipeline_config.sample_max_duration_secs,
            max_polls = analyzer_config.max_polls,
            "Analysis pipeline configured"
        );

        let service: Arc<dyn MediaAnalysisService> = Arc::new(gemini);
        let pipeline = AnalysisPipeline::new(
            provider,
            sampler,
            Analyzer::new(service, analyzer_config),
            pipeline_config,
        );

        Ok(Self::new(config, pipeline))
    }
}
