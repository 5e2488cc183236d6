//! Remote analysis orchestration.
//!
//! One analysis is a small state machine:
//!
//! ```text
//! Uploading -> Polling -> Generating -> Parsing -> Done
//!     |           |            |           |
//!     +-----------+------------+-----------+----> Failed
//! ```
//!
//! `Uploading` skips straight to `Generating` when there is no media sample.
//! Whatever the terminal state, cleanup runs exactly once afterwards: the
//! local sample is removed and any uploaded remote file is deleted. If the
//! analysis future is dropped or a stage panics first, a scope guard performs
//! the same cleanup, spawning the remote delete onto the runtime.

use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use scopeguard::ScopeGuard;
use tracing::{debug, error, info, warn, Instrument};
use vscore_media::MediaSample;
use vscore_models::{AnalysisReport, VideoMetadata};

use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::parse::parse_report;
use crate::prompt::build_prompt;
use crate::service::{FileState, MediaAnalysisService, RemoteFile};

/// A step of one analysis.
#[derive(Debug)]
pub enum Stage {
    Uploading,
    Polling { file: RemoteFile, polls: u32 },
    Generating { file: Option<RemoteFile> },
    Parsing { text: String },
    Done(AnalysisReport),
    Failed(AnalysisError),
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Uploading => "uploading",
            Stage::Polling { .. } => "polling",
            Stage::Generating { .. } => "generating",
            Stage::Parsing { .. } => "parsing",
            Stage::Done(_) => "done",
            Stage::Failed(_) => "failed",
        }
    }
}

/// Resources held by one analysis until cleanup.
#[derive(Debug, Default)]
struct Held {
    sample: Option<MediaSample>,
    /// Name of the uploaded remote file, once an upload succeeds
    uploaded: Option<String>,
}

/// Drives the remote analysis lifecycle. Never fails: any error becomes the
/// fallback report.
#[derive(Clone)]
pub struct Analyzer {
    service: Arc<dyn MediaAnalysisService>,
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(service: Arc<dyn MediaAnalysisService>, config: AnalyzerConfig) -> Self {
        Self { service, config }
    }

    /// Analyze a video, optionally grounded on a media sample.
    ///
    /// The sample is consumed: it is deleted from disk before this returns,
    /// or when the returned future is dropped.
    pub async fn analyze(
        &self,
        metadata: &VideoMetadata,
        sample: Option<MediaSample>,
    ) -> AnalysisReport {
        let started = Instant::now();

        let service = self.service.clone();
        let mut held = scopeguard::guard(
            Held {
                sample,
                uploaded: None,
            },
            move |held| release_abandoned(service, held),
        );

        let outcome = self.drive(metadata, &mut held).await;

        self.cleanup(ScopeGuard::into_inner(held)).await;
        histogram!("vscore_analysis_duration_seconds").record(started.elapsed().as_secs_f64());

        match outcome {
            Ok(report) => {
                info!(
                    video_id = %metadata.video_id,
                    overall_score = report.overall_score.value(),
                    "Analysis complete"
                );
                counter!("vscore_analyses_total", "outcome" => "ok").increment(1);
                report
            }
            Err(e) => {
                error!(video_id = %metadata.video_id, error = %e, "Error analyzing with Gemini");
                counter!("vscore_analyses_total", "outcome" => "fallback", "reason" => e.kind())
                    .increment(1);
                AnalysisReport::fallback()
            }
        }
    }

    /// Run stages until a terminal one.
    async fn drive(
        &self,
        metadata: &VideoMetadata,
        held: &mut Held,
    ) -> Result<AnalysisReport, AnalysisError> {
        let mut stage = Stage::Uploading;
        loop {
            stage = match stage {
                Stage::Done(report) => return Ok(report),
                Stage::Failed(e) => return Err(e),
                active => {
                    debug!(video_id = %metadata.video_id, stage = active.name(), "Analysis stage");
                    self.step(active, metadata, held).await
                }
            };
        }
    }

    /// Advance one stage.
    async fn step(&self, stage: Stage, metadata: &VideoMetadata, held: &mut Held) -> Stage {
        match stage {
            Stage::Uploading => {
                let Some(sample) = held.sample.as_ref().filter(|s| s.exists()) else {
                    return Stage::Generating { file: None };
                };
                match self.service.upload(sample.path()).await {
                    Ok(file) => {
                        info!(name = %file.name, state = %file.state, "Uploaded video sample");
                        held.uploaded = Some(file.name.clone());
                        Stage::Polling { file, polls: 0 }
                    }
                    Err(e) => Stage::Failed(e),
                }
            }

            Stage::Polling { file, polls } => match file.state {
                FileState::Ready => Stage::Generating { file: Some(file) },
                FileState::Failed => Stage::Failed(AnalysisError::RemoteProcessingFailed(file.name)),
                FileState::Processing if polls >= self.config.max_polls => {
                    Stage::Failed(AnalysisError::PollTimeout {
                        name: file.name,
                        polls,
                    })
                }
                FileState::Processing => {
                    tokio::time::sleep(self.config.poll_interval).await;
                    counter!("vscore_remote_polls_total").increment(1);
                    match self.service.get_file(&file.name).await {
                        Ok(next) => Stage::Polling {
                            file: next,
                            polls: polls + 1,
                        },
                        Err(e) => Stage::Failed(e),
                    }
                }
            },

            Stage::Generating { file } => {
                let prompt = build_prompt(metadata);
                match self.service.generate(&prompt, file.as_ref()).await {
                    Ok(text) => Stage::Parsing { text },
                    Err(e) => Stage::Failed(e),
                }
            }

            Stage::Parsing { text } => match parse_report(&text) {
                Ok(report) => Stage::Done(report),
                Err(e) => {
                    debug!(response = %text, "Unparseable analysis response");
                    Stage::Failed(e)
                }
            },

            terminal => terminal,
        }
    }

    /// Release local and remote resources. Failures are logged, never raised.
    async fn cleanup(&self, held: Held) {
        if let Some(sample) = held.sample {
            match sample.remove().await {
                Ok(true) => debug!(path = %sample.path().display(), "Removed video sample"),
                Ok(false) => {}
                Err(e) => warn!(path = %sample.path().display(), error = %e, "Failed to remove video sample"),
            }
        }

        if let Some(name) = held.uploaded {
            if let Err(e) = self.service.delete(&name).await {
                warn!(name = %name, error = %e, "Failed to delete remote file");
            }
        }
    }
}

/// Cleanup for an analysis that never reached [`Analyzer::cleanup`].
///
/// Runs inside `Drop`, so the sample is removed synchronously and the remote
/// delete is handed to the current runtime.
fn release_abandoned(service: Arc<dyn MediaAnalysisService>, held: Held) {
    counter!("vscore_analyses_total", "outcome" => "abandoned").increment(1);

    if let Some(sample) = &held.sample {
        if let Err(e) = sample.remove_blocking() {
            warn!(path = %sample.path().display(), error = %e, "Failed to remove abandoned sample");
        }
    }

    let Some(name) = held.uploaded else {
        return;
    };
    match tokio::runtime::Handle::try_current() {
        Ok(runtime) => {
            warn!(name = %name, "Analysis abandoned, deleting remote file");
            runtime.spawn(
                async move {
                    if let Err(e) = service.delete(&name).await {
                        warn!(name = %name, error = %e, "Failed to delete remote file");
                    }
                }
                .in_current_span(),
            );
        }
        Err(_) => warn!(name = %name, "No runtime to delete abandoned remote file"),
    }
}
