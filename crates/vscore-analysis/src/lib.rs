//! Remote video analysis.
//!
//! This crate provides:
//! - The `MediaAnalysisService` capability and its Gemini REST implementation
//! - Prompt construction and tolerant parsing of the generated report
//! - The `Analyzer` state machine (upload, poll, generate, parse, cleanup)
//! - The request-level `AnalysisPipeline` tying metadata, sampling and analysis together

pub mod config;
pub mod error;
pub mod gemini;
pub mod orchestrator;
pub mod parse;
pub mod pipeline;
pub mod prompt;
pub mod service;

pub use config::{AnalyzerConfig, GeminiConfig};
pub use error::{AnalysisError, AnalysisResult};
pub use gemini::GeminiClient;
pub use orchestrator::{Analyzer, Stage};
pub use parse::{parse_report, strip_code_fences};
pub use pipeline::{AnalysisPipeline, PipelineConfig, PipelineError};
pub use prompt::build_prompt;
pub use service::{FileState, MediaAnalysisService, RemoteFile};
