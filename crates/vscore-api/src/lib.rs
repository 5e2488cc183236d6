//! Axum HTTP API server.
//!
//! This crate provides:
//! - `POST /api/analyze` running the analysis pipeline
//! - Health and Prometheus metrics endpoints
//! - CORS, request id, logging, timeout and body-limit layers

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
