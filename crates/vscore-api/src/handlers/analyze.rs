//! Video analysis handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use tracing::{info_span, Instrument};
use vscore_models::{AnalyzeRequest, AnalyzeResponse};

use crate::error::{ApiError, ApiResult};
use crate::middleware::RequestId;
use crate::state::AppState;

/// `POST /api/analyze`
///
/// Returns metadata plus either a genuine or a fallback report. Only a bad
/// URL or an unprocessable video produce an error response.
pub async fn analyze_video(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let request_id = request_id
        .map(|Extension(id)| id.to_string())
        .unwrap_or_default();
    let span = info_span!("request", request_id = %request_id);

    let response = state.pipeline.run(&request).instrument(span).await?;
    Ok(Json(response))
}
