use axum::{Json, extract::State};
use std::sync::Arc;

use super::types::StatusResponse;
use super::{ApiError, ApiResponse, AppState};

/// GET /system/status
pub async fn status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<StatusResponse>>, ApiError> {
    let database = match state.shared.store.ping().await {
        Ok(()) => "ok".to_string(),
        Err(e) => format!("error: {e}"),
    };

    Ok(Json(ApiResponse::success(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        database,
    })))
}
