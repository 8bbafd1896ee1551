use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState, types::UserDto};
use crate::models::User;
use crate::services::OauthAssertion;

const SESSION_USER_KEY: &str = "user_id";

/// POST /auth/oauth/callback
///
/// Resolves the provider assertion to a local account and signs the session
/// in as that account. A session that is already signed in makes this the
/// account-linking flow.
pub async fn oauth_callback(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(assertion): Json<OauthAssertion>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    if assertion.provider.is_empty() || assertion.uid.is_empty() {
        return Err(ApiError::validation("provider and uid are required"));
    }

    let current = current_user(&session, &state).await?;

    let user = state
        .shared
        .identity
        .resolve_oauth(&assertion, current.as_ref())
        .await?;

    session
        .insert(SESSION_USER_KEY, user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!("Signed in user {} via {}", user.id, assertion.provider);

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

/// GET /auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = require_user(&session, &state).await?;
    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    (StatusCode::OK, "Logged out")
}

/// The signed-in account for this session, if any.
pub(crate) async fn current_user(
    session: &Session,
    state: &AppState,
) -> Result<Option<User>, ApiError> {
    let user_id: Option<i32> = session
        .get(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    match user_id {
        Some(id) => Ok(state
            .shared
            .store
            .get_user(id)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to load user: {e}")))?),
        None => Ok(None),
    }
}

pub(crate) async fn require_user(session: &Session, state: &AppState) -> Result<User, ApiError> {
    current_user(session, state)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))
}
