use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::{current_user, require_user};
use super::types::{
    CatalogParams, SubmitTranslationRequest, TranslationDto, VideoDetailDto, VideoDto,
};
use super::{ApiError, ApiResponse, AppState};
use crate::domain::{TranslationId, UserId, VideoId, VideoStatus};
use crate::services::{CatalogQuery, ImportOutcome, ImportRow};

fn parse_catalog_query(params: &CatalogParams) -> Result<CatalogQuery, ApiError> {
    let statuses = match &params.statuses {
        Some(raw) => {
            let mut parsed = Vec::new();
            for status in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                parsed.push(status.parse::<VideoStatus>().map_err(|e| ApiError::validation(e))?);
            }
            Some(parsed)
        }
        None => None,
    };

    let subjects = params.subjects.as_ref().map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    });

    Ok(CatalogQuery {
        search: params.search.clone(),
        statuses,
        subjects,
    })
}

/// GET /videos?search=&statuses=&subjects=
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CatalogParams>,
) -> Result<Json<ApiResponse<Vec<VideoDto>>>, ApiError> {
    let query = parse_catalog_query(&params)?;
    let entries = state.shared.catalog.search(&query).await?;

    Ok(Json(ApiResponse::success(
        entries.into_iter().map(VideoDto::from).collect(),
    )))
}

/// GET /videos/{id}
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<VideoDetailDto>>, ApiError> {
    let viewer = current_user(&session, &state)
        .await?
        .map(|u| UserId::new(u.id));

    let detail = state
        .shared
        .catalog
        .video_detail(VideoId::new(id), viewer)
        .await?;

    Ok(Json(ApiResponse::success(VideoDetailDto::from(detail))))
}

/// POST /videos/{id}/star
pub async fn toggle_star(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<VideoDto>>, ApiError> {
    let actor = require_user(&session, &state).await?;

    let video = state
        .shared
        .catalog
        .toggle_star(VideoId::new(id), &actor)
        .await?;

    let translations = state
        .shared
        .store
        .translations_for_video(video.id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    let status = crate::services::translation_state::video_status(&translations);

    Ok(Json(ApiResponse::success(VideoDto::new(video, status))))
}

/// POST /videos/import
pub async fn import_videos(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(rows): Json<Vec<ImportRow>>,
) -> Result<Json<ApiResponse<ImportOutcome>>, ApiError> {
    let actor = require_user(&session, &state).await?;

    let outcome = state.shared.import.import(&rows, &actor).await?;
    Ok(Json(ApiResponse::success(outcome)))
}

/// POST /videos/{id}/translations
pub async fn submit_translation(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<SubmitTranslationRequest>,
) -> Result<Json<ApiResponse<TranslationDto>>, ApiError> {
    let actor = require_user(&session, &state).await?;

    let translation = state
        .shared
        .catalog
        .record_translation(VideoId::new(id), &actor, payload.reviewer)
        .await?;

    Ok(Json(ApiResponse::success(TranslationDto::from(translation))))
}

/// PUT /translations/{id}/reviewed
pub async fn mark_reviewed(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TranslationDto>>, ApiError> {
    let actor = require_user(&session, &state).await?;

    let translation = state
        .shared
        .catalog
        .mark_reviewed(TranslationId::new(id), &actor)
        .await?;

    Ok(Json(ApiResponse::success(TranslationDto::from(translation))))
}

/// GET /catalog/subjects — distinct subjects present, for the filter UI.
pub async fn subjects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let subjects = state.shared.catalog.all_subjects().await?;
    Ok(Json(ApiResponse::success(subjects)))
}

/// GET /catalog/statuses — the fixed status vocabulary.
pub async fn statuses(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<&'static str>>> {
    let statuses = state
        .shared
        .catalog
        .statuses()
        .iter()
        .map(VideoStatus::as_str)
        .collect();
    Json(ApiResponse::success(statuses))
}
