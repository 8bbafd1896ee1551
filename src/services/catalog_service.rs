//! Domain service for browsing and curating the video catalog.
//!
//! A video's status never exists as a column: search results and detail
//! pages derive it per request through
//! [`translation_state`](super::translation_state).

use serde::Serialize;
use thiserror::Error;

use crate::domain::{TranslationId, UserId, VideoId, VideoStatus};
use crate::models::{Translation, User, Video};

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Video not found: {0}")]
    NotFound(VideoId),

    #[error("Translation not found: {0}")]
    TranslationNotFound(TranslationId),

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Search criteria. Every axis is optional; an absent (or empty) axis
/// imposes no constraint, and supplied axes compose conjunctively.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    /// Case-insensitive substring match against the title.
    pub search: Option<String>,
    /// Inclusive membership over the *derived* status.
    pub statuses: Option<Vec<VideoStatus>>,
    /// Inclusive membership over the subject.
    pub subjects: Option<Vec<String>>,
}

/// One catalog row: the stored video plus its derived status.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub video: Video,
    pub status: VideoStatus,
}

/// Everything a video page shows.
#[derive(Debug, Clone, Serialize)]
pub struct VideoDetail {
    pub video: Video,
    pub status: VideoStatus,
    pub completed_translations: Vec<Translation>,
    /// At most four, first-contribution order.
    pub translators: Vec<User>,
    /// At most four, never overlapping `translators`.
    pub reviewers: Vec<User>,
    /// The viewing user's own primary translation, when signed in.
    pub viewer_translation: Option<Translation>,
}

#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Filters the catalog and returns it starred-first.
    ///
    /// No matches is an empty vec, not an error.
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<CatalogEntry>, CatalogError>;

    /// Assembles the detail page for one video.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id.
    async fn video_detail(
        &self,
        id: VideoId,
        viewer: Option<UserId>,
    ) -> Result<VideoDetail, CatalogError>;

    /// Flips the starred flag and returns the updated video.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Permission`] when the policy denies the actor.
    async fn toggle_star(&self, id: VideoId, actor: &User) -> Result<Video, CatalogError>;

    /// Distinct subjects present in the catalog (data-derived).
    async fn all_subjects(&self) -> Result<Vec<String>, CatalogError>;

    /// The fixed status vocabulary (not data-derived).
    fn statuses(&self) -> &'static [VideoStatus];

    /// Videos the user contributed to that still lack a primary translation.
    async fn untranslated_videos(&self, user: UserId) -> Result<Vec<Video>, CatalogError>;

    /// Videos the user contributed to that have at least one.
    async fn translated_videos(&self, user: UserId) -> Result<Vec<Video>, CatalogError>;

    /// Records (or returns the existing) translation pass for the actor.
    async fn record_translation(
        &self,
        video: VideoId,
        actor: &User,
        reviewer_pass: bool,
    ) -> Result<Translation, CatalogError>;

    /// Marks a primary record as reviewed.
    async fn mark_reviewed(
        &self,
        id: TranslationId,
        actor: &User,
    ) -> Result<Translation, CatalogError>;
}

/// Conjunctive filter over the three axes. An empty search string or an
/// empty status/subject set behaves like an absent axis.
#[must_use]
pub fn filter_catalog(entries: Vec<CatalogEntry>, query: &CatalogQuery) -> Vec<CatalogEntry> {
    let needle = query
        .search
        .as_deref()
        .map(str::to_lowercase)
        .filter(|s| !s.is_empty());

    entries
        .into_iter()
        .filter(|entry| {
            if let Some(needle) = &needle
                && !entry.video.title.to_lowercase().contains(needle.as_str())
            {
                return false;
            }
            if let Some(statuses) = &query.statuses
                && !statuses.is_empty()
                && !statuses.contains(&entry.status)
            {
                return false;
            }
            if let Some(subjects) = &query.subjects
                && !subjects.is_empty()
                && !subjects.iter().any(|s| s == &entry.video.subject)
            {
                return false;
            }
            true
        })
        .collect()
}

/// Stable starred-first partition: starred entries move ahead of unstarred
/// ones, ties keep their incoming (store) order.
#[must_use]
pub fn starred_first(mut entries: Vec<CatalogEntry>) -> Vec<CatalogEntry> {
    entries.sort_by_key(|entry| !entry.video.starred);
    entries
}
