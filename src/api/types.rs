use serde::{Deserialize, Serialize};

use crate::domain::VideoStatus;
use crate::models::{Translation, User, Video};
use crate::services::{CatalogEntry, VideoDetail};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// A catalog row with its derived status flattened in.
#[derive(Debug, Serialize)]
pub struct VideoDto {
    pub id: i32,
    pub title: String,
    pub subject: String,
    pub starred: bool,
    pub external_id: String,
    pub duration_seconds: Option<i32>,
    pub status: VideoStatus,
    pub created_at: String,
}

impl VideoDto {
    pub fn new(video: Video, status: VideoStatus) -> Self {
        Self {
            id: video.id,
            title: video.title,
            subject: video.subject,
            starred: video.starred,
            external_id: video.external_id,
            duration_seconds: video.duration_seconds,
            status,
            created_at: video.created_at,
        }
    }
}

impl From<CatalogEntry> for VideoDto {
    fn from(entry: CatalogEntry) -> Self {
        Self::new(entry.video, entry.status)
    }
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub email_verified: bool,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name(),
            role: user.role.to_string(),
            email_verified: user.email_verified(),
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TranslationDto {
    pub id: i32,
    pub video_id: i32,
    pub user_id: i32,
    pub reviewed: bool,
    pub reviewer: bool,
}

impl From<Translation> for TranslationDto {
    fn from(t: Translation) -> Self {
        Self {
            id: t.id,
            video_id: t.video_id,
            user_id: t.user_id,
            reviewed: t.reviewed,
            reviewer: t.reviewer,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VideoDetailDto {
    pub video: VideoDto,
    pub completed_translations: Vec<TranslationDto>,
    pub translators: Vec<UserDto>,
    pub reviewers: Vec<UserDto>,
    pub viewer_translation: Option<TranslationDto>,
}

impl From<VideoDetail> for VideoDetailDto {
    fn from(detail: VideoDetail) -> Self {
        Self {
            video: VideoDto::new(detail.video, detail.status),
            completed_translations: detail
                .completed_translations
                .into_iter()
                .map(TranslationDto::from)
                .collect(),
            translators: detail.translators.into_iter().map(UserDto::from).collect(),
            reviewers: detail.reviewers.into_iter().map(UserDto::from).collect(),
            viewer_translation: detail.viewer_translation.map(TranslationDto::from),
        }
    }
}

/// Query string for catalog search; the set axes arrive comma-separated.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub search: Option<String>,
    pub statuses: Option<String>,
    pub subjects: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitTranslationRequest {
    /// True submits a review pass instead of a primary translation.
    #[serde(default)]
    pub reviewer: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: String,
    pub uptime_seconds: u64,
    pub database: String,
}
