use serde::Serialize;

use crate::entities::videos;

/// A catalog video. Status is not a field here: it is derived from the
/// video's translation records on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Video {
    pub id: i32,
    pub title: String,
    pub subject: String,
    pub starred: bool,
    pub external_id: String,
    pub duration_seconds: Option<i32>,
    pub created_at: String,
}

impl From<videos::Model> for Video {
    fn from(model: videos::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            subject: model.subject,
            starred: model.starred,
            external_id: model.external_id,
            duration_seconds: model.duration_seconds,
            created_at: model.created_at,
        }
    }
}

/// Fields needed to create a video from imported metadata.
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub title: String,
    pub subject: String,
    pub external_id: String,
    pub duration_seconds: Option<i32>,
}
