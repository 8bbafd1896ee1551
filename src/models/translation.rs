use serde::Serialize;

use crate::entities::translations;

/// One user's contribution toward a video: a primary translation pass, or a
/// review pass when `reviewer` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    pub id: i32,
    pub video_id: i32,
    pub user_id: i32,
    pub reviewed: bool,
    pub reviewer: bool,
    pub created_at: String,
}

impl From<translations::Model> for Translation {
    fn from(model: translations::Model) -> Self {
        Self {
            id: model.id,
            video_id: model.video_id,
            user_id: model.user_id,
            reviewed: model.reviewed,
            reviewer: model.reviewer,
            created_at: model.created_at,
        }
    }
}
