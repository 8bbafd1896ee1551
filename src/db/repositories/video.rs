use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::info;

use crate::entities::{prelude::*, videos};
use crate::models::{NewVideo, Translation, Video};

pub struct VideoRepository {
    conn: DatabaseConnection,
}

impl VideoRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(&self, video: &NewVideo) -> Result<Video> {
        let active = videos::ActiveModel {
            title: Set(video.title.clone()),
            subject: Set(video.subject.clone()),
            starred: Set(false),
            external_id: Set(video.external_id.clone()),
            duration_seconds: Set(video.duration_seconds),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active.insert(&self.conn).await?;
        info!("Added video: {} ({})", model.title, model.external_id);
        Ok(model.into())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Video>> {
        let video = Videos::find_by_id(id).one(&self.conn).await?;
        Ok(video.map(Video::from))
    }

    pub async fn get_by_external_id(&self, external_id: &str) -> Result<Option<Video>> {
        let video = Videos::find()
            .filter(videos::Column::ExternalId.eq(external_id))
            .one(&self.conn)
            .await?;
        Ok(video.map(Video::from))
    }

    /// All videos in store order, each with its translation records (also in
    /// store order). Derived-status computation starts from this shape.
    pub async fn list_with_translations(&self) -> Result<Vec<(Video, Vec<Translation>)>> {
        let rows = Videos::find()
            .order_by_asc(videos::Column::Id)
            .find_with_related(Translations)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(video, translations)| {
                let mut translations: Vec<Translation> =
                    translations.into_iter().map(Translation::from).collect();
                translations.sort_by_key(|t| t.id);
                (Video::from(video), translations)
            })
            .collect())
    }

    /// Flips the starred flag and persists. `None` when the video is unknown.
    pub async fn toggle_star(&self, id: i32) -> Result<Option<Video>> {
        let Some(model) = Videos::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let starred = !model.starred;
        let mut active: videos::ActiveModel = model.into();
        active.starred = Set(starred);
        let updated = active.update(&self.conn).await?;

        info!("Video {} starred: {}", id, starred);
        Ok(Some(updated.into()))
    }

    /// Distinct subjects present in the catalog, for filter UIs.
    pub async fn distinct_subjects(&self) -> Result<Vec<String>> {
        let subjects: Vec<String> = Videos::find()
            .select_only()
            .column(videos::Column::Subject)
            .distinct()
            .order_by_asc(videos::Column::Subject)
            .into_tuple()
            .all(&self.conn)
            .await?;
        Ok(subjects)
    }
}
