use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::{prelude::*, translations, videos};
use crate::models::{Translation, Video};

pub struct TranslationRepository {
    conn: DatabaseConnection,
}

impl TranslationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// One record per (video, user, pass kind): submitting again returns the
    /// existing row instead of stacking duplicates. A concurrent insert that
    /// trips the unique index resolves to the winner's row.
    pub async fn upsert(&self, video_id: i32, user_id: i32, reviewer: bool) -> Result<Translation> {
        if let Some(existing) = self.find_exact(video_id, user_id, reviewer).await? {
            return Ok(existing);
        }

        let active = translations::ActiveModel {
            video_id: Set(video_id),
            user_id: Set(user_id),
            reviewed: Set(false),
            reviewer: Set(reviewer),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(model.into()),
            Err(err) => {
                if matches!(
                    err.sql_err(),
                    Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
                ) && let Some(existing) = self.find_exact(video_id, user_id, reviewer).await?
                {
                    return Ok(existing);
                }
                Err(err.into())
            }
        }
    }

    async fn find_exact(
        &self,
        video_id: i32,
        user_id: i32,
        reviewer: bool,
    ) -> Result<Option<Translation>> {
        let row = Translations::find()
            .filter(translations::Column::VideoId.eq(video_id))
            .filter(translations::Column::UserId.eq(user_id))
            .filter(translations::Column::Reviewer.eq(reviewer))
            .one(&self.conn)
            .await?;
        Ok(row.map(Translation::from))
    }

    /// The caller's own primary translation for a video, if any. Unambiguous
    /// because of the (video, user, pass kind) uniqueness.
    pub async fn find_primary(&self, video_id: i32, user_id: i32) -> Result<Option<Translation>> {
        self.find_exact(video_id, user_id, false).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<Translation>> {
        let row = Translations::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Translation::from))
    }

    pub async fn for_video(&self, video_id: i32) -> Result<Vec<Translation>> {
        let rows = Translations::find()
            .filter(translations::Column::VideoId.eq(video_id))
            .order_by_asc(translations::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Translation::from).collect())
    }

    /// Marks a record as having received a review pass. `None` when unknown.
    pub async fn mark_reviewed(&self, id: i32) -> Result<Option<Translation>> {
        let Some(model) = Translations::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: translations::ActiveModel = model.into();
        active.reviewed = Set(true);
        let updated = active.update(&self.conn).await?;
        Ok(Some(updated.into()))
    }

    /// Videos a user has contributed to, in store order, each with all of its
    /// translation records (not just this user's).
    pub async fn videos_for_user(&self, user_id: i32) -> Result<Vec<(Video, Vec<Translation>)>> {
        let video_ids: Vec<i32> = Translations::find()
            .filter(translations::Column::UserId.eq(user_id))
            .select_only()
            .column(translations::Column::VideoId)
            .distinct()
            .into_tuple()
            .all(&self.conn)
            .await?;

        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Videos::find()
            .filter(videos::Column::Id.is_in(video_ids))
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
}
