//! `SeaORM` implementation of the `CatalogService` trait.

use async_trait::async_trait;
use std::sync::Arc;

use crate::constants::limits;
use crate::db::Store;
use crate::domain::{TranslationId, UserId, VideoId, VideoStatus};
use crate::models::{Translation, User, Video};
use crate::services::authz::{Action, Authorizer};
use crate::services::catalog_service::{
    CatalogEntry, CatalogError, CatalogQuery, CatalogService, VideoDetail, filter_catalog,
    starred_first,
};
use crate::services::translation_state;

pub struct SeaOrmCatalogService {
    store: Store,
    authorizer: Arc<dyn Authorizer>,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub fn new(store: Store, authorizer: Arc<dyn Authorizer>) -> Self {
        Self { store, authorizer }
    }

    async fn load_video(&self, id: VideoId) -> Result<Video, CatalogError> {
        self.store
            .get_video(id.value())
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Resolves user ids to accounts, keeping the incoming order. Accounts
    /// deleted out from under a record are skipped rather than failing the
    /// whole page.
    async fn load_users(&self, ids: &[i32]) -> Result<Vec<User>, CatalogError> {
        let mut users = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(user) = self.store.get_user(*id).await? {
                users.push(user);
            }
        }
        Ok(users)
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<CatalogEntry>, CatalogError> {
        let rows = self.store.list_videos_with_translations().await?;

        let entries: Vec<CatalogEntry> = rows
            .into_iter()
            .map(|(video, translations)| CatalogEntry {
                status: translation_state::video_status(&translations),
                video,
            })
            .collect();

        Ok(starred_first(filter_catalog(entries, query)))
    }

    async fn video_detail(
        &self,
        id: VideoId,
        viewer: Option<UserId>,
    ) -> Result<VideoDetail, CatalogError> {
        let video = self.load_video(id).await?;
        let translations = self.store.translations_for_video(id.value()).await?;

        let translator_ids: Vec<i32> = translation_state::translators(&translations)
            .into_iter()
            .take(limits::CONTRIBUTOR_DISPLAY)
            .collect();
        let reviewer_ids: Vec<i32> = translation_state::reviewers(&translations)
            .into_iter()
            .take(limits::CONTRIBUTOR_DISPLAY)
            .collect();

        let viewer_translation = match viewer {
            Some(user) => {
                self.store
                    .find_primary_translation(id.value(), user.value())
                    .await?
            }
            None => None,
        };

        Ok(VideoDetail {
            status: translation_state::video_status(&translations),
            completed_translations: translation_state::completed_translations(&translations),
            translators: self.load_users(&translator_ids).await?,
            reviewers: self.load_users(&reviewer_ids).await?,
            viewer_translation,
            video,
        })
    }

    async fn toggle_star(&self, id: VideoId, actor: &User) -> Result<Video, CatalogError> {
        let video = self.load_video(id).await?;

        if !self
            .authorizer
            .authorize(&Action::Star(&video), actor)
            .is_allowed()
        {
            return Err(CatalogError::Permission(format!(
                "{} may not star videos",
                actor.email
            )));
        }

        self.store
            .toggle_video_star(id.value())
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn all_subjects(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.store.distinct_subjects().await?)
    }

    fn statuses(&self) -> &'static [VideoStatus] {
        VideoStatus::ALL
    }

    async fn untranslated_videos(&self, user: UserId) -> Result<Vec<Video>, CatalogError> {
        let rows = self.store.videos_for_user(user.value()).await?;
        let (_, untranslated) = translation_state::partition_by_translated(rows);
        Ok(untranslated)
    }

    async fn translated_videos(&self, user: UserId) -> Result<Vec<Video>, CatalogError> {
        let rows = self.store.videos_for_user(user.value()).await?;
        let (translated, _) = translation_state::partition_by_translated(rows);
        Ok(translated)
    }

    async fn record_translation(
        &self,
        video: VideoId,
        actor: &User,
        reviewer_pass: bool,
    ) -> Result<Translation, CatalogError> {
        let target = self.load_video(video).await?;

        if !self
            .authorizer
            .authorize(&Action::SubmitTranslation(&target), actor)
            .is_allowed()
        {
            return Err(CatalogError::Permission(format!(
                "{} may not submit work on this video",
                actor.email
            )));
        }

        Ok(self
            .store
            .upsert_translation(video.value(), actor.id, reviewer_pass)
            .await?)
    }

    async fn mark_reviewed(
        &self,
        id: TranslationId,
        actor: &User,
    ) -> Result<Translation, CatalogError> {
        let translation = self
            .store
            .get_translation(id.value())
            .await?
            .ok_or(CatalogError::TranslationNotFound(id))?;
        let video = self.load_video(VideoId::new(translation.video_id)).await?;

        if !self
            .authorizer
            .authorize(&Action::Review(&video), actor)
            .is_allowed()
        {
            return Err(CatalogError::Permission(format!(
                "{} may not review this video",
                actor.email
            )));
        }

        self.store
            .mark_translation_reviewed(id.value())
            .await?
            .ok_or(CatalogError::TranslationNotFound(id))
    }
}
