use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::models::{NewUser, NewVideo, Translation, User, Video};

pub mod migrator;
pub mod repositories;

pub use repositories::identity::Identity;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn video_repo(&self) -> repositories::video::VideoRepository {
        repositories::video::VideoRepository::new(self.conn.clone())
    }

    fn translation_repo(&self) -> repositories::translation::TranslationRepository {
        repositories::translation::TranslationRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn identity_repo(&self) -> repositories::identity::IdentityRepository {
        repositories::identity::IdentityRepository::new(self.conn.clone())
    }

    // Videos

    pub async fn add_video(&self, video: &NewVideo) -> Result<Video> {
        self.video_repo().add(video).await
    }

    pub async fn get_video(&self, id: i32) -> Result<Option<Video>> {
        self.video_repo().get(id).await
    }

    pub async fn get_video_by_external_id(&self, external_id: &str) -> Result<Option<Video>> {
        self.video_repo().get_by_external_id(external_id).await
    }

    pub async fn list_videos_with_translations(&self) -> Result<Vec<(Video, Vec<Translation>)>> {
        self.video_repo().list_with_translations().await
    }

    pub async fn toggle_video_star(&self, id: i32) -> Result<Option<Video>> {
        self.video_repo().toggle_star(id).await
    }

    pub async fn distinct_subjects(&self) -> Result<Vec<String>> {
        self.video_repo().distinct_subjects().await
    }

    // Translations

    pub async fn upsert_translation(
        &self,
        video_id: i32,
        user_id: i32,
        reviewer: bool,
    ) -> Result<Translation> {
        self.translation_repo()
            .upsert(video_id, user_id, reviewer)
            .await
    }

    pub async fn find_primary_translation(
        &self,
        video_id: i32,
        user_id: i32,
    ) -> Result<Option<Translation>> {
        self.translation_repo()
            .find_primary(video_id, user_id)
            .await
    }

    pub async fn get_translation(&self, id: i32) -> Result<Option<Translation>> {
        self.translation_repo().get(id).await
    }

    pub async fn translations_for_video(&self, video_id: i32) -> Result<Vec<Translation>> {
        self.translation_repo().for_video(video_id).await
    }

    pub async fn mark_translation_reviewed(&self, id: i32) -> Result<Option<Translation>> {
        self.translation_repo().mark_reviewed(id).await
    }

    pub async fn videos_for_user(&self, user_id: i32) -> Result<Vec<(Video, Vec<Translation>)>> {
        self.translation_repo().videos_for_user(user_id).await
    }

    // Users

    pub async fn create_user(&self, new_user: &NewUser) -> Result<User> {
        self.user_repo().create(new_user).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get(id).await
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().find_by_email(email).await
    }

    // Identities

    pub async fn find_identity(&self, provider: &str, uid: &str) -> Result<Option<Identity>> {
        self.identity_repo().find(provider, uid).await
    }

    pub async fn create_identity(&self, provider: &str, uid: &str) -> Result<Identity> {
        self.identity_repo().create_unowned(provider, uid).await
    }

    pub async fn set_identity_user(&self, id: i32, user_id: i32) -> Result<()> {
        self.identity_repo().set_user(id, user_id).await
    }
}

/// True when the error chain bottoms out in a store-level unique-constraint
/// violation, the signal that a concurrent writer won the insert race.
#[must_use]
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sea_orm::DbErr>()
        .and_then(sea_orm::DbErr::sql_err)
        .is_some_and(|e| matches!(e, sea_orm::SqlErr::UniqueConstraintViolation(_)))
}
