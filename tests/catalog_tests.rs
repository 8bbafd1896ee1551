use std::sync::Arc;

use lokarr::db::Store;
use lokarr::domain::{Role, UserId, VideoId, VideoStatus};
use lokarr::models::{NewUser, NewVideo, User, Video};
use lokarr::services::{
    CatalogQuery, CatalogService, RoleAuthorizer, SeaOrmCatalogService,
};

async fn memory_store() -> Store {
    Store::with_pool_options("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to open in-memory store")
}

fn catalog(store: &Store) -> SeaOrmCatalogService {
    SeaOrmCatalogService::new(store.clone(), Arc::new(RoleAuthorizer))
}

async fn seed_video(store: &Store, title: &str, subject: &str) -> Video {
    store
        .add_video(&NewVideo {
            title: title.to_string(),
            subject: subject.to_string(),
            external_id: format!("ext-{title}"),
            duration_seconds: Some(300),
        })
        .await
        .expect("Failed to seed video")
}

async fn seed_user(store: &Store, email: &str, role: Role) -> User {
    store
        .create_user(&NewUser {
            email: email.to_string(),
            password: "secret-password".to_string(),
            first_name: "test".to_string(),
            last_name: "user".to_string(),
            city: None,
            country: None,
            role: Some(role),
            confirmed: true,
        })
        .await
        .expect("Failed to seed user")
}

async fn admin(store: &Store) -> User {
    seed_user(store, "admin@example.com", Role::Admin).await
}

#[tokio::test]
async fn empty_search_returns_full_catalog_starred_first() {
    let store = memory_store().await;
    let catalog = catalog(&store);
    let actor = admin(&store).await;

    // Store order: A, B, C, D; A and C starred.
    let a = seed_video(&store, "A", "Physics").await;
    let b = seed_video(&store, "B", "Biology").await;
    let c = seed_video(&store, "C", "History").await;
    let d = seed_video(&store, "D", "Physics").await;

    catalog
        .toggle_star(VideoId::new(a.id), &actor)
        .await
        .unwrap();
    catalog
        .toggle_star(VideoId::new(c.id), &actor)
        .await
        .unwrap();

    let entries = catalog.search(&CatalogQuery::default()).await.unwrap();
    let ids: Vec<i32> = entries.iter().map(|e| e.video.id).collect();

    assert_eq!(ids, [a.id, c.id, b.id, d.id]);
}

#[tokio::test]
async fn search_filters_compose_and_match_derived_status() {
    let store = memory_store().await;
    let catalog = catalog(&store);
    let volunteer = seed_user(&store, "vol@example.com", Role::Volunteer).await;

    let waves = seed_video(&store, "Intro to Waves", "Physics").await;
    let cells = seed_video(&store, "Cell Division", "Biology").await;
    seed_video(&store, "Wave Equations", "Mathematics").await;

    // Only "Intro to Waves" gets a primary translation.
    store
        .upsert_translation(waves.id, volunteer.id, false)
        .await
        .unwrap();

    let query = CatalogQuery {
        search: Some("wave".to_string()),
        statuses: Some(vec![VideoStatus::Translated]),
        subjects: Some(vec!["Physics".to_string()]),
    };
    let entries = catalog.search(&query).await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].video.id, waves.id);
    assert_eq!(entries[0].status, VideoStatus::Translated);

    // An untranslated-only filter excludes it and keeps the others.
    let query = CatalogQuery {
        statuses: Some(vec![VideoStatus::Untranslated]),
        ..Default::default()
    };
    let entries = catalog.search(&query).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().any(|e| e.video.id == cells.id));
}

#[tokio::test]
async fn no_matches_is_an_empty_result() {
    let store = memory_store().await;
    let catalog = catalog(&store);
    seed_video(&store, "Intro to Waves", "Physics").await;

    let query = CatalogQuery {
        search: Some("quantum chromodynamics".to_string()),
        ..Default::default()
    };
    let entries = catalog.search(&query).await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn detail_reviewers_never_overlap_translators() {
    let store = memory_store().await;
    let catalog = catalog(&store);

    let video = seed_video(&store, "Intro to Waves", "Physics").await;
    let translator = seed_user(&store, "t@example.com", Role::Volunteer).await;
    let both = seed_user(&store, "both@example.com", Role::Volunteer).await;
    let reviewer = seed_user(&store, "r@example.com", Role::Volunteer).await;

    store
        .upsert_translation(video.id, translator.id, false)
        .await
        .unwrap();
    // `both` holds a primary and a review record.
    store
        .upsert_translation(video.id, both.id, false)
        .await
        .unwrap();
    store
        .upsert_translation(video.id, both.id, true)
        .await
        .unwrap();
    store
        .upsert_translation(video.id, reviewer.id, true)
        .await
        .unwrap();

    let detail = catalog
        .video_detail(VideoId::new(video.id), None)
        .await
        .unwrap();

    let translator_ids: Vec<i32> = detail.translators.iter().map(|u| u.id).collect();
    let reviewer_ids: Vec<i32> = detail.reviewers.iter().map(|u| u.id).collect();

    assert_eq!(translator_ids, vec![translator.id, both.id]);
    assert_eq!(reviewer_ids, vec![reviewer.id]);
    assert!(reviewer_ids.iter().all(|id| !translator_ids.contains(id)));
    assert_eq!(detail.completed_translations.len(), 2);
    assert_eq!(detail.status, VideoStatus::Translated);
}

#[tokio::test]
async fn detail_includes_the_viewers_own_translation() {
    let store = memory_store().await;
    let catalog = catalog(&store);

    let video = seed_video(&store, "Intro to Waves", "Physics").await;
    let viewer = seed_user(&store, "viewer@example.com", Role::Volunteer).await;
    let other = seed_user(&store, "other@example.com", Role::Volunteer).await;

    store
        .upsert_translation(video.id, other.id, false)
        .await
        .unwrap();
    let own = store
        .upsert_translation(video.id, viewer.id, false)
        .await
        .unwrap();

    let detail = catalog
        .video_detail(VideoId::new(video.id), Some(UserId::new(viewer.id)))
        .await
        .unwrap();
    assert_eq!(detail.viewer_translation.map(|t| t.id), Some(own.id));

    let anonymous = catalog
        .video_detail(VideoId::new(video.id), None)
        .await
        .unwrap();
    assert!(anonymous.viewer_translation.is_none());
}

#[tokio::test]
async fn status_becomes_reviewed_once_every_primary_is() {
    let store = memory_store().await;
    let catalog = catalog(&store);

    let video = seed_video(&store, "Intro to Waves", "Physics").await;
    let a = seed_user(&store, "a@example.com", Role::Volunteer).await;
    let b = seed_user(&store, "b@example.com", Role::Volunteer).await;

    let ta = store.upsert_translation(video.id, a.id, false).await.unwrap();
    let tb = store.upsert_translation(video.id, b.id, false).await.unwrap();

    store.mark_translation_reviewed(ta.id).await.unwrap();
    let detail = catalog
        .video_detail(VideoId::new(video.id), None)
        .await
        .unwrap();
    assert_eq!(detail.status, VideoStatus::Translated);

    store.mark_translation_reviewed(tb.id).await.unwrap();
    let detail = catalog
        .video_detail(VideoId::new(video.id), None)
        .await
        .unwrap();
    assert_eq!(detail.status, VideoStatus::Reviewed);
}

#[tokio::test]
async fn resubmission_returns_the_same_record() {
    let store = memory_store().await;

    let video = seed_video(&store, "Intro to Waves", "Physics").await;
    let user = seed_user(&store, "a@example.com", Role::Volunteer).await;

    let first = store.upsert_translation(video.id, user.id, false).await.unwrap();
    let second = store.upsert_translation(video.id, user.id, false).await.unwrap();
    assert_eq!(first.id, second.id);

    // A review pass is a distinct record for the same pair.
    let review = store.upsert_translation(video.id, user.id, true).await.unwrap();
    assert_ne!(review.id, first.id);
}

#[tokio::test]
async fn user_videos_partition_by_translated_predicate() {
    let store = memory_store().await;
    let catalog = catalog(&store);

    let done = seed_video(&store, "Done", "Physics").await;
    let pending = seed_video(&store, "Pending", "Biology").await;
    let user = seed_user(&store, "a@example.com", Role::Volunteer).await;

    store.upsert_translation(done.id, user.id, false).await.unwrap();
    // Only a review record: the video stays untranslated.
    store
        .upsert_translation(pending.id, user.id, true)
        .await
        .unwrap();

    let translated = catalog
        .translated_videos(UserId::new(user.id))
        .await
        .unwrap();
    let untranslated = catalog
        .untranslated_videos(UserId::new(user.id))
        .await
        .unwrap();

    assert_eq!(translated.iter().map(|v| v.id).collect::<Vec<_>>(), [done.id]);
    assert_eq!(
        untranslated.iter().map(|v| v.id).collect::<Vec<_>>(),
        [pending.id]
    );
}

#[tokio::test]
async fn volunteers_may_not_toggle_stars() {
    let store = memory_store().await;
    let catalog = catalog(&store);

    let video = seed_video(&store, "Intro to Waves", "Physics").await;
    let volunteer = seed_user(&store, "vol@example.com", Role::Volunteer).await;

    let err = catalog
        .toggle_star(VideoId::new(video.id), &volunteer)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        lokarr::services::CatalogError::Permission(_)
    ));

    // Denied means not performed.
    let unchanged = store.get_video(video.id).await.unwrap().unwrap();
    assert!(!unchanged.starred);
}

#[tokio::test]
async fn all_subjects_reflects_catalog_contents() {
    let store = memory_store().await;
    let catalog = catalog(&store);

    seed_video(&store, "A", "Physics").await;
    seed_video(&store, "B", "Physics").await;
    seed_video(&store, "C", "Biology").await;

    let subjects = catalog.all_subjects().await.unwrap();
    assert_eq!(subjects, vec!["Biology".to_string(), "Physics".to_string()]);

    let statuses = catalog.statuses();
    assert_eq!(statuses, VideoStatus::ALL);
}
