use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use lokarr::clients::metadata::{MetadataSource, VideoMetadata};
use lokarr::config::Config;
use lokarr::domain::Role;
use lokarr::models::NewUser;
use lokarr::state::SharedState;

/// Canned metadata source: knows a handful of external ids.
struct FakeSource {
    videos: HashMap<String, VideoMetadata>,
}

impl FakeSource {
    fn with_defaults() -> Self {
        let mut videos = HashMap::new();
        videos.insert(
            "ext-waves".to_string(),
            VideoMetadata {
                title: "Intro to Waves".to_string(),
                subject: "Physics".to_string(),
                duration_seconds: Some(420),
            },
        );
        videos.insert(
            "ext-cells".to_string(),
            VideoMetadata {
                title: "Cell Division".to_string(),
                subject: "Biology".to_string(),
                duration_seconds: Some(360),
            },
        );
        Self { videos }
    }
}

#[async_trait]
impl MetadataSource for FakeSource {
    async fn fetch_video_metadata(&self, external_id: &str) -> Result<Option<VideoMetadata>> {
        Ok(self.videos.get(external_id).cloned())
    }
}

async fn spawn_app() -> (Router, Arc<SharedState>) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.max_db_connections = 1;

    let shared = Arc::new(
        SharedState::with_metadata_source(config, Arc::new(FakeSource::with_defaults()))
            .await
            .expect("Failed to create app state"),
    );

    let state = lokarr::api::create_app_state(shared.clone());
    (lokarr::api::router(state).await, shared)
}

fn session_cookie(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("No session cookie set")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Signs in through the OAuth callback and returns the session cookie.
async fn sign_in(app: &Router, provider: &str, uid: &str, email: &str, name: &str) -> String {
    let payload = serde_json::json!({
        "provider": provider,
        "uid": uid,
        "info": {"email": email, "name": name},
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/oauth/callback")
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response)
}

async fn seed_admin(shared: &SharedState) {
    shared
        .store
        .create_user(&NewUser {
            email: "admin@example.com".to_string(),
            password: "admin-password".to_string(),
            first_name: "ada".to_string(),
            last_name: "admin".to_string(),
            city: None,
            country: None,
            role: Some(Role::Admin),
            confirmed: true,
        })
        .await
        .expect("Failed to seed admin");
}

#[tokio::test]
async fn statuses_endpoint_lists_the_fixed_vocabulary() {
    let (app, _) = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/catalog/statuses")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body["data"],
        serde_json::json!(["untranslated", "translated", "reviewed"])
    );
}

#[tokio::test]
async fn starring_requires_a_session() {
    let (app, _) = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/videos/1/star")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn oauth_callback_signs_the_session_in() {
    let (app, _) = spawn_app().await;

    let cookie = sign_in(&app, "google", "42", "jane@example.com", "Jane Doe").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["email"], "jane@example.com");
    assert_eq!(body["data"]["full_name"], "Jane Doe");
    assert_eq!(body["data"]["role"], "volunteer");
    assert_eq!(body["data"]["email_verified"], true);
}

#[tokio::test]
async fn volunteers_cannot_import() {
    let (app, _) = spawn_app().await;
    let cookie = sign_in(&app, "google", "7", "vol@example.com", "Vo Lunteer").await;

    let rows = serde_json::json!([{"external_id": "ext-waves"}]);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/videos/import")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(rows.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_import_reports_per_row_outcomes() {
    let (app, shared) = spawn_app().await;
    seed_admin(&shared).await;

    // Merge-by-email: the callback claims the seeded admin account.
    let cookie = sign_in(&app, "google", "1", "admin@example.com", "Ada Admin").await;

    let rows = serde_json::json!([
        {"external_id": "ext-waves"},
        {"external_id": "ext-cells"},
        {"external_id": "ext-unknown"},
    ]);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/videos/import")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(rows.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["imported"], 2);
    assert_eq!(body["data"]["errors"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["errors"][0]["row"], 3);

    // The committed rows survive the failed one.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/videos?subjects=Physics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let videos = body["data"].as_array().unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0]["title"], "Intro to Waves");
    assert_eq!(videos[0]["status"], "untranslated");
}

#[tokio::test]
async fn admin_can_star_and_the_order_changes() {
    let (app, shared) = spawn_app().await;
    seed_admin(&shared).await;
    let cookie = sign_in(&app, "google", "1", "admin@example.com", "Ada Admin").await;

    let rows = serde_json::json!([
        {"external_id": "ext-waves"},
        {"external_id": "ext-cells"},
    ]);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/videos/import")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(rows.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Star the second video; it must sort ahead of the first.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/videos/2/star")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["starred"], true);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/videos")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, [2, 1]);
}

#[tokio::test]
async fn submitting_work_updates_the_detail_page() {
    let (app, shared) = spawn_app().await;
    seed_admin(&shared).await;
    let admin_cookie = sign_in(&app, "google", "1", "admin@example.com", "Ada Admin").await;

    let rows = serde_json::json!([{"external_id": "ext-waves"}]);
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/videos/import")
                .header(header::COOKIE, &admin_cookie)
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(rows.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let volunteer_cookie = sign_in(&app, "google", "77", "vol@example.com", "Vo Lunteer").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/videos/1/translations")
                .header(header::COOKIE, &volunteer_cookie)
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/videos/1")
                .header(header::COOKIE, &volunteer_cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["video"]["status"], "translated");
    assert_eq!(
        body["data"]["translators"]
            .as_array()
            .unwrap()
            .len(),
        1
    );
    assert!(body["data"]["viewer_translation"].is_object());
}

#[tokio::test]
async fn unknown_video_is_a_404() {
    let (app, _) = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/videos/999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn system_status_reports_database_health() {
    let (app, _) = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["database"], "ok");
}
