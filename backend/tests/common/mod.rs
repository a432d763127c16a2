//! Shared helpers for the integration tests
//!
//! The third-party sites are replaced by a local Axum server serving fixture
//! pages, so the whole pipeline runs without network access.

#![allow(dead_code)]

use std::collections::HashMap;

use axum::body::Body;
use axum::extract::{Path, Query};
use axum::http::{Request, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use thespian_server::config::Config;
use thespian_server::db::Database;
use thespian_server::{AppState, build_app};

pub const TMDB_TOKEN: &str = "test-token";

/// A running fixture server plus the app pointed at it
pub struct TestApp {
    pub app: Router,
    pub db: Database,
    pub fixtures_url: String,
    pub client_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_token(Some(TMDB_TOKEN.to_string())).await
    }

    pub async fn with_token(token: Option<String>) -> Self {
        let fixtures_url = spawn_fixture_server().await;

        let client_dir = tempfile::tempdir().unwrap();
        std::fs::write(client_dir.path().join("index.html"), "<h1>Thespians</h1>").unwrap();
        std::fs::write(client_dir.path().join("app.js"), "angular.module('app', []);").unwrap();
        let bower = client_dir.path().join("bower");
        std::fs::create_dir_all(bower.join("angular")).unwrap();
        std::fs::write(bower.join("angular").join("angular.js"), "/* angular */").unwrap();

        let config = Config {
            tmdb_api_token: token,
            client_dir: client_dir.path().to_path_buf(),
            bower_dir: bower,
            streaming_api_url: format!("{}/services", fixtures_url),
            movielink_base_url: format!("{}/watch", fixtures_url),
            movielink_page_suffix: "-online.html".to_string(),
            ..Config::default()
        };

        let db = Database::connect_in_memory().await.unwrap();
        let state = AppState::new(config, db.clone()).unwrap();

        Self {
            app: build_app(state),
            db,
            fixtures_url,
            client_dir,
        }
    }

    pub async fn request(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, body_string(response).await)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        self.request(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get(uri).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, body) = self.request(request).await;
        (status, serde_json::from_str(&body).unwrap())
    }
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Lookup page markup the way the hosting site emits it
pub fn lookup_page(player_src: &str) -> String {
    let iframe = format!(
        r#"<iframe src="{}" webkitAllowFullScreen mozallowfullscreen allowfullscreen width="100%" height="100%"></iframe>"#,
        player_src
    );
    let token = STANDARD.encode(STANDARD.encode(iframe));
    format!(
        r#"<html><head><script src="/js/base64.js"></script></head>
<body><div class="video"><script type="text/javascript">document.write(doit('{}'));</script></div></body></html>"#,
        token
    )
}

/// Player page listing the given `(file, label)` pairs
pub fn player_page(sources: &[(&str, &str)]) -> String {
    let entries: Vec<String> = sources
        .iter()
        .map(|(file, label)| format!(r#"{{file:"{}",label:"{}"}}"#, file, label))
        .collect();
    format!(
        r#"<html><body><div id="vplayer"></div><script>
jwplayer("vplayer").setup({{
    sources: [{}],
    image: "http://cdn.example/poster.jpg",
    width: "100%"
}});
</script></body></html>"#,
        entries.join(",")
    )
}

async fn spawn_fixture_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let app = fixture_router(base.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    base
}

fn fixture_router(base: String) -> Router {
    Router::new()
        .route(
            "/watch/{page}",
            get(move |Path(page): Path<String>| {
                let base = base.clone();
                async move { lookup_fixture(&base, &page) }
            }),
        )
        .route("/embed/{id}", get(player_fixture))
        .route("/services/search", get(search_fixture))
        .route("/services/query", get(query_fixture))
}

fn lookup_fixture(base: &str, page: &str) -> Response {
    match page {
        // root-relative player url
        "the-matrix-online.html" => Html(lookup_page("/embed/matrix")).into_response(),
        "up-online.html" => Html(lookup_page(&format!("{}/embed/up", base))).into_response(),
        "gone-online.html" => Html(lookup_page("/embed/gone")).into_response(),
        "hd-only-online.html" => Html(lookup_page("/embed/hd-only")).into_response(),
        "no-token-online.html" => Html("<html><body>Nothing to see</body></html>").into_response(),
        _ => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn player_fixture(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "matrix" => Html(player_page(&[
            ("http://cdn.example/matrix-240.mp4", "240p"),
            ("http://cdn.example/matrix-720.mp4", "720p"),
            ("http://cdn.example/matrix-360.mp4", "360p"),
        ]))
        .into_response(),
        "up" => Html(player_page(&[
            ("http://cdn.example/up-1080.mp4", "1080p"),
            ("http://cdn.example/up-360.mp4", "360p"),
        ]))
        .into_response(),
        "hd-only" => Html(player_page(&[("http://cdn.example/hd.mp4", "1080p")])).into_response(),
        "gone" => "File was deleted".into_response(),
        _ => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn search_fixture(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let results = match params.get("movieName").map(String::as_str) {
        Some("The Matrix") => json!([
            {"_id": "matrix-id", "title": "The Matrix", "year": 1999},
            {"_id": "reloaded-id", "title": "The Matrix Reloaded", "year": 2003}
        ]),
        Some("Hulu Only") => json!([{"_id": "hulu-id", "title": "Hulu Only"}]),
        Some("Delisted") => json!([{"_id": "delisted-id", "title": "Delisted"}]),
        _ => json!([]),
    };
    Json(results)
}

async fn query_fixture(Query(params): Query<HashMap<String, String>>) -> Response {
    let attributes_ok = params.get("attributes").map(String::as_str) == Some("1")
        && params.get("mediaType").map(String::as_str) == Some("streaming");
    if !attributes_ok {
        return (StatusCode::BAD_REQUEST, "bad query").into_response();
    }

    let services = match params.get("movieId").map(String::as_str) {
        Some("matrix-id") => json!({
            "netflix_instant": {"external_id": "20557937", "price": 0},
            "amazon_prime_instant_video": {"external_id": "B000"}
        }),
        Some("delisted-id") => json!({"netflix_instant": {"external_id": ""}}),
        _ => json!([]),
    };
    Json(services).into_response()
}
