#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderValue, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use scrapedesk_api::config::{JobConfig, ServerConfig};
use scrapedesk_api::jobs::JobService;
use scrapedesk_api::router::build_app_router;
use scrapedesk_api::state::AppState;
use scrapedesk_core::actor::Actor;
use scrapedesk_core::category::Category;
use scrapedesk_core::error::CoreError;
use scrapedesk_core::store::{ActorResolver, CategoryStore};
use scrapedesk_core::types::DbId;

pub const ADMIN_TOKEN: &str = "admin-session-token";
pub const EDITOR_TOKEN: &str = "editor-session-token";

/// In-memory replacement for the PostgreSQL store.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    pub sessions: HashMap<String, Actor>,
    pub categories: Vec<Category>,
    /// When set, every call fails with an internal error.
    pub broken: bool,
}

impl MemoryStore {
    /// One admin and one non-admin session, a level-1 "Technology" (7) with
    /// a level-2 child (12), and a level-1 "Science" (3).
    pub fn seeded() -> Self {
        let mut sessions = HashMap::new();
        sessions.insert(
            ADMIN_TOKEN.to_string(),
            Actor {
                id: 1,
                username: "admin".into(),
                is_admin: true,
            },
        );
        sessions.insert(
            EDITOR_TOKEN.to_string(),
            Actor {
                id: 2,
                username: "editor".into(),
                is_admin: false,
            },
        );

        Self {
            sessions,
            categories: vec![
                category(3, "Science", 1, None),
                category(7, "Technology", 1, None),
                category(12, "Laptops", 2, Some(7)),
            ],
            broken: false,
        }
    }

    fn check(&self) -> Result<(), CoreError> {
        if self.broken {
            return Err(CoreError::Internal("store unavailable".into()));
        }
        Ok(())
    }
}

fn category(id: DbId, name: &str, level: i32, parent_id: Option<DbId>) -> Category {
    Category {
        id,
        name: name.to_string(),
        description: None,
        level,
        parent_id,
    }
}

#[async_trait]
impl ActorResolver for MemoryStore {
    async fn resolve_actor(&self, token: &str) -> Result<Option<Actor>, CoreError> {
        self.check()?;
        Ok(self.sessions.get(token).cloned())
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn find_level_one(&self, id: DbId) -> Result<Option<Category>, CoreError> {
        self.check()?;
        Ok(self
            .categories
            .iter()
            .find(|c| c.id == id && c.level == 1)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Category>, CoreError> {
        self.check()?;
        Ok(self.categories.clone())
    }

    async fn ping(&self) -> Result<(), CoreError> {
        self.check()
    }
}

/// Job settings pointing at `script_dir`.
///
/// The recategorize script is interpreted by `sh` so fixtures can be plain
/// shell scripts; the project-local interpreter never exists.
pub fn test_job_config(script_dir: &Path) -> JobConfig {
    JobConfig {
        script_dir: script_dir.to_path_buf(),
        recategorize_script: PathBuf::from("recategorize_articles.py"),
        scrape_script: PathBuf::from("run_scrape.sh"),
        summarize_script: PathBuf::from("start_summarizer.sh"),
        python_local_runtime: PathBuf::from("venv/bin/sh"),
        python_bin: "sh".to_string(),
        drain_grace: Duration::from_secs(2),
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(script_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![HeaderValue::from_static("http://localhost:5173")],
        request_timeout_secs: 30,
        jobs: test_job_config(script_dir),
    }
}

/// Build the full application router over the seeded in-memory store.
pub fn build_test_app(script_dir: &Path) -> Router {
    build_test_app_with(MemoryStore::seeded(), script_dir)
}

/// Build the full application router over `store`, using the same
/// middleware stack as production.
pub fn build_test_app_with(store: MemoryStore, script_dir: &Path) -> Router {
    let config = test_config(script_dir);
    let store = Arc::new(store);

    let state = AppState {
        actors: store.clone(),
        categories: store,
        jobs: Arc::new(JobService::new(config.jobs.clone())),
    };

    build_app_router(state, &config)
}

/// Write an executable `#!/bin/sh` script into `dir`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

/// Send an unauthenticated GET request.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request carrying `token` as a bearer token.
pub async fn get_authed(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request carrying `token` in the session cookie.
pub async fn get_with_cookie(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header("cookie", format!("user_session={token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read an SSE response to the end and return the JSON payload of every
/// `data:` frame, in order. Keep-alive comments are skipped.
pub async fn sse_events(response: Response) -> Vec<serde_json::Value> {
    let collected = tokio::time::timeout(
        Duration::from_secs(20),
        response.into_body().collect(),
    )
    .await
    .expect("stream did not finish in time")
    .unwrap();
    let text = String::from_utf8(collected.to_bytes().to_vec()).unwrap();

    text.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| serde_json::from_str(data.trim_start()).unwrap())
        .collect()
}

/// `(type, message)` pairs for compact assertions.
pub fn summarize(events: &[serde_json::Value]) -> Vec<(String, String)> {
    events
        .iter()
        .map(|e| {
            (
                e["type"].as_str().unwrap().to_string(),
                e["message"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}
