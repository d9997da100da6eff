#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use pup_common::{Config, RawCatalogEntry};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub const LUCKPERMS_PAGE: &str = "https://www.spigotmc.org/resources/luckperms.28140";
pub const LUCKPERMS_JAR: &[u8] = b"luckperms-bytes";
pub const A_JAR: &[u8] = b"A-bytes";
pub const B_JAR: &[u8] = b"B-bytes";
pub const TAB_JAR: &[u8] = b"tab-bytes";
pub const DIRECT_JAR: &[u8] = b"worldguard-bytes";

// ============================================================================
// Test server infrastructure
// ============================================================================

/// What the fake plugin sources currently publish, and what was asked of them.
#[derive(Default)]
pub struct Sources {
    pub base_url: Mutex<String>,
    pub spiget_version: AtomicU64,
    pub build_number: AtomicU64,
    pub release_id: AtomicU64,
    pub version_lookups: AtomicUsize,
    pub downloads: AtomicUsize,
    pub hang_signal: Mutex<Option<oneshot::Sender<()>>>,
}

impl Sources {
    fn base(&self) -> String {
        self.base_url.lock().unwrap().clone()
    }

    fn count_download(&self) {
        self.downloads.fetch_add(1, Ordering::SeqCst);
    }

    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

pub struct TestServer {
    pub base_url: String,
    pub sources: Arc<Sources>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let sources = Arc::new(Sources {
            spiget_version: AtomicU64::new(1050),
            build_number: AtomicU64::new(42),
            release_id: AtomicU64::new(777),
            ..Sources::default()
        });
        *sources.base_url.lock().unwrap() = base_url.clone();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let server = axum::serve(listener, router(Arc::clone(&sources)))
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
        tokio::spawn(async move {
            server.await.unwrap();
        });

        Self {
            base_url,
            sources,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// A config pointing every API at this server and every file into `dir`.
    pub fn config(&self, dir: &Path, catalog: Vec<RawCatalogEntry>) -> Config {
        Config {
            plugin_dir: dir.join("plugins"),
            ledger_file: dir.join("plugin_versions.json"),
            log_file: dir.join("plugin_updater.log"),
            marketplace_api_url: self.base_url.clone(),
            release_api_url: self.url("/repos"),
            request_timeout_secs: 30,
            connect_timeout_secs: 5,
            catalog,
        }
    }

    /// Fires when a client reaches `/hang`, which never answers in time.
    pub fn hang_signal(&self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        *self.sources.hang_signal.lock().unwrap() = Some(tx);
        rx
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
    }
}

// ============================================================================
// Test endpoints
// ============================================================================

type Shared = State<Arc<Sources>>;

async fn spiget_latest(State(sources): Shared) -> Json<serde_json::Value> {
    sources.version_lookups.fetch_add(1, Ordering::SeqCst);
    let id = sources.spiget_version.load(Ordering::SeqCst);
    Json(json!({ "id": id, "name": format!("v{id}"), "releaseDate": 1700000000 }))
}

async fn spiget_download(State(sources): Shared) -> &'static [u8] {
    sources.count_download();
    LUCKPERMS_JAR
}

async fn jenkins_build(State(sources): Shared) -> Json<serde_json::Value> {
    Json(json!({
        "_class": "hudson.model.FreeStyleBuild",
        "number": sources.build_number.load(Ordering::SeqCst),
        "artifacts": [
            { "fileName": "A-1.0.jar", "relativePath": "build/libs/A-1.0.jar" },
            { "fileName": "B-1.0.jar", "relativePath": "build/libs/B-1.0.jar" }
        ]
    }))
}

async fn artifact_a(State(sources): Shared) -> &'static [u8] {
    sources.count_download();
    A_JAR
}

async fn artifact_b(State(sources): Shared) -> &'static [u8] {
    sources.count_download();
    B_JAR
}

async fn github_latest(State(sources): Shared) -> Json<serde_json::Value> {
    Json(json!({
        "id": sources.release_id.load(Ordering::SeqCst),
        "tag_name": "5.0.1",
        "assets": [
            { "name": "TAB.jar", "browser_download_url": format!("{}/assets/TAB.jar", sources.base()) }
        ]
    }))
}

async fn github_asset(State(sources): Shared) -> &'static [u8] {
    sources.count_download();
    TAB_JAR
}

async fn direct_file(State(sources): Shared) -> &'static [u8] {
    sources.count_download();
    DIRECT_JAR
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

async fn broken_json() -> &'static str {
    "<html>maintenance</html>"
}

async fn hang(State(sources): Shared) -> Response {
    let signal = sources.hang_signal.lock().unwrap().take();
    if let Some(tx) = signal {
        let _ = tx.send(());
    }
    tokio::time::sleep(Duration::from_secs(20)).await;
    StatusCode::OK.into_response()
}

fn router(sources: Arc<Sources>) -> Router {
    Router::new()
        .route("/resources/28140/versions/latest", get(spiget_latest))
        .route("/resources/28140/download", get(spiget_download))
        .route("/resources/404/versions/latest", get(not_found))
        .route("/job/Multi/lastSuccessfulBuild/api/json", get(jenkins_build))
        .route(
            "/job/Multi/lastSuccessfulBuild/artifact/build/libs/A-1.0.jar",
            get(artifact_a),
        )
        .route(
            "/job/Multi/lastSuccessfulBuild/artifact/build/libs/B-1.0.jar",
            get(artifact_b),
        )
        .route("/job/Broken/lastSuccessfulBuild/api/json", get(broken_json))
        .route("/repos/NEZNAMY/TAB/releases/latest", get(github_latest))
        .route("/assets/TAB.jar", get(github_asset))
        .route("/direct/WorldGuard.jar", get(direct_file))
        .route("/direct/missing.jar", get(not_found))
        .route("/hang", get(hang))
        .with_state(sources)
}
