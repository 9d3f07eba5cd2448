#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;

use docsite::app::{AppState, DEFAULT_MAX_BODY_BYTES};
use docsite::feedback::store::JsonFileFeedbackStore;
use docsite::search::index::DocumentIndex;
use docsite::search::source::JsonFileSource;
use docsite::static_files::resolver::{PathResolver, ServePolicy};

/// Holds a temporary site directory and the Axum router serving it.
///
/// The directory is removed when this struct is dropped.
pub struct TestEnv {
    site: TempDir,
    pub state: AppState,
    pub router: Router,
}

impl TestEnv {
    /// Lay out a small documentation site and build a router over it.
    pub async fn start() -> Self {
        Self::start_with_docs(DEFAULT_DOCS).await
    }

    /// Same as [`TestEnv::start`] with custom `data/docs.json` contents.
    pub async fn start_with_docs(docs_json: &str) -> Self {
        let site = tempfile::tempdir().expect("Failed to create site directory");
        let root = site.path();

        write(root, "index.html", "<!doctype html><title>Docs</title>");
        write(root, "assets/app.css", "body { margin: 0; }");
        write(root, "assets/app.js", "console.log('docs');");
        write(root, "assets/logo.svg", "<svg xmlns=\"http://www.w3.org/2000/svg\"/>");
        write(root, "assets/fonts/font.woff2", "wOF2");
        write(root, "assets/guide/index.html", "<h1>Guide</h1>");
        write(root, "data/docs.json", docs_json);
        write(root, "server/secret.txt", "top secret");
        write(root, "notes/index.html", "<h1>Private notes</h1>");
        write(root, "Cargo.toml", "[package]");

        let index = Arc::new(DocumentIndex::new());
        let document_source = Arc::new(JsonFileSource::new(root.join("data/docs.json")));
        let feedback_store = Arc::new(JsonFileFeedbackStore::new(root.join("data/feedback.json")));

        let state = AppState {
            index,
            document_source,
            feedback_store,
            resolver: Arc::new(PathResolver::new(root).expect("Failed to build resolver")),
            policy: Arc::new(ServePolicy::default()),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        };
        state.reload_index().await;

        let router = docsite::app::router(state.clone());

        Self {
            site,
            state,
            router,
        }
    }

    pub fn root(&self) -> &Path {
        self.site.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.site.path().join(relative)
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .build(self.router.clone())
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .build(self.router.clone())
    }
}

pub fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    std::fs::write(path, contents).expect("Failed to write fixture");
}

pub const DEFAULT_DOCS: &str = r#"[
    {"id": 1, "title": "Intro", "body": "Getting started guide", "path": "/intro"},
    {"id": 2, "title": "Installation", "body": "Install the server and start it with the default configuration.", "path": "/install"},
    {"id": 3, "title": "Search API", "body": "The search endpoint scores documents by how many query terms they contain.", "path": "/search-api"},
    {"id": "faq", "title": "FAQ", "body": "Frequently asked questions about the server and search.", "path": "/faq"}
]"#;
