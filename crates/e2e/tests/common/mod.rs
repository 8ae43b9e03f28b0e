//! Fixture HTTP server for integration tests

#![allow(dead_code)]

use std::path::Path;

use axum::Router;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;

/// Well-formed product list page
pub const VALID_PAGE: &str = include_str!("../../fixtures/index.html");

/// Serves a temporary directory over HTTP on an ephemeral port
pub struct FixtureServer {
    pub base_url: String,
    dir: TempDir,
    handle: JoinHandle<()>,
}

impl FixtureServer {
    /// Serve `html` as `/index.html`
    pub async fn with_index(html: &str) -> Self {
        let server = Self::empty().await;
        std::fs::write(server.dir().join("index.html"), html).unwrap();
        server
    }

    /// Serve an empty directory (every page is a 404)
    pub async fn empty() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let app = Router::new().fallback_service(ServeDir::new(dir.path()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            dir,
            handle,
        }
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// The fixture page with its body rows cut down to `rows`
pub fn page_with_rows(rows: usize) -> String {
    let mut out = String::new();
    let mut seen = 0;
    for line in VALID_PAGE.lines() {
        if line.trim_start().starts_with("<tr><td>") {
            seen += 1;
            if seen > rows {
                continue;
            }
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
