//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own catalog database.

use super::fixtures::{create_empty_catalog, create_test_catalog};
use discotheca::catalog_store::SqliteCatalogStore;
use discotheca::server::server::make_app;
use discotheca::server::{RequestsLoggingLevel, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with an isolated catalog database.
///
/// When dropped, the server shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    // Private fields - keep resources alive until drop
    _temp_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port, seeded with the standard
    /// fixture catalog (2 artists, 2 albums, 5 tracks).
    pub async fn spawn() -> Self {
        let (temp_dir, db_path) =
            create_test_catalog().expect("Failed to create test catalog");
        Self::spawn_with_db(temp_dir, db_path).await
    }

    /// Spawns a new test server on a random port with an empty catalog.
    pub async fn spawn_empty() -> Self {
        let (temp_dir, db_path) =
            create_empty_catalog().expect("Failed to create empty catalog");
        Self::spawn_with_db(temp_dir, db_path).await
    }

    async fn spawn_with_db(temp_dir: TempDir, db_path: PathBuf) -> Self {
        let catalog_store =
            Arc::new(SqliteCatalogStore::new(&db_path).expect("Failed to open catalog store"));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
        };

        let app = make_app(config, catalog_store);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Test server failed");
        });

        TestServer {
            base_url,
            port,
            _temp_dir: temp_dir,
            _shutdown_tx: Some(shutdown_tx),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
