//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all catalog-server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::REQUEST_TIMEOUT_SECS;
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("GET request failed")
    }

    async fn post(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .expect("POST request failed")
    }

    async fn put(&self, path: &str, body: &Value) -> Response {
        self.client
            .put(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .expect("PUT request failed")
    }

    async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("DELETE request failed")
    }

    // ========================================================================
    // Root
    // ========================================================================

    /// GET /
    pub async fn home(&self) -> Response {
        self.get("/").await
    }

    // ========================================================================
    // Artist Endpoints
    // ========================================================================

    /// GET /v1/catalog/artists
    pub async fn get_artists(&self) -> Response {
        self.get("/v1/catalog/artists").await
    }

    /// GET /v1/catalog/artists/{id}
    pub async fn get_artist(&self, id: i64) -> Response {
        self.get(&format!("/v1/catalog/artists/{}", id)).await
    }

    /// POST /v1/catalog/artists
    pub async fn create_artist(&self, body: &Value) -> Response {
        self.post("/v1/catalog/artists", body).await
    }

    /// PUT /v1/catalog/artists/{id}
    pub async fn update_artist(&self, id: i64, body: &Value) -> Response {
        self.put(&format!("/v1/catalog/artists/{}", id), body).await
    }

    /// DELETE /v1/catalog/artists/{id}
    pub async fn delete_artist(&self, id: i64) -> Response {
        self.delete(&format!("/v1/catalog/artists/{}", id)).await
    }

    // ========================================================================
    // Album Endpoints
    // ========================================================================

    /// GET /v1/catalog/albums
    pub async fn get_albums(&self) -> Response {
        self.get("/v1/catalog/albums").await
    }

    /// GET /v1/catalog/albums/{id}
    pub async fn get_album(&self, id: i64) -> Response {
        self.get(&format!("/v1/catalog/albums/{}", id)).await
    }

    /// POST /v1/catalog/albums
    pub async fn create_album(&self, body: &Value) -> Response {
        self.post("/v1/catalog/albums", body).await
    }

    /// PUT /v1/catalog/albums/{id}
    pub async fn update_album(&self, id: i64, body: &Value) -> Response {
        self.put(&format!("/v1/catalog/albums/{}", id), body).await
    }

    /// DELETE /v1/catalog/albums/{id}
    pub async fn delete_album(&self, id: i64) -> Response {
        self.delete(&format!("/v1/catalog/albums/{}", id)).await
    }

    // ========================================================================
    // Track Endpoints
    // ========================================================================

    /// GET /v1/catalog/tracks
    pub async fn get_tracks(&self) -> Response {
        self.get("/v1/catalog/tracks").await
    }

    /// GET /v1/catalog/tracks/{id}
    pub async fn get_track(&self, id: i64) -> Response {
        self.get(&format!("/v1/catalog/tracks/{}", id)).await
    }

    /// POST /v1/catalog/tracks
    pub async fn create_track(&self, body: &Value) -> Response {
        self.post("/v1/catalog/tracks", body).await
    }

    /// PUT /v1/catalog/tracks/{id}
    pub async fn update_track(&self, id: i64, body: &Value) -> Response {
        self.put(&format!("/v1/catalog/tracks/{}", id), body).await
    }

    /// DELETE /v1/catalog/tracks/{id}
    pub async fn delete_track(&self, id: i64) -> Response {
        self.delete(&format!("/v1/catalog/tracks/{}", id)).await
    }

    // ========================================================================
    // Playlist Endpoints
    // ========================================================================

    /// GET /v1/catalog/playlists
    pub async fn get_playlists(&self) -> Response {
        self.get("/v1/catalog/playlists").await
    }

    /// GET /v1/catalog/playlists/{id}
    pub async fn get_playlist(&self, id: i64) -> Response {
        self.get(&format!("/v1/catalog/playlists/{}", id)).await
    }

    /// POST /v1/catalog/playlists
    pub async fn create_playlist(&self, body: &Value) -> Response {
        self.post("/v1/catalog/playlists", body).await
    }

    /// PUT /v1/catalog/playlists/{id}
    pub async fn update_playlist(&self, id: i64, body: &Value) -> Response {
        self.put(&format!("/v1/catalog/playlists/{}", id), body)
            .await
    }

    /// DELETE /v1/catalog/playlists/{id}
    pub async fn delete_playlist(&self, id: i64) -> Response {
        self.delete(&format!("/v1/catalog/playlists/{}", id)).await
    }
}
