use anyhow::Result;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::error;

use crate::catalog_store::{
    validation, AlbumDraft, ArtistDraft, CatalogStore, PlaylistDraft, StoreError, TrackDraft,
};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;

use super::{log_requests, state::*, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    Json(stats)
}

/// Map a store failure to its response: not-found and capacity-exceeded are
/// client conditions, anything database-level is a plain 500.
fn store_error_response(err: StoreError) -> Response {
    match &err {
        StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()).into_response(),
        StoreError::CapacityExceeded { .. } => {
            (StatusCode::CONFLICT, err.to_string()).into_response()
        }
        StoreError::Database(db_err) => {
            error!("Catalog store failure: {}", db_err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn validation_error_response(violations: Vec<validation::FieldViolation>) -> Response {
    (StatusCode::BAD_REQUEST, Json(violations)).into_response()
}

// =============================================================================
// Artists
// =============================================================================

async fn get_artists(State(catalog): State<GuardedCatalogStore>) -> Response {
    match catalog.get_artists() {
        Ok(artists) => Json(artists).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn get_artist(
    State(catalog): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
) -> Response {
    match catalog.get_artist(id) {
        Ok(Some(artist)) => Json(artist).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn post_artist(
    State(catalog): State<GuardedCatalogStore>,
    Json(draft): Json<ArtistDraft>,
) -> Response {
    if let Err(violations) = validation::validate_artist(&draft) {
        return validation_error_response(violations);
    }
    match catalog.create_artist(&draft) {
        Ok(artist) => (StatusCode::CREATED, Json(artist)).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn put_artist(
    State(catalog): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
    Json(draft): Json<ArtistDraft>,
) -> Response {
    if let Err(violations) = validation::validate_artist(&draft) {
        return validation_error_response(violations);
    }
    match catalog.update_artist(id, &draft) {
        Ok(artist) => Json(artist).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn delete_artist(
    State(catalog): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
) -> Response {
    match catalog.delete_artist(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => store_error_response(err),
    }
}

// =============================================================================
// Albums
// =============================================================================

async fn get_albums(State(catalog): State<GuardedCatalogStore>) -> Response {
    match catalog.get_albums() {
        Ok(albums) => Json(albums).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn get_album(
    State(catalog): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
) -> Response {
    match catalog.get_album(id) {
        Ok(Some(album)) => Json(album).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn post_album(
    State(catalog): State<GuardedCatalogStore>,
    Json(draft): Json<AlbumDraft>,
) -> Response {
    if let Err(violations) = validation::validate_album(&draft) {
        return validation_error_response(violations);
    }
    match catalog.create_album(&draft) {
        Ok(album) => (StatusCode::CREATED, Json(album)).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn put_album(
    State(catalog): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
    Json(draft): Json<AlbumDraft>,
) -> Response {
    if let Err(violations) = validation::validate_album(&draft) {
        return validation_error_response(violations);
    }
    match catalog.update_album(id, &draft) {
        Ok(album) => Json(album).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn delete_album(
    State(catalog): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
) -> Response {
    match catalog.delete_album(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => store_error_response(err),
    }
}

// =============================================================================
// Tracks
// =============================================================================

async fn get_tracks(State(catalog): State<GuardedCatalogStore>) -> Response {
    match catalog.get_tracks() {
        Ok(tracks) => Json(tracks).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn get_track(
    State(catalog): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
) -> Response {
    match catalog.get_track(id) {
        Ok(Some(track)) => Json(track).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn post_track(
    State(catalog): State<GuardedCatalogStore>,
    Json(draft): Json<TrackDraft>,
) -> Response {
    if let Err(violations) = validation::validate_track(&draft) {
        return validation_error_response(violations);
    }
    match catalog.create_track(&draft) {
        Ok(track) => (StatusCode::CREATED, Json(track)).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn put_track(
    State(catalog): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
    Json(draft): Json<TrackDraft>,
) -> Response {
    if let Err(violations) = validation::validate_track(&draft) {
        return validation_error_response(violations);
    }
    match catalog.update_track(id, &draft) {
        Ok(track) => Json(track).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn delete_track(
    State(catalog): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
) -> Response {
    match catalog.delete_track(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => store_error_response(err),
    }
}

// =============================================================================
// Playlists
// =============================================================================

async fn get_playlists(State(catalog): State<GuardedCatalogStore>) -> Response {
    match catalog.get_playlists() {
        Ok(playlists) => Json(playlists).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn get_playlist(
    State(catalog): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
) -> Response {
    match catalog.get_playlist(id) {
        Ok(Some(playlist)) => Json(playlist).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn post_playlist(
    State(catalog): State<GuardedCatalogStore>,
    Json(draft): Json<PlaylistDraft>,
) -> Response {
    if let Err(violations) = validation::validate_playlist(&draft) {
        return validation_error_response(violations);
    }
    match catalog.create_playlist(&draft) {
        Ok(playlist) => (StatusCode::CREATED, Json(playlist)).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn put_playlist(
    State(catalog): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
    Json(draft): Json<PlaylistDraft>,
) -> Response {
    if let Err(violations) = validation::validate_playlist(&draft) {
        return validation_error_response(violations);
    }
    match catalog.update_playlist(id, &draft) {
        Ok(playlist) => Json(playlist).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn delete_playlist(
    State(catalog): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
) -> Response {
    match catalog.delete_playlist(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => store_error_response(err),
    }
}

impl ServerState {
    fn new(config: ServerConfig, catalog_store: GuardedCatalogStore) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            catalog_store,
        }
    }
}

pub fn make_app(config: ServerConfig, catalog_store: Arc<dyn CatalogStore>) -> Router {
    let state = ServerState::new(config, catalog_store);

    let catalog_routes: Router = Router::new()
        .route("/artists", get(get_artists))
        .route("/artists", post(post_artist))
        .route("/artists/{id}", get(get_artist))
        .route("/artists/{id}", put(put_artist))
        .route("/artists/{id}", delete(delete_artist))
        .route("/albums", get(get_albums))
        .route("/albums", post(post_album))
        .route("/albums/{id}", get(get_album))
        .route("/albums/{id}", put(put_album))
        .route("/albums/{id}", delete(delete_album))
        .route("/tracks", get(get_tracks))
        .route("/tracks", post(post_track))
        .route("/tracks/{id}", get(get_track))
        .route("/tracks/{id}", put(put_track))
        .route("/tracks/{id}", delete(delete_track))
        .route("/playlists", get(get_playlists))
        .route("/playlists", post(post_playlist))
        .route("/playlists/{id}", get(get_playlist))
        .route("/playlists/{id}", put(put_playlist))
        .route("/playlists/{id}", delete(delete_playlist))
        .with_state(state.clone());

    let home_router: Router = Router::new()
        .route("/", get(home))
        .with_state(state.clone());

    home_router
        .nest("/v1/catalog", catalog_routes)
        .layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server(
    catalog_store: Arc<dyn CatalogStore>,
    requests_logging_level: super::RequestsLoggingLevel,
    port: u16,
) -> Result<()> {
    let config = ServerConfig {
        port,
        requests_logging_level,
    };
    let app = make_app(config, catalog_store);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}
