//! Test fixture creation for the catalog database
//!
//! Seeds a fresh database through the store API so the fixture exercises
//! the same code path the server uses. Insert order is fixed, which makes
//! the assigned ids deterministic (see `constants.rs`).

use super::constants::*;
use anyhow::Result;
use discotheca::catalog_store::{
    AlbumDraft, ArtistDraft, CatalogStore, SqliteCatalogStore, TrackDraft,
};
use std::path::PathBuf;
use tempfile::TempDir;

/// Creates a temporary catalog seeded with 2 artists, 2 albums and 5 tracks.
/// Returns (temp_dir, db_path).
pub fn create_test_catalog() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("catalog.db");

    let store = SqliteCatalogStore::new(&db_path)?;

    let band = store.create_artist(&ArtistDraft {
        name: ARTIST_1_NAME.to_string(),
        age: 30,
        country: "USA".to_string(),
        label: "Sony".to_string(),
    })?;
    let ensemble = store.create_artist(&ArtistDraft {
        name: ARTIST_2_NAME.to_string(),
        age: 45,
        country: "France".to_string(),
        label: "Blue Note".to_string(),
    })?;

    let first_album = store.create_album(&AlbumDraft {
        title: ALBUM_1_TITLE.to_string(),
        length: 12.5,
        genre: "Rock".to_string(),
        year: 2020,
        song_count: ALBUM_1_SONG_COUNT,
        artist_id: band.id,
    })?;
    let jazz_collection = store.create_album(&AlbumDraft {
        title: ALBUM_2_TITLE.to_string(),
        length: 38.0,
        genre: "Jazz".to_string(),
        year: 2019,
        song_count: ALBUM_2_SONG_COUNT,
        artist_id: ensemble.id,
    })?;

    for title in [TRACK_1_TITLE, TRACK_2_TITLE, TRACK_3_TITLE] {
        store.create_track(&TrackDraft {
            title: title.to_string(),
            duration_secs: 240,
            genre: "Rock".to_string(),
            album_id: first_album.id,
        })?;
    }
    for title in [TRACK_4_TITLE, TRACK_5_TITLE] {
        store.create_track(&TrackDraft {
            title: title.to_string(),
            duration_secs: 180,
            genre: "Jazz".to_string(),
            album_id: jazz_collection.id,
        })?;
    }

    Ok((dir, db_path))
}

/// Creates a temporary catalog with no rows at all.
/// Returns (temp_dir, db_path).
pub fn create_empty_catalog() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("catalog.db");
    let _store = SqliteCatalogStore::new(&db_path)?;
    Ok((dir, db_path))
}
