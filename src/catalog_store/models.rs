//! Catalog entity models.
//!
//! Persisted records carry the store-assigned integer identity; the
//! `*Draft` shapes are what clients submit (no identity, validated before
//! any store call). The `Resolved*` shapes are what reads return, with
//! immediate children attached. Ownership is one-directional (children
//! never point back at their parent), so the resolved shapes serialize
//! without cycles.

use serde::{Deserialize, Serialize};

// =============================================================================
// Core Entities
// =============================================================================

/// Artist entity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub country: String,
    pub label: String,
}

/// Album entity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: i64,
    pub title: String,
    /// Total duration, minutes.
    pub length: f64,
    pub genre: String,
    pub year: i64,
    /// Declared number of songs; the store never lets the number of
    /// associated tracks grow past this.
    pub song_count: i64,
    pub artist_id: i64,
}

/// Track entity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: i64,
    pub title: String,
    pub duration_secs: i64,
    pub genre: String,
    pub album_id: i64,
}

/// Playlist entity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

// =============================================================================
// Input Drafts
// =============================================================================

/// Artist submission shape
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArtistDraft {
    pub name: String,
    pub age: i64,
    pub country: String,
    #[serde(default)]
    pub label: String,
}

/// Album submission shape
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlbumDraft {
    pub title: String,
    pub length: f64,
    pub genre: String,
    pub year: i64,
    pub song_count: i64,
    pub artist_id: i64,
}

/// Track submission shape
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackDraft {
    pub title: String,
    pub duration_secs: i64,
    pub genre: String,
    pub album_id: i64,
}

/// Playlist submission shape; `track_ids` is the full ordered set of
/// references to attach, replacing whatever was attached before.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaylistDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub track_ids: Vec<i64>,
}

// =============================================================================
// Resolved/Composite Types (read responses)
// =============================================================================

/// Artist with its albums attached
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolvedArtist {
    pub artist: Artist,
    pub albums: Vec<Album>,
}

/// Album with its artist and tracks attached
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolvedAlbum {
    pub album: Album,
    pub artist: Artist,
    pub tracks: Vec<Track>,
}

/// Track with its album and that album's artist attached
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolvedTrack {
    pub track: Track,
    pub album: Album,
    pub artist: Artist,
}

/// One ordered slot in a playlist
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub position: i64,
    pub track: Track,
}

/// Playlist with its ordered entries attached
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolvedPlaylist {
    pub playlist: Playlist,
    pub entries: Vec<PlaylistEntry>,
}
