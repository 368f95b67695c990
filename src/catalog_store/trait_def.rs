//! CatalogStore trait definition.
//!
//! The seam between the HTTP layer and persistence: one uniform set of
//! operations per entity type. Reads return resolved shapes with children
//! attached; `get_*` by id returns `None` for an absent row, while write
//! operations on an absent row report `StoreError::NotFound`.

use super::error::StoreResult;
use super::models::*;

pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Artists
    // =========================================================================

    fn get_artists(&self) -> StoreResult<Vec<ResolvedArtist>>;

    fn get_artist(&self, id: i64) -> StoreResult<Option<ResolvedArtist>>;

    fn create_artist(&self, draft: &ArtistDraft) -> StoreResult<Artist>;

    /// Overwrite every mutable field of an existing artist.
    fn update_artist(&self, id: i64, draft: &ArtistDraft) -> StoreResult<Artist>;

    fn delete_artist(&self, id: i64) -> StoreResult<()>;

    // =========================================================================
    // Albums
    // =========================================================================

    fn get_albums(&self) -> StoreResult<Vec<ResolvedAlbum>>;

    fn get_album(&self, id: i64) -> StoreResult<Option<ResolvedAlbum>>;

    /// The referenced artist must exist.
    fn create_album(&self, draft: &AlbumDraft) -> StoreResult<Album>;

    fn update_album(&self, id: i64, draft: &AlbumDraft) -> StoreResult<Album>;

    fn delete_album(&self, id: i64) -> StoreResult<()>;

    // =========================================================================
    // Tracks
    // =========================================================================

    fn get_tracks(&self) -> StoreResult<Vec<ResolvedTrack>>;

    fn get_track(&self, id: i64) -> StoreResult<Option<ResolvedTrack>>;

    /// The parent album must exist and must not already hold its declared
    /// song count; otherwise `NotFound` / `CapacityExceeded`.
    fn create_track(&self, draft: &TrackDraft) -> StoreResult<Track>;

    /// Full replacement; moving the track to another album re-checks that
    /// album's capacity.
    fn update_track(&self, id: i64, draft: &TrackDraft) -> StoreResult<Track>;

    fn delete_track(&self, id: i64) -> StoreResult<()>;

    // =========================================================================
    // Playlists
    // =========================================================================

    fn get_playlists(&self) -> StoreResult<Vec<ResolvedPlaylist>>;

    fn get_playlist(&self, id: i64) -> StoreResult<Option<ResolvedPlaylist>>;

    /// Every referenced track must exist; association rows are written in
    /// draft order with positions starting at 0.
    fn create_playlist(&self, draft: &PlaylistDraft) -> StoreResult<Playlist>;

    /// Full replacement, including the attached track set.
    fn update_playlist(&self, id: i64, draft: &PlaylistDraft) -> StoreResult<Playlist>;

    fn delete_playlist(&self, id: i64) -> StoreResult<()>;
}
