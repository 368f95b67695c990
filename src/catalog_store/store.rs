//! SQLite-backed catalog store implementation.
//!
//! One mutex-guarded write connection plus a small round-robin pool of
//! read-only connections. Every write operation runs as a single
//! `BEGIN IMMEDIATE` transaction on the write connection, so read-then-write
//! checks (the album capacity ceiling in particular) cannot interleave with
//! a concurrent write.

use super::error::{StoreError, StoreResult};
use super::models::*;
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::CatalogStore;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

const DEFAULT_READ_POOL_SIZE: usize = 4;

#[derive(Clone)]
pub struct SqliteCatalogStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

fn init_schema(conn: &Connection) -> Result<()> {
    let schema = &CATALOG_VERSIONED_SCHEMAS[CATALOG_VERSIONED_SCHEMAS.len() - 1];

    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
            [],
            |r| r.get(0),
        )
        .unwrap_or(0);

    if table_count == 0 {
        info!("Creating catalog db schema at version {}", schema.version);
        schema.create(conn)?;
    } else {
        schema
            .validate(conn)
            .context("Existing catalog database does not match the expected schema")?;
    }
    Ok(())
}

impl SqliteCatalogStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        Self::with_read_pool_size(db_path, DEFAULT_READ_POOL_SIZE)
    }

    pub fn with_read_pool_size<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path_ref = db_path.as_ref();

        let write_conn = Connection::open_with_flags(
            db_path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open catalog database")?;

        init_schema(&write_conn)?;

        write_conn.pragma_update(None, "journal_mode", "WAL")?;
        // Cascades only fire on connections with foreign keys enabled.
        write_conn.pragma_update(None, "foreign_keys", "ON")?;

        let artist_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM artists", [], |r| r.get(0))
            .unwrap_or(0);
        let album_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM albums", [], |r| r.get(0))
            .unwrap_or(0);
        let track_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM tracks", [], |r| r.get(0))
            .unwrap_or(0);
        let playlist_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM playlists", [], |r| r.get(0))
            .unwrap_or(0);

        info!(
            "Opened catalog: {} artists, {} albums, {} tracks, {} playlists",
            artist_count, album_count, track_count, playlist_count
        );

        let mut read_pool = Vec::with_capacity(read_pool_size);
        for _ in 0..read_pool_size {
            let read_conn = Connection::open_with_flags(
                db_path_ref,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                    | rusqlite::OpenFlags::SQLITE_OPEN_URI
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            read_conn.pragma_update(None, "journal_mode", "WAL")?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        Ok(SqliteCatalogStore {
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_pool,
            read_index: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    /// Run `op` as one write transaction, committing on success and rolling
    /// back on any failure.
    fn write_transaction<T>(
        &self,
        op: impl FnOnce(&Connection) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute("BEGIN IMMEDIATE", [])?;

        match op(&conn) {
            Ok(value) => {
                conn.execute("COMMIT", [])?;
                Ok(value)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    // =========================================================================
    // Row Helpers
    // =========================================================================

    fn artist_row(conn: &Connection, id: i64) -> StoreResult<Option<Artist>> {
        let mut stmt = conn.prepare_cached(
            "SELECT id, name, age, country, label FROM artists WHERE id = ?1",
        )?;
        Ok(stmt
            .query_row(params![id], Self::parse_artist_row)
            .optional()?)
    }

    fn parse_artist_row(row: &rusqlite::Row) -> rusqlite::Result<Artist> {
        Ok(Artist {
            id: row.get(0)?,
            name: row.get(1)?,
            age: row.get(2)?,
            country: row.get(3)?,
            label: row.get(4)?,
        })
    }

    fn album_row(conn: &Connection, id: i64) -> StoreResult<Option<Album>> {
        let mut stmt = conn.prepare_cached(
            "SELECT id, title, length, genre, year, song_count, artist_id
             FROM albums WHERE id = ?1",
        )?;
        Ok(stmt
            .query_row(params![id], Self::parse_album_row)
            .optional()?)
    }

    fn parse_album_row(row: &rusqlite::Row) -> rusqlite::Result<Album> {
        Ok(Album {
            id: row.get(0)?,
            title: row.get(1)?,
            length: row.get(2)?,
            genre: row.get(3)?,
            year: row.get(4)?,
            song_count: row.get(5)?,
            artist_id: row.get(6)?,
        })
    }

    fn track_row(conn: &Connection, id: i64) -> StoreResult<Option<Track>> {
        let mut stmt = conn.prepare_cached(
            "SELECT id, title, duration_secs, genre, album_id FROM tracks WHERE id = ?1",
        )?;
        Ok(stmt
            .query_row(params![id], Self::parse_track_row)
            .optional()?)
    }

    fn parse_track_row(row: &rusqlite::Row) -> rusqlite::Result<Track> {
        Ok(Track {
            id: row.get(0)?,
            title: row.get(1)?,
            duration_secs: row.get(2)?,
            genre: row.get(3)?,
            album_id: row.get(4)?,
        })
    }

    fn playlist_row(conn: &Connection, id: i64) -> StoreResult<Option<Playlist>> {
        let mut stmt = conn
            .prepare_cached("SELECT id, name, description FROM playlists WHERE id = ?1")?;
        Ok(stmt
            .query_row(params![id], Self::parse_playlist_row)
            .optional()?)
    }

    fn parse_playlist_row(row: &rusqlite::Row) -> rusqlite::Result<Playlist> {
        Ok(Playlist {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
        })
    }

    fn albums_for_artist(conn: &Connection, artist_id: i64) -> StoreResult<Vec<Album>> {
        let mut stmt = conn.prepare_cached(
            "SELECT id, title, length, genre, year, song_count, artist_id
             FROM albums WHERE artist_id = ?1 ORDER BY id",
        )?;
        let albums = stmt
            .query_map(params![artist_id], Self::parse_album_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(albums)
    }

    fn tracks_for_album(conn: &Connection, album_id: i64) -> StoreResult<Vec<Track>> {
        let mut stmt = conn.prepare_cached(
            "SELECT id, title, duration_secs, genre, album_id
             FROM tracks WHERE album_id = ?1 ORDER BY id",
        )?;
        let tracks = stmt
            .query_map(params![album_id], Self::parse_track_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tracks)
    }

    fn entries_for_playlist(conn: &Connection, playlist_id: i64) -> StoreResult<Vec<PlaylistEntry>> {
        let mut stmt = conn.prepare_cached(
            "SELECT pt.position, t.id, t.title, t.duration_secs, t.genre, t.album_id
             FROM playlist_tracks pt
             JOIN tracks t ON t.id = pt.track_id
             WHERE pt.playlist_id = ?1
             ORDER BY pt.position",
        )?;
        let entries = stmt
            .query_map(params![playlist_id], |row| {
                Ok(PlaylistEntry {
                    position: row.get(0)?,
                    track: Track {
                        id: row.get(1)?,
                        title: row.get(2)?,
                        duration_secs: row.get(3)?,
                        genre: row.get(4)?,
                        album_id: row.get(5)?,
                    },
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Attached artist of an album. The foreign key guarantees presence,
    /// so an absent row surfaces as a database fault, not `NotFound`.
    fn owning_artist(conn: &Connection, artist_id: i64) -> StoreResult<Artist> {
        let mut stmt = conn.prepare_cached(
            "SELECT id, name, age, country, label FROM artists WHERE id = ?1",
        )?;
        Ok(stmt.query_row(params![artist_id], Self::parse_artist_row)?)
    }

    fn resolve_album(conn: &Connection, album: Album) -> StoreResult<ResolvedAlbum> {
        let artist = Self::owning_artist(conn, album.artist_id)?;
        let tracks = Self::tracks_for_album(conn, album.id)?;
        Ok(ResolvedAlbum {
            album,
            artist,
            tracks,
        })
    }

    fn resolve_track(conn: &Connection, track: Track) -> StoreResult<ResolvedTrack> {
        let mut stmt = conn.prepare_cached(
            "SELECT id, title, length, genre, year, song_count, artist_id
             FROM albums WHERE id = ?1",
        )?;
        let album = stmt.query_row(params![track.album_id], Self::parse_album_row)?;
        let artist = Self::owning_artist(conn, album.artist_id)?;
        Ok(ResolvedTrack {
            track,
            album,
            artist,
        })
    }

    /// Album song_count, or `NotFound` when the album is absent. Used by
    /// the capacity check inside write transactions.
    fn album_song_count(conn: &Connection, album_id: i64) -> StoreResult<i64> {
        let mut stmt = conn.prepare_cached("SELECT song_count FROM albums WHERE id = ?1")?;
        stmt.query_row(params![album_id], |r| r.get(0))
            .optional()?
            .ok_or(StoreError::not_found("album", album_id))
    }

    fn album_track_count(conn: &Connection, album_id: i64) -> StoreResult<i64> {
        let mut stmt =
            conn.prepare_cached("SELECT COUNT(*) FROM tracks WHERE album_id = ?1")?;
        Ok(stmt.query_row(params![album_id], |r| r.get(0))?)
    }

    fn require_artist(conn: &Connection, artist_id: i64) -> StoreResult<()> {
        let mut stmt = conn.prepare_cached("SELECT 1 FROM artists WHERE id = ?1")?;
        stmt.query_row(params![artist_id], |_| Ok(()))
            .optional()?
            .ok_or(StoreError::not_found("artist", artist_id))
    }

    fn require_track(conn: &Connection, track_id: i64) -> StoreResult<()> {
        let mut stmt = conn.prepare_cached("SELECT 1 FROM tracks WHERE id = ?1")?;
        stmt.query_row(params![track_id], |_| Ok(()))
            .optional()?
            .ok_or(StoreError::not_found("track", track_id))
    }

    fn replace_playlist_entries(
        conn: &Connection,
        playlist_id: i64,
        track_ids: &[i64],
    ) -> StoreResult<()> {
        conn.execute(
            "DELETE FROM playlist_tracks WHERE playlist_id = ?1",
            params![playlist_id],
        )?;
        for (position, track_id) in track_ids.iter().enumerate() {
            Self::require_track(conn, *track_id)?;
            conn.execute(
                "INSERT INTO playlist_tracks (playlist_id, track_id, position) VALUES (?1, ?2, ?3)",
                params![playlist_id, track_id, position as i64],
            )?;
        }
        Ok(())
    }
}

impl CatalogStore for SqliteCatalogStore {
    // =========================================================================
    // Artists
    // =========================================================================

    fn get_artists(&self) -> StoreResult<Vec<ResolvedArtist>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let mut stmt = conn
            .prepare_cached("SELECT id, name, age, country, label FROM artists ORDER BY id")?;
        let artists = stmt
            .query_map([], Self::parse_artist_row)?
            .collect::<Result<Vec<_>, _>>()?;

        artists
            .into_iter()
            .map(|artist| {
                let albums = Self::albums_for_artist(&conn, artist.id)?;
                Ok(ResolvedArtist { artist, albums })
            })
            .collect()
    }

    fn get_artist(&self, id: i64) -> StoreResult<Option<ResolvedArtist>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let Some(artist) = Self::artist_row(&conn, id)? else {
            return Ok(None);
        };
        let albums = Self::albums_for_artist(&conn, artist.id)?;
        Ok(Some(ResolvedArtist { artist, albums }))
    }

    fn create_artist(&self, draft: &ArtistDraft) -> StoreResult<Artist> {
        self.write_transaction(|conn| {
            conn.execute(
                "INSERT INTO artists (name, age, country, label) VALUES (?1, ?2, ?3, ?4)",
                params![&draft.name, draft.age, &draft.country, &draft.label],
            )?;
            Ok(Artist {
                id: conn.last_insert_rowid(),
                name: draft.name.clone(),
                age: draft.age,
                country: draft.country.clone(),
                label: draft.label.clone(),
            })
        })
    }

    fn update_artist(&self, id: i64, draft: &ArtistDraft) -> StoreResult<Artist> {
        self.write_transaction(|conn| {
            if Self::artist_row(conn, id)?.is_none() {
                return Err(StoreError::not_found("artist", id));
            }
            conn.execute(
                "UPDATE artists SET name = ?1, age = ?2, country = ?3, label = ?4 WHERE id = ?5",
                params![&draft.name, draft.age, &draft.country, &draft.label, id],
            )?;
            Ok(Artist {
                id,
                name: draft.name.clone(),
                age: draft.age,
                country: draft.country.clone(),
                label: draft.label.clone(),
            })
        })
    }

    fn delete_artist(&self, id: i64) -> StoreResult<()> {
        self.write_transaction(|conn| {
            let deleted = conn.execute("DELETE FROM artists WHERE id = ?1", params![id])?;
            if deleted == 0 {
                return Err(StoreError::not_found("artist", id));
            }
            Ok(())
        })
    }

    // =========================================================================
    // Albums
    // =========================================================================

    fn get_albums(&self) -> StoreResult<Vec<ResolvedAlbum>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let mut stmt = conn.prepare_cached(
            "SELECT id, title, length, genre, year, song_count, artist_id
             FROM albums ORDER BY id",
        )?;
        let albums = stmt
            .query_map([], Self::parse_album_row)?
            .collect::<Result<Vec<_>, _>>()?;

        albums
            .into_iter()
            .map(|album| Self::resolve_album(&conn, album))
            .collect()
    }

    fn get_album(&self, id: i64) -> StoreResult<Option<ResolvedAlbum>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        match Self::album_row(&conn, id)? {
            Some(album) => Ok(Some(Self::resolve_album(&conn, album)?)),
            None => Ok(None),
        }
    }

    fn create_album(&self, draft: &AlbumDraft) -> StoreResult<Album> {
        self.write_transaction(|conn| {
            Self::require_artist(conn, draft.artist_id)?;
            conn.execute(
                "INSERT INTO albums (title, length, genre, year, song_count, artist_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    &draft.title,
                    draft.length,
                    &draft.genre,
                    draft.year,
                    draft.song_count,
                    draft.artist_id
                ],
            )?;
            Ok(Album {
                id: conn.last_insert_rowid(),
                title: draft.title.clone(),
                length: draft.length,
                genre: draft.genre.clone(),
                year: draft.year,
                song_count: draft.song_count,
                artist_id: draft.artist_id,
            })
        })
    }

    fn update_album(&self, id: i64, draft: &AlbumDraft) -> StoreResult<Album> {
        self.write_transaction(|conn| {
            if Self::album_row(conn, id)?.is_none() {
                return Err(StoreError::not_found("album", id));
            }
            Self::require_artist(conn, draft.artist_id)?;
            conn.execute(
                "UPDATE albums SET title = ?1, length = ?2, genre = ?3, year = ?4,
                 song_count = ?5, artist_id = ?6 WHERE id = ?7",
                params![
                    &draft.title,
                    draft.length,
                    &draft.genre,
                    draft.year,
                    draft.song_count,
                    draft.artist_id,
                    id
                ],
            )?;
            Ok(Album {
                id,
                title: draft.title.clone(),
                length: draft.length,
                genre: draft.genre.clone(),
                year: draft.year,
                song_count: draft.song_count,
                artist_id: draft.artist_id,
            })
        })
    }

    fn delete_album(&self, id: i64) -> StoreResult<()> {
        self.write_transaction(|conn| {
            let deleted = conn.execute("DELETE FROM albums WHERE id = ?1", params![id])?;
            if deleted == 0 {
                return Err(StoreError::not_found("album", id));
            }
            Ok(())
        })
    }

    // =========================================================================
    // Tracks
    // =========================================================================

    fn get_tracks(&self) -> StoreResult<Vec<ResolvedTrack>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let mut stmt = conn.prepare_cached(
            "SELECT id, title, duration_secs, genre, album_id FROM tracks ORDER BY id",
        )?;
        let tracks = stmt
            .query_map([], Self::parse_track_row)?
            .collect::<Result<Vec<_>, _>>()?;

        tracks
            .into_iter()
            .map(|track| Self::resolve_track(&conn, track))
            .collect()
    }

    fn get_track(&self, id: i64) -> StoreResult<Option<ResolvedTrack>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        match Self::track_row(&conn, id)? {
            Some(track) => Ok(Some(Self::resolve_track(&conn, track)?)),
            None => Ok(None),
        }
    }

    fn create_track(&self, draft: &TrackDraft) -> StoreResult<Track> {
        self.write_transaction(|conn| {
            let song_count = Self::album_song_count(conn, draft.album_id)?;
            let track_count = Self::album_track_count(conn, draft.album_id)?;
            if track_count >= song_count {
                return Err(StoreError::CapacityExceeded {
                    album_id: draft.album_id,
                    song_count,
                });
            }

            conn.execute(
                "INSERT INTO tracks (title, duration_secs, genre, album_id)
                 VALUES (?1, ?2, ?3, ?4)",
                params![&draft.title, draft.duration_secs, &draft.genre, draft.album_id],
            )?;
            Ok(Track {
                id: conn.last_insert_rowid(),
                title: draft.title.clone(),
                duration_secs: draft.duration_secs,
                genre: draft.genre.clone(),
                album_id: draft.album_id,
            })
        })
    }

    fn update_track(&self, id: i64, draft: &TrackDraft) -> StoreResult<Track> {
        self.write_transaction(|conn| {
            let Some(existing) = Self::track_row(conn, id)? else {
                return Err(StoreError::not_found("track", id));
            };

            let song_count = Self::album_song_count(conn, draft.album_id)?;
            // Moving the track to another album counts against the
            // destination's ceiling; staying put does not change the count.
            if existing.album_id != draft.album_id {
                let track_count = Self::album_track_count(conn, draft.album_id)?;
                if track_count >= song_count {
                    return Err(StoreError::CapacityExceeded {
                        album_id: draft.album_id,
                        song_count,
                    });
                }
            }

            conn.execute(
                "UPDATE tracks SET title = ?1, duration_secs = ?2, genre = ?3, album_id = ?4
                 WHERE id = ?5",
                params![&draft.title, draft.duration_secs, &draft.genre, draft.album_id, id],
            )?;
            Ok(Track {
                id,
                title: draft.title.clone(),
                duration_secs: draft.duration_secs,
                genre: draft.genre.clone(),
                album_id: draft.album_id,
            })
        })
    }

    fn delete_track(&self, id: i64) -> StoreResult<()> {
        self.write_transaction(|conn| {
            let deleted = conn.execute("DELETE FROM tracks WHERE id = ?1", params![id])?;
            if deleted == 0 {
                return Err(StoreError::not_found("track", id));
            }
            Ok(())
        })
    }

    // =========================================================================
    // Playlists
    // =========================================================================

    fn get_playlists(&self) -> StoreResult<Vec<ResolvedPlaylist>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let mut stmt =
            conn.prepare_cached("SELECT id, name, description FROM playlists ORDER BY id")?;
        let playlists = stmt
            .query_map([], Self::parse_playlist_row)?
            .collect::<Result<Vec<_>, _>>()?;

        playlists
            .into_iter()
            .map(|playlist| {
                let entries = Self::entries_for_playlist(&conn, playlist.id)?;
                Ok(ResolvedPlaylist { playlist, entries })
            })
            .collect()
    }

    fn get_playlist(&self, id: i64) -> StoreResult<Option<ResolvedPlaylist>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let Some(playlist) = Self::playlist_row(&conn, id)? else {
            return Ok(None);
        };
        let entries = Self::entries_for_playlist(&conn, playlist.id)?;
        Ok(Some(ResolvedPlaylist { playlist, entries }))
    }

    fn create_playlist(&self, draft: &PlaylistDraft) -> StoreResult<Playlist> {
        self.write_transaction(|conn| {
            conn.execute(
                "INSERT INTO playlists (name, description) VALUES (?1, ?2)",
                params![&draft.name, &draft.description],
            )?;
            let id = conn.last_insert_rowid();
            Self::replace_playlist_entries(conn, id, &draft.track_ids)?;
            Ok(Playlist {
                id,
                name: draft.name.clone(),
                description: draft.description.clone(),
            })
        })
    }

    fn update_playlist(&self, id: i64, draft: &PlaylistDraft) -> StoreResult<Playlist> {
        self.write_transaction(|conn| {
            if Self::playlist_row(conn, id)?.is_none() {
                return Err(StoreError::not_found("playlist", id));
            }
            conn.execute(
                "UPDATE playlists SET name = ?1, description = ?2 WHERE id = ?3",
                params![&draft.name, &draft.description, id],
            )?;
            Self::replace_playlist_entries(conn, id, &draft.track_ids)?;
            Ok(Playlist {
                id,
                name: draft.name.clone(),
                description: draft.description.clone(),
            })
        })
    }

    fn delete_playlist(&self, id: i64) -> StoreResult<()> {
        self.write_transaction(|conn| {
            let deleted = conn.execute("DELETE FROM playlists WHERE id = ?1", params![id])?;
            if deleted == 0 {
                return Err(StoreError::not_found("playlist", id));
            }
            Ok(())
        })
    }
}
