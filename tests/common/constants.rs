//! Shared constants for end-to-end tests
//!
//! The fixture database is seeded in a fixed order into a fresh file, so
//! the assigned row ids are deterministic. When the seed data changes,
//! update only this file.

#![allow(dead_code)] // Not every test file uses every constant.

/// Timeout for every test HTTP request.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Seeded Artists
// ============================================================================

/// "The Test Band"
pub const ARTIST_1_ID: i64 = 1;
pub const ARTIST_1_NAME: &str = "The Test Band";

/// "Jazz Ensemble"
pub const ARTIST_2_ID: i64 = 2;
pub const ARTIST_2_NAME: &str = "Jazz Ensemble";

// ============================================================================
// Seeded Albums
// ============================================================================

/// "First Album" by The Test Band, declared song count 3 (full)
pub const ALBUM_1_ID: i64 = 1;
pub const ALBUM_1_TITLE: &str = "First Album";
pub const ALBUM_1_SONG_COUNT: i64 = 3;

/// "Jazz Collection" by Jazz Ensemble, declared song count 4 (one slot free)
pub const ALBUM_2_ID: i64 = 2;
pub const ALBUM_2_TITLE: &str = "Jazz Collection";
pub const ALBUM_2_SONG_COUNT: i64 = 4;

// ============================================================================
// Seeded Tracks
// ============================================================================

/// Tracks 1-3 fill First Album to its declared song count.
pub const TRACK_1_ID: i64 = 1;
pub const TRACK_1_TITLE: &str = "Opening Track";
pub const TRACK_2_ID: i64 = 2;
pub const TRACK_2_TITLE: &str = "Middle Track";
pub const TRACK_3_ID: i64 = 3;
pub const TRACK_3_TITLE: &str = "Closing Track";

/// Tracks 4-5 on Jazz Collection; it has one slot left.
pub const TRACK_4_ID: i64 = 4;
pub const TRACK_4_TITLE: &str = "Smooth Jazz";
pub const TRACK_5_ID: i64 = 5;
pub const TRACK_5_TITLE: &str = "Upbeat Jazz";
