//! Validation for catalog submissions.
//!
//! Validators are pure: they inspect only the submitted draft, never the
//! store. Every violated rule on a submission is reported, not just the
//! first one, so a client can fix a bad payload in one round trip.

use super::models::{AlbumDraft, ArtistDraft, PlaylistDraft, TrackDraft};
use chrono::Datelike;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

const MAX_NAME_LEN: usize = 100;
const MAX_SHORT_TEXT_LEN: usize = 50;
const MAX_DESCRIPTION_LEN: usize = 300;
const MIN_ALBUM_YEAR: i64 = 1900;
const MAX_TRACK_DURATION_SECS: i64 = 3600;
const MIN_ARTIST_AGE: i64 = 10;
const MAX_ARTIST_AGE: i64 = 120;

/// A single violated rule on a submitted field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub type ValidationResult = Result<(), Vec<FieldViolation>>;

struct Violations(Vec<FieldViolation>);

impl Violations {
    fn new() -> Self {
        Violations(Vec::new())
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldViolation {
            field,
            message: message.into(),
        });
    }

    fn require_text(&mut self, field: &'static str, value: &str, max_len: usize) {
        if value.trim().is_empty() {
            self.push(field, "must not be empty");
        } else if value.chars().count() > max_len {
            self.push(field, format!("must be at most {} characters", max_len));
        }
    }

    fn limit_text(&mut self, field: &'static str, value: &str, max_len: usize) {
        if value.chars().count() > max_len {
            self.push(field, format!("must be at most {} characters", max_len));
        }
    }

    fn finish(self) -> ValidationResult {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.0)
        }
    }
}

pub fn validate_artist(draft: &ArtistDraft) -> ValidationResult {
    let mut violations = Violations::new();
    violations.require_text("name", &draft.name, MAX_NAME_LEN);
    if !(MIN_ARTIST_AGE..=MAX_ARTIST_AGE).contains(&draft.age) {
        violations.push(
            "age",
            format!("must be between {} and {}", MIN_ARTIST_AGE, MAX_ARTIST_AGE),
        );
    }
    violations.require_text("country", &draft.country, MAX_SHORT_TEXT_LEN);
    violations.limit_text("label", &draft.label, MAX_SHORT_TEXT_LEN);
    violations.finish()
}

pub fn validate_album(draft: &AlbumDraft) -> ValidationResult {
    let mut violations = Violations::new();
    violations.require_text("title", &draft.title, MAX_NAME_LEN);
    if draft.length <= 0.0 {
        violations.push("length", "must be positive");
    }
    let current_year = i64::from(chrono::Utc::now().year());
    if !(MIN_ALBUM_YEAR..=current_year).contains(&draft.year) {
        violations.push(
            "year",
            format!("must be between {} and {}", MIN_ALBUM_YEAR, current_year),
        );
    }
    if draft.song_count <= 0 {
        violations.push("song_count", "must be at least 1");
    }
    violations.require_text("genre", &draft.genre, MAX_SHORT_TEXT_LEN);
    violations.finish()
}

pub fn validate_track(draft: &TrackDraft) -> ValidationResult {
    let mut violations = Violations::new();
    violations.require_text("title", &draft.title, MAX_NAME_LEN);
    if draft.duration_secs <= 0 {
        violations.push("duration_secs", "must be positive");
    } else if draft.duration_secs >= MAX_TRACK_DURATION_SECS {
        violations.push("duration_secs", "must be shorter than one hour");
    }
    violations.require_text("genre", &draft.genre, MAX_SHORT_TEXT_LEN);
    violations.finish()
}

pub fn validate_playlist(draft: &PlaylistDraft) -> ValidationResult {
    let mut violations = Violations::new();
    violations.require_text("name", &draft.name, MAX_NAME_LEN);
    if let Some(description) = &draft.description {
        violations.limit_text("description", description, MAX_DESCRIPTION_LEN);
    }
    if draft.track_ids.iter().any(|id| *id <= 0) {
        violations.push("track_ids", "every track id must be positive");
    }
    let mut seen = HashSet::new();
    if !draft.track_ids.iter().all(|id| seen.insert(*id)) {
        violations.push("track_ids", "track ids must be unique within the playlist");
    }
    violations.finish()
}
