use thiserror::Error;

/// Failure conditions a store operation can report.
///
/// `NotFound` and `CapacityExceeded` are the recoverable business
/// conditions the HTTP layer maps to client responses; `Database` is an
/// unhandled store fault and propagates as-is.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("album {album_id} already holds its declared {song_count} songs")]
    CapacityExceeded { album_id: i64, song_count: i64 },

    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        StoreError::NotFound { entity, id }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
