use crate::database::DbPool;

/// Application state shared across all HTTP handlers.
///
/// Everything here is immutable after startup and cheap to clone, so
/// request handlers can read it concurrently without coordination.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for accessing the database
    pub pool: DbPool,
}

impl AppState {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}
