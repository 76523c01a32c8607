//! Use-case layer for user operations.
//!
//! Every mutating call owns exactly one transaction: begin, hand the
//! handle to the repository, then commit or roll back — never both, never
//! neither. Reads go straight to the repository on a pooled connection.

use serde_json::{Map, Value};

use crate::DbPool;
use crate::error::{Error, Result};
use crate::models::users::{User, UserFilter};
use crate::queries::users;

/// Loads a user by id. Read-only, no transaction.
pub async fn load(pool: &DbPool, id: &str) -> Result<Option<User>> {
    let mut conn = pool.acquire().await.map_err(Error::Sqlx)?;
    users::load(&mut conn, id).await
}

/// Creates a user inside its own transaction.
pub async fn create(pool: &DbPool, user: &User) -> Result<u64> {
    let mut tx = pool.begin().await.map_err(Error::Sqlx)?;
    match users::create(&mut tx, user).await {
        Ok(affected) => {
            tx.commit().await.map_err(Error::Sqlx)?;
            Ok(affected)
        }
        Err(err) => rollback(tx, err).await,
    }
}

/// Replaces a user's mutable columns inside its own transaction.
///
/// An unknown id surfaces as zero affected rows, not an error.
pub async fn update(pool: &DbPool, user: &User) -> Result<u64> {
    let mut tx = pool.begin().await.map_err(Error::Sqlx)?;
    match users::update(&mut tx, user).await {
        Ok(affected) => {
            tx.commit().await.map_err(Error::Sqlx)?;
            Ok(affected)
        }
        Err(err) => rollback(tx, err).await,
    }
}

/// Applies an allow-listed partial update inside its own transaction.
///
/// A patch the compiler rejects (missing id, nothing to change) still
/// closes the transaction on its way out.
pub async fn patch(pool: &DbPool, fields: &Map<String, Value>) -> Result<u64> {
    let mut tx = pool.begin().await.map_err(Error::Sqlx)?;
    match users::patch(&mut tx, fields).await {
        Ok(affected) => {
            tx.commit().await.map_err(Error::Sqlx)?;
            Ok(affected)
        }
        Err(err) => rollback(tx, err).await,
    }
}

/// Deletes a user inside its own transaction.
pub async fn delete(pool: &DbPool, id: &str) -> Result<u64> {
    let mut tx = pool.begin().await.map_err(Error::Sqlx)?;
    match users::delete(&mut tx, id).await {
        Ok(affected) => {
            tx.commit().await.map_err(Error::Sqlx)?;
            Ok(affected)
        }
        Err(err) => rollback(tx, err).await,
    }
}

/// Searches users. Read-only, no transaction.
pub async fn search(pool: &DbPool, filter: &UserFilter) -> Result<(Vec<User>, i64)> {
    // a non-positive limit never touches the store, not even for a connection
    if filter.limit <= 0 {
        return Ok((Vec::new(), 0));
    }
    let mut conn = pool.acquire().await.map_err(Error::Sqlx)?;
    users::search(&mut conn, filter).await
}

/// Rolls back after a failed repository call.
///
/// A failed rollback leaves the transaction state unknown, so its error
/// takes precedence over the original one.
async fn rollback<T>(tx: sqlx::Transaction<'_, sqlx::Postgres>, err: Error) -> Result<T> {
    match tx.rollback().await {
        Ok(()) => Err(err),
        Err(rollback_err) => Err(Error::Sqlx(rollback_err)),
    }
}
