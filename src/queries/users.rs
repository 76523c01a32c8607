use serde_json::{Map, Value};

use crate::DbConn;
use crate::error::{Error, Result};
use crate::models::users::{USER_COLUMNS, User, UserFilter};
use crate::queries::filter::{self, FilterParam};
use crate::queries::patch;

/// Loads a single user by id. The user may not exist; that is not an error.
pub async fn load(conn: &mut DbConn, id: &str) -> Result<Option<User>> {
    let query = format!(
        "select {} from users where id = $1",
        USER_COLUMNS.join(", ")
    );
    let user = sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(Error::Sqlx)?;

    Ok(user)
}

/// Inserts a new user. Returns the affected-row count.
pub async fn create(conn: &mut DbConn, user: &User) -> Result<u64> {
    let affected = sqlx::query(
        r#"
        insert into users (id, username, email, phone, date_of_birth)
        values ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(&user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.phone)
    .bind(user.date_of_birth)
    .execute(conn)
    .await
    .map_err(Error::Sqlx)?
    .rows_affected();

    Ok(affected)
}

/// Replaces every mutable column of an existing user.
///
/// Zero affected rows means the id does not exist; callers decide whether
/// that matters.
pub async fn update(conn: &mut DbConn, user: &User) -> Result<u64> {
    let affected = sqlx::query(
        r#"
        update users
        set username = $1, email = $2, phone = $3, date_of_birth = $4
        where id = $5
        "#,
    )
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.phone)
    .bind(user.date_of_birth)
    .bind(&user.id)
    .execute(conn)
    .await
    .map_err(Error::Sqlx)?
    .rows_affected();

    Ok(affected)
}

/// Applies a sparse, allow-listed patch. Returns the affected-row count.
pub async fn patch(conn: &mut DbConn, fields: &Map<String, Value>) -> Result<u64> {
    let (statement, params) = patch::compile_patch(fields)?;

    let mut query = sqlx::query(&statement);
    for param in &params {
        query = query.bind(param.as_str());
    }

    let affected = query
        .execute(conn)
        .await
        .map_err(Error::Sqlx)?
        .rows_affected();

    Ok(affected)
}

/// Deletes a user by id. Returns the affected-row count.
pub async fn delete(conn: &mut DbConn, id: &str) -> Result<u64> {
    let affected = sqlx::query("delete from users where id = $1")
        .bind(id)
        .execute(conn)
        .await
        .map_err(Error::Sqlx)?
        .rows_affected();

    Ok(affected)
}

/// Runs a filtered, paged search and the matching total count.
///
/// A non-positive limit short-circuits to an empty page without touching
/// the store, and a zero total skips the paging query entirely.
pub async fn search(conn: &mut DbConn, filter: &UserFilter) -> Result<(Vec<User>, i64)> {
    if filter.limit <= 0 {
        return Ok((Vec::new(), 0));
    }

    let (query, params) = filter::build_query(filter);
    let offset = filter::get_offset(filter.limit, filter.page);
    let count_query = filter::build_count_query(&query);
    let paging_query = filter::build_paging_query(&query, filter.limit, offset);

    let mut count_stmt = sqlx::query_scalar::<_, i64>(&count_query);
    for param in &params {
        count_stmt = match param {
            FilterParam::Text(text) => count_stmt.bind(text.as_str()),
            FilterParam::Date(date) => count_stmt.bind(*date),
        };
    }
    let total = count_stmt
        .fetch_one(&mut *conn)
        .await
        .map_err(Error::Sqlx)?;

    if total == 0 {
        return Ok((Vec::new(), 0));
    }

    let mut page_stmt = sqlx::query_as::<_, User>(&paging_query);
    for param in &params {
        page_stmt = match param {
            FilterParam::Text(text) => page_stmt.bind(text.as_str()),
            FilterParam::Date(date) => page_stmt.bind(*date),
        };
    }
    let users = page_stmt.fetch_all(conn).await.map_err(Error::Sqlx)?;

    Ok((users, total))
}
