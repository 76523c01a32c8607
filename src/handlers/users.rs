//! User CRUD and search handlers.
//!
//! Handlers follow the thin-layer pattern: decode the request, reconcile
//! the path id with the body, validate, then delegate to the service
//! layer. All query construction and transaction handling lives below.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    error::{Error, Result},
    models::users::{DateRange, SearchResult, User, UserFilter},
    services::users,
    state::AppState,
    validation,
};

/// Flat query-string form of a `UserFilter`, used by GET search.
///
/// The JSON body form nests the date range; query strings cannot, so the
/// bounds are spelled out as two parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub id: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth_min: Option<NaiveDate>,
    pub date_of_birth_max: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

impl From<SearchParams> for UserFilter {
    fn from(params: SearchParams) -> Self {
        let date_of_birth = match (params.date_of_birth_min, params.date_of_birth_max) {
            (None, None) => None,
            (min, max) => Some(DateRange { min, max }),
        };
        UserFilter {
            id: params.id,
            username: params.username,
            email: params.email,
            phone: params.phone,
            date_of_birth,
            limit: params.limit.unwrap_or(0),
            page: params.page,
        }
    }
}

/// GET /users/search
///
/// Search via query-string criteria. A missing or non-positive `limit`
/// yields an empty page without hitting the store.
pub async fn search_users_query(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResult>> {
    let filter = UserFilter::from(params);
    let (list, total) = users::search(&state.pool, &filter).await?;
    Ok(Json(SearchResult { list, total }))
}

/// POST /users/search
///
/// Search via a JSON `UserFilter` body.
pub async fn search_users(
    State(state): State<AppState>,
    Json(filter): Json<UserFilter>,
) -> Result<Json<SearchResult>> {
    let (list, total) = users::search(&state.pool, &filter).await?;
    Ok(Json(SearchResult { list, total }))
}

/// GET /users/{id}
///
/// Returns the user, or a JSON `null` body when the id is unknown —
/// absence is a valid outcome on this surface, not an error.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<User>>> {
    let user = users::load(&state.pool, &id).await?;
    Ok(Json(user))
}

/// POST /users
///
/// Creates a user with a caller-assigned id. Responds 201 with the
/// affected-row count.
pub async fn create_user(
    State(state): State<AppState>,
    Json(user): Json<User>,
) -> Result<impl IntoResponse> {
    let errors = validation::validate_user(&user);
    if !errors.is_empty() {
        return Err(Error::Validation(errors));
    }

    let affected = users::create(&state.pool, &user).await?;
    tracing::info!(id = %user.id, "user created");
    Ok((StatusCode::CREATED, Json(affected)))
}

/// PUT /users/{id}
///
/// Full update. The body id may be omitted (the path id fills it in) but
/// must match the path when present.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut user): Json<User>,
) -> Result<Json<u64>> {
    if user.id.is_empty() {
        user.id = id;
    } else if user.id != id {
        return Err(Error::BadRequest("Id not match".to_string()));
    }

    let errors = validation::validate_user(&user);
    if !errors.is_empty() {
        return Err(Error::Validation(errors));
    }

    let affected = users::update(&state.pool, &user).await?;
    Ok(Json(affected))
}

/// PATCH /users/{id}
///
/// Partial update from a sparse JSON object. The path id is authoritative:
/// it is written into the payload, and a conflicting body id is a 400.
pub async fn patch_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut fields): Json<Map<String, Value>>,
) -> Result<Json<u64>> {
    let body_id = fields.get("id").and_then(Value::as_str).map(str::to_owned);
    match body_id.as_deref() {
        None | Some("") => {
            fields.insert("id".to_string(), Value::String(id));
        }
        Some(body_id) if body_id != id => {
            return Err(Error::BadRequest("Id not match".to_string()));
        }
        Some(_) => {}
    }

    let errors = validation::validate_patch(&fields);
    if !errors.is_empty() {
        return Err(Error::Validation(errors));
    }

    let affected = users::patch(&state.pool, &fields).await?;
    Ok(Json(affected))
}

/// DELETE /users/{id}
///
/// Responds with the affected-row count; deleting an unknown id is 0.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<u64>> {
    let affected = users::delete(&state.pool, &id).await?;
    Ok(Json(affected))
}
