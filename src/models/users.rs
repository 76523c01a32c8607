use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Row, postgres::PgRow};

/// Column order of the `users` table.
///
/// Single source of truth for the projection list; the row mapper and the
/// query builders stay in sync with the schema through this array.
pub const USER_COLUMNS: [&str; 5] = ["id", "username", "email", "phone", "date_of_birth"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Option<NaiveDate>,
}

/// Binds result columns to fields by name.
///
/// Kept as an explicit impl rather than the derive so the mapping is
/// visible next to `USER_COLUMNS` and survives column reordering in the
/// projection.
impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            date_of_birth: row.try_get("date_of_birth")?,
        })
    }
}

/// Inclusive date-of-birth bounds; either side may be open.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub min: Option<NaiveDate>,
    pub max: Option<NaiveDate>,
}

/// Search criteria for `users`. Constructed per request, discarded after use.
///
/// String criteria treat `None` and `""` alike: neither contributes a
/// predicate. `limit` must be positive for a search to execute at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserFilter {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<DateRange>,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub page: Option<i64>,
}

/// One page of search results plus the unpaged total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub list: Vec<User>,
    pub total: i64,
}
