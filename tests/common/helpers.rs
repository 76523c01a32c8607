use chrono::NaiveDate;

use user_service::models::users::User;

/// A valid user for round-trip tests; `id` carries the test namespace.
pub fn sample_user(id: &str) -> User {
    User {
        id: id.to_string(),
        username: format!("{id}_name"),
        email: format!("{id}@example.com"),
        phone: "555-0100".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 1),
    }
}
