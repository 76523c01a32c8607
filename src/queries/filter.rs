//! Translates a `UserFilter` into parameterized SQL.
//!
//! One compilation produces the predicate and its positional parameters;
//! the count and paging statements are derived from the same base query so
//! the three can never disagree about which rows match.

use chrono::NaiveDate;

use crate::models::users::{USER_COLUMNS, UserFilter};

/// A positional parameter captured during filter compilation.
///
/// Values are appended in the same order the placeholders are numbered;
/// the repository binds them back in sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterParam {
    Text(String),
    Date(NaiveDate),
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Compiles the populated criteria into a conjunctive predicate.
///
/// Criterion order is fixed: id, date_of_birth.min, date_of_birth.max,
/// username, email, phone. Placeholders are numbered `$1..$n` in append
/// order, matching the returned parameter list exactly. Absent or empty
/// criteria contribute nothing; zero criteria yield an empty predicate.
pub fn compile_filter(filter: &UserFilter) -> (String, Vec<FilterParam>) {
    let mut predicates: Vec<String> = Vec::new();
    let mut params: Vec<FilterParam> = Vec::new();

    if let Some(id) = non_empty(&filter.id) {
        params.push(FilterParam::Text(id.to_string()));
        predicates.push(format!("id = ${}", params.len()));
    }
    if let Some(range) = &filter.date_of_birth {
        if let Some(min) = range.min {
            params.push(FilterParam::Date(min));
            predicates.push(format!("date_of_birth >= ${}", params.len()));
        }
        if let Some(max) = range.max {
            params.push(FilterParam::Date(max));
            predicates.push(format!("date_of_birth <= ${}", params.len()));
        }
    }
    if let Some(username) = non_empty(&filter.username) {
        params.push(FilterParam::Text(format!("{username}%")));
        predicates.push(format!("username like ${}", params.len()));
    }
    if let Some(email) = non_empty(&filter.email) {
        params.push(FilterParam::Text(format!("{email}%")));
        predicates.push(format!("email like ${}", params.len()));
    }
    if let Some(phone) = non_empty(&filter.phone) {
        params.push(FilterParam::Text(format!("%{phone}%")));
        predicates.push(format!("phone like ${}", params.len()));
    }

    (predicates.join(" and "), params)
}

/// The base projection query for a filter.
pub fn build_query(filter: &UserFilter) -> (String, Vec<FilterParam>) {
    let (predicate, params) = compile_filter(filter);
    let mut query = format!("select {} from users", USER_COLUMNS.join(", "));
    if !predicate.is_empty() {
        query.push_str(" where ");
        query.push_str(&predicate);
    }
    (query, params)
}

/// Rewrites a base query into its scalar count variant.
///
/// The predicate (and therefore the parameter list) is shared with the
/// base query verbatim.
pub fn build_count_query(query: &str) -> String {
    match query.find(" from ") {
        Some(idx) => format!("select count(*){}", &query[idx..]),
        None => query.to_string(),
    }
}

/// Appends one result page to a base query.
///
/// `limit` and `offset` are integers under our control, never request
/// text, so they are emitted as literals.
pub fn build_paging_query(query: &str, limit: i64, offset: i64) -> String {
    format!("{query} limit {limit} offset {offset}")
}

/// Offset of the requested 1-based page; first page when absent or < 1.
pub fn get_offset(limit: i64, page: Option<i64>) -> i64 {
    match page {
        Some(page) if page >= 1 => limit * (page - 1),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::DateRange;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn empty_filter_compiles_to_empty_predicate() {
        let (predicate, params) = compile_filter(&UserFilter::default());
        assert_eq!(predicate, "");
        assert!(params.is_empty());

        let (query, params) = build_query(&UserFilter::default());
        assert_eq!(
            query,
            "select id, username, email, phone, date_of_birth from users"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let filter = UserFilter {
            id: Some(String::new()),
            username: Some(String::new()),
            ..Default::default()
        };
        let (predicate, params) = compile_filter(&filter);
        assert_eq!(predicate, "");
        assert!(params.is_empty());
    }

    #[test]
    fn criteria_follow_fixed_field_order() {
        let filter = UserFilter {
            id: Some("u1".to_string()),
            username: Some("ann".to_string()),
            email: Some("ann@".to_string()),
            phone: Some("555".to_string()),
            date_of_birth: Some(DateRange {
                min: Some(date("1980-01-01")),
                max: Some(date("1999-12-31")),
            }),
            ..Default::default()
        };

        let (predicate, params) = compile_filter(&filter);
        assert_eq!(
            predicate,
            "id = $1 and date_of_birth >= $2 and date_of_birth <= $3 \
             and username like $4 and email like $5 and phone like $6"
        );
        assert_eq!(
            params,
            vec![
                FilterParam::Text("u1".to_string()),
                FilterParam::Date(date("1980-01-01")),
                FilterParam::Date(date("1999-12-31")),
                FilterParam::Text("ann%".to_string()),
                FilterParam::Text("ann@%".to_string()),
                FilterParam::Text("%555%".to_string()),
            ]
        );
    }

    #[test]
    fn param_count_matches_populated_criteria() {
        let filter = UserFilter {
            email: Some("bob".to_string()),
            date_of_birth: Some(DateRange {
                min: None,
                max: Some(date("2000-06-15")),
            }),
            ..Default::default()
        };
        let (predicate, params) = compile_filter(&filter);
        assert_eq!(predicate, "date_of_birth <= $1 and email like $2");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn username_prefix_example() {
        let filter = UserFilter {
            username: Some("ann".to_string()),
            limit: 10,
            page: Some(2),
            ..Default::default()
        };
        let (predicate, params) = compile_filter(&filter);
        assert_eq!(predicate, "username like $1");
        assert_eq!(params, vec![FilterParam::Text("ann%".to_string())]);
        assert_eq!(get_offset(filter.limit, filter.page), 10);
    }

    #[test]
    fn count_query_shares_the_predicate() {
        let filter = UserFilter {
            phone: Some("555".to_string()),
            ..Default::default()
        };
        let (query, _) = build_query(&filter);
        assert_eq!(
            build_count_query(&query),
            "select count(*) from users where phone like $1"
        );
    }

    #[test]
    fn count_query_of_unfiltered_base() {
        let (query, _) = build_query(&UserFilter::default());
        assert_eq!(build_count_query(&query), "select count(*) from users");
    }

    #[test]
    fn paging_query_appends_limit_and_offset() {
        let (query, _) = build_query(&UserFilter::default());
        assert_eq!(
            build_paging_query(&query, 20, 40),
            "select id, username, email, phone, date_of_birth from users limit 20 offset 40"
        );
    }

    #[test]
    fn offset_defaults_to_first_page() {
        assert_eq!(get_offset(10, None), 0);
        assert_eq!(get_offset(10, Some(0)), 0);
        assert_eq!(get_offset(10, Some(-3)), 0);
        assert_eq!(get_offset(10, Some(1)), 0);
        assert_eq!(get_offset(10, Some(3)), 20);
    }
}
