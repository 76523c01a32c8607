//! Translates a sparse field map into a column-limited UPDATE.
//!
//! Only allow-listed columns can ever appear in the SET clause, and every
//! value (the id included) is bound as a positional parameter rather than
//! spliced into the statement text.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Columns a patch is permitted to mutate, in emission order.
///
/// `id` is the immutable key and `date_of_birth` is deliberately not
/// patchable; both are dropped silently if submitted.
pub const PATCH_FIELDS: [&str; 3] = ["username", "email", "phone"];

/// Compiles a patch payload into `(statement, params)`.
///
/// The map must carry a non-empty `id`, which becomes the final bound
/// parameter of the WHERE clause. An id-only payload is a caller error:
/// no statement is produced when nothing would change.
pub fn compile_patch(fields: &Map<String, Value>) -> Result<(String, Vec<String>)> {
    let id = fields
        .get("id")
        .and_then(text_value)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::BadRequest("patch payload must carry an id".to_string()))?;

    let mut assignments: Vec<String> = Vec::new();
    let mut params: Vec<String> = Vec::new();

    for field in PATCH_FIELDS {
        if let Some(value) = fields.get(field).and_then(text_value) {
            params.push(value);
            assignments.push(format!("{field} = ${}", params.len()));
        }
    }

    if assignments.is_empty() {
        return Err(Error::BadRequest(
            "patch payload carries no updatable fields".to_string(),
        ));
    }

    params.push(id);
    let statement = format!(
        "update users set {} where id = ${}",
        assignments.join(", "),
        params.len()
    );

    Ok((statement, params))
}

/// Text form of a scalar patch value; `null` and missing are both "absent".
fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
