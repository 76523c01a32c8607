//! Field-level validation for incoming user payloads.
//!
//! Produces a list of field errors instead of failing fast; a non-empty
//! list rejects the request before the store is touched.

use crate::error::FieldError;
use crate::models::users::User;

const MAX_ID_LEN: usize = 40;
const MAX_USERNAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 254;
const MAX_PHONE_LEN: usize = 20;

/// Validates a full user payload (create and update paths).
pub fn validate_user(user: &User) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if user.id.trim().is_empty() {
        errors.push(FieldError::new("id", "required", "id is required"));
    } else if user.id.len() > MAX_ID_LEN {
        errors.push(FieldError::new(
            "id",
            "max_length",
            format!("id must be at most {MAX_ID_LEN} characters"),
        ));
    }

    if user.username.trim().is_empty() {
        errors.push(FieldError::new("username", "required", "username is required"));
    } else if user.username.len() > MAX_USERNAME_LEN {
        errors.push(FieldError::new(
            "username",
            "max_length",
            format!("username must be at most {MAX_USERNAME_LEN} characters"),
        ));
    }

    if user.email.trim().is_empty() {
        errors.push(FieldError::new("email", "required", "email is required"));
    } else if user.email.len() > MAX_EMAIL_LEN || !has_email_shape(&user.email) {
        errors.push(FieldError::new("email", "format", "email is not a valid address"));
    }

    if user.phone.trim().is_empty() {
        errors.push(FieldError::new("phone", "required", "phone is required"));
    } else if user.phone.len() > MAX_PHONE_LEN || !has_phone_shape(&user.phone) {
        errors.push(FieldError::new("phone", "format", "phone is not a valid number"));
    }

    errors
}

/// Validates the fields present in a patch payload.
///
/// Only the mutable fields are checked, and only when submitted with a
/// string value; absent and `null` entries are the compiler's concern.
pub fn validate_patch(fields: &serde_json::Map<String, serde_json::Value>) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(username) = fields.get("username").and_then(|v| v.as_str()) {
        if username.trim().is_empty() {
            errors.push(FieldError::new("username", "required", "username cannot be blank"));
        } else if username.len() > MAX_USERNAME_LEN {
            errors.push(FieldError::new(
                "username",
                "max_length",
                format!("username must be at most {MAX_USERNAME_LEN} characters"),
            ));
        }
    }

    if let Some(email) = fields.get("email").and_then(|v| v.as_str()) {
        if email.len() > MAX_EMAIL_LEN || !has_email_shape(email) {
            errors.push(FieldError::new("email", "format", "email is not a valid address"));
        }
    }

    if let Some(phone) = fields.get("phone").and_then(|v| v.as_str()) {
        if phone.trim().is_empty() || phone.len() > MAX_PHONE_LEN || !has_phone_shape(phone) {
            errors.push(FieldError::new("phone", "format", "phone is not a valid number"));
        }
    }

    errors
}

/// Minimal structural check: one `@` with non-empty local and domain
/// parts, and a dot somewhere in the domain.
fn has_email_shape(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        _ => false,
    }
}

fn has_phone_shape(phone: &str) -> bool {
    phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_user() -> User {
        User {
            id: "u1".to_string(),
            username: "ann".to_string(),
            email: "ann@example.com".to_string(),
            phone: "555-1111".to_string(),
            date_of_birth: None,
        }
    }

    #[test]
    fn valid_user_passes() {
        assert!(validate_user(&valid_user()).is_empty());
    }

    #[test]
    fn missing_required_fields_are_all_reported() {
        let user = User {
            id: String::new(),
            username: String::new(),
            email: String::new(),
            phone: String::new(),
            date_of_birth: None,
        };
        let errors = validate_user(&user);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["id", "username", "email", "phone"]);
        assert!(errors.iter().all(|e| e.code == "required"));
    }

    #[test]
    fn malformed_email_is_rejected() {
        for email in ["no-at-sign", "@example.com", "a@b@c.com", "ann@nodot"] {
            let user = User {
                email: email.to_string(),
                ..valid_user()
            };
            let errors = validate_user(&user);
            assert_eq!(errors.len(), 1, "{email}");
            assert_eq!(errors[0].field, "email");
        }
    }

    #[test]
    fn phone_accepts_separators_but_not_letters() {
        let user = User {
            phone: "+1 (555) 123-4567".to_string(),
            ..valid_user()
        };
        assert!(validate_user(&user).is_empty());

        let user = User {
            phone: "call-me".to_string(),
            ..valid_user()
        };
        assert_eq!(validate_user(&user)[0].field, "phone");
    }

    #[test]
    fn patch_checks_only_submitted_fields() {
        let fields = serde_json::json!({"id": "u1", "phone": "555-1111"});
        assert!(validate_patch(fields.as_object().unwrap()).is_empty());

        let fields = serde_json::json!({"id": "u1", "email": "not-an-email"});
        let errors = validate_patch(fields.as_object().unwrap());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "email");
    }

    #[test]
    fn overlong_id_is_rejected() {
        let user = User {
            id: "x".repeat(MAX_ID_LEN + 1),
            ..valid_user()
        };
        let errors = validate_user(&user);
        assert_eq!(errors[0].code, "max_length");
    }
}
