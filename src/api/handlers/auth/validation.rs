//! Field-level validation and normalization for signup/signin payloads.

use regex::Regex;

use super::types::{FieldViolation, Role, SigninRequest, SignupRequest};

pub(super) const NAME_MIN_CHARS: usize = 3;
pub(super) const NAME_MAX_CHARS: usize = 50;
pub(super) const EMAIL_MAX_CHARS: usize = 50;
pub(super) const PASSWORD_MIN_CHARS: usize = 8;
pub(super) const PASSWORD_MAX_CHARS: usize = 30;

/// Fully validated signup payload, normalized and ready for the service layer.
#[derive(Debug)]
pub(super) struct NewUser {
    pub(super) name: String,
    pub(super) email: String,
    pub(super) password: String,
    pub(super) role: Role,
}

/// Validated signin credentials.
#[derive(Debug)]
pub(super) struct Credentials {
    pub(super) email: String,
    pub(super) password: String,
}

/// Normalize an email for lookup/uniqueness checks.
pub(super) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub(super) fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

fn violation(field: &str, message: &str) -> FieldViolation {
    FieldViolation {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn check_email(
    email: Option<&str>,
    max_chars: Option<usize>,
    violations: &mut Vec<FieldViolation>,
) -> String {
    let email = normalize_email(email.unwrap_or_default());
    if email.is_empty() {
        violations.push(violation("email", "Email is required"));
    } else if !valid_email(&email) {
        violations.push(violation("email", "Invalid email address"));
    } else if max_chars.is_some_and(|max| email.chars().count() > max) {
        violations.push(violation("email", "Email must be at most 50 characters"));
    }
    email
}

/// Validate a signup payload.
///
/// Returns every field violation at once so clients can fix the whole form
/// in one pass. No normalization survives a failed validation.
pub(super) fn validate_signup(request: &SignupRequest) -> Result<NewUser, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    let name = request.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        violations.push(violation("name", "Name is required"));
    } else {
        let chars = name.chars().count();
        if chars < NAME_MIN_CHARS {
            violations.push(violation("name", "Name must be at least 3 characters"));
        } else if chars > NAME_MAX_CHARS {
            violations.push(violation("name", "Name must be at most 50 characters"));
        }
    }

    let email = check_email(
        request.email.as_deref(),
        Some(EMAIL_MAX_CHARS),
        &mut violations,
    );

    // Passwords are not trimmed; surrounding whitespace is part of the secret.
    match request.password.as_deref() {
        None => violations.push(violation("password", "Password is required")),
        Some(password) => {
            let chars = password.chars().count();
            if chars < PASSWORD_MIN_CHARS {
                violations.push(violation(
                    "password",
                    "Password must be at least 8 characters",
                ));
            } else if chars > PASSWORD_MAX_CHARS {
                violations.push(violation(
                    "password",
                    "Password must be at most 30 characters",
                ));
            }
        }
    }

    let role = match request.role.as_deref() {
        None => Role::User,
        Some(value) => match Role::parse(value) {
            Some(role) => role,
            None => {
                violations.push(violation("role", "Role must be one of: user, admin"));
                Role::User
            }
        },
    };

    if !violations.is_empty() {
        return Err(violations);
    }

    Ok(NewUser {
        name: name.to_string(),
        email,
        password: request.password.clone().unwrap_or_default(),
        role,
    })
}

/// Validate a signin payload.
pub(super) fn validate_signin(request: &SigninRequest) -> Result<Credentials, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    let email = check_email(request.email.as_deref(), None, &mut violations);

    let password = request.password.clone().unwrap_or_default();
    if password.is_empty() {
        violations.push(violation("password", "Password is required"));
    }

    if !violations.is_empty() {
        return Err(violations);
    }

    Ok(Credentials { email, password })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup_request(
        name: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
        role: Option<&str>,
    ) -> SignupRequest {
        SignupRequest {
            name: name.map(ToString::to_string),
            email: email.map(ToString::to_string),
            password: password.map(ToString::to_string),
            role: role.map(ToString::to_string),
        }
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@example.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-at.example.com"));
        assert!(!valid_email("missing-domain@"));
    }

    #[test]
    fn signup_accepts_valid_payload_and_normalizes() {
        let request = signup_request(
            Some("  Alice Example  "),
            Some(" Alice@Example.COM "),
            Some("s3cret-password"),
            None,
        );
        let new_user = validate_signup(&request).expect("payload should validate");
        assert_eq!(new_user.name, "Alice Example");
        assert_eq!(new_user.email, "alice@example.com");
        assert_eq!(new_user.password, "s3cret-password");
        assert_eq!(new_user.role, Role::User);
    }

    #[test]
    fn signup_accepts_admin_role() {
        let request = signup_request(
            Some("Alice Example"),
            Some("alice@example.com"),
            Some("s3cret-password"),
            Some("admin"),
        );
        let new_user = validate_signup(&request).expect("payload should validate");
        assert_eq!(new_user.role, Role::Admin);
    }

    #[test]
    fn signup_reports_every_violation_at_once() {
        let request = signup_request(Some("ab"), Some("nope"), Some("short"), Some("root"));
        let violations = validate_signup(&request).expect_err("payload should fail");
        let fields: Vec<&str> = violations
            .iter()
            .map(|violation| violation.field.as_str())
            .collect();
        assert_eq!(fields, vec!["name", "email", "password", "role"]);
    }

    #[test]
    fn signup_requires_missing_fields() {
        let request = signup_request(None, None, None, None);
        let violations = validate_signup(&request).expect_err("payload should fail");
        assert_eq!(violations.len(), 3);
        assert!(violations.contains(&FieldViolation {
            field: "name".to_string(),
            message: "Name is required".to_string(),
        }));
        assert!(violations.contains(&FieldViolation {
            field: "email".to_string(),
            message: "Email is required".to_string(),
        }));
        assert!(violations.contains(&FieldViolation {
            field: "password".to_string(),
            message: "Password is required".to_string(),
        }));
    }

    #[test]
    fn signup_enforces_length_bounds() {
        let long_name = "a".repeat(NAME_MAX_CHARS + 1);
        let request = signup_request(
            Some(&long_name),
            Some("alice@example.com"),
            Some(&"p".repeat(PASSWORD_MAX_CHARS + 1)),
            None,
        );
        let violations = validate_signup(&request).expect_err("payload should fail");
        assert!(violations.contains(&FieldViolation {
            field: "name".to_string(),
            message: "Name must be at most 50 characters".to_string(),
        }));
        assert!(violations.contains(&FieldViolation {
            field: "password".to_string(),
            message: "Password must be at most 30 characters".to_string(),
        }));
    }

    #[test]
    fn signup_rejects_overlong_email() {
        let local = "a".repeat(EMAIL_MAX_CHARS);
        let request = signup_request(
            Some("Alice Example"),
            Some(&format!("{local}@example.com")),
            Some("s3cret-password"),
            None,
        );
        let violations = validate_signup(&request).expect_err("payload should fail");
        assert_eq!(
            violations,
            vec![FieldViolation {
                field: "email".to_string(),
                message: "Email must be at most 50 characters".to_string(),
            }]
        );
    }

    #[test]
    fn signin_accepts_valid_credentials() {
        let request = SigninRequest {
            email: Some(" Alice@Example.COM ".to_string()),
            password: Some("s3cret-password".to_string()),
        };
        let credentials = validate_signin(&request).expect("payload should validate");
        assert_eq!(credentials.email, "alice@example.com");
        assert_eq!(credentials.password, "s3cret-password");
    }

    #[test]
    fn signin_requires_password() {
        let request = SigninRequest {
            email: Some("alice@example.com".to_string()),
            password: Some(String::new()),
        };
        let violations = validate_signin(&request).expect_err("payload should fail");
        assert_eq!(
            violations,
            vec![FieldViolation {
                field: "password".to_string(),
                message: "Password is required".to_string(),
            }]
        );
    }

    #[test]
    fn signin_has_no_email_length_cap() {
        let local = "a".repeat(80);
        let request = SigninRequest {
            email: Some(format!("{local}@example.com")),
            password: Some("s3cret-password".to_string()),
        };
        assert!(validate_signin(&request).is_ok());
    }
}
