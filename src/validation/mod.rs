//! Field-level validation for account identity fields.
//!
//! The rule functions plug into `validator`'s `custom(function = ...)` hook so
//! request DTOs declare their constraints with `#[derive(Validate)]`. Every
//! field is checked and all failures are collected; [`violations`] flattens
//! the resulting `ValidationErrors` into a stable, serializable list.

use serde::Serialize;
use std::borrow::Cow;
use validator::{ValidateEmail, ValidationError, ValidationErrors};

pub const NICKNAME_MIN_LEN: usize = 3;
pub const NICKNAME_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 128;

const ALLOWED_URL_SCHEMES: [&str; 2] = ["http", "https"];

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    PatternMismatch,
    SchemeNotAllowed,
    OutOfRange,
}

impl ViolationKind {
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::Missing => "missing",
            ViolationKind::PatternMismatch => "pattern_mismatch",
            ViolationKind::SchemeNotAllowed => "scheme_not_allowed",
            ViolationKind::OutOfRange => "out_of_range",
        }
    }

    /// Map a `validator` error code onto a kind. Built-in `length` checks read
    /// as pattern mismatches, `range` as out of range.
    fn from_code(code: &str) -> Self {
        match code {
            "missing" | "required" => ViolationKind::Missing,
            "scheme_not_allowed" => ViolationKind::SchemeNotAllowed,
            "range" | "out_of_range" => ViolationKind::OutOfRange,
            _ => ViolationKind::PatternMismatch,
        }
    }
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Flatten `validator` output into violations sorted by field name.
pub fn violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut out: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let kind = ViolationKind::from_code(&e.code);
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| default_message(kind, e));
                FieldViolation::new(field.clone(), kind, message)
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field).then(a.message.cmp(&b.message)));
    out
}

fn default_message(kind: ViolationKind, err: &ValidationError) -> String {
    match (kind, err.code.as_ref()) {
        (_, "length") => {
            let min = err.params.get("min").map(|v| v.to_string());
            let max = err.params.get("max").map(|v| v.to_string());
            match (min, max) {
                (Some(min), Some(max)) => format!("length must be between {} and {}", min, max),
                (None, Some(max)) => format!("length must be at most {}", max),
                (Some(min), None) => format!("length must be at least {}", min),
                (None, None) => "invalid length".to_string(),
            }
        }
        (ViolationKind::OutOfRange, _) => "value out of range".to_string(),
        _ => format!("invalid value ({})", err.code),
    }
}

/// Violation for a JSON body that could not be decoded into the request type.
pub fn body_violation(rejection: &str) -> FieldViolation {
    decode_violation(rejection, "body")
}

/// Violation for a query string that could not be decoded.
pub fn query_violation(rejection: &str) -> FieldViolation {
    decode_violation(rejection, "query")
}

// Rejection text reads `<context>: [<path>: ]<serde message>`.
fn decode_violation(rejection: &str, fallback: &str) -> FieldViolation {
    let detail = rejection
        .split_once(": ")
        .map(|(_, rest)| rest)
        .unwrap_or(rejection);

    if let Some(field) = backticked_after(detail, "missing field ") {
        return FieldViolation::new(field, ViolationKind::Missing, format!("{} is required", field));
    }
    if let Some(field) = backticked_after(detail, "unknown field ") {
        return FieldViolation::new(
            field,
            ViolationKind::PatternMismatch,
            format!("{} cannot be set here", field),
        );
    }
    match detail.split_once(": ") {
        Some((path, message)) if is_field_path(path) => {
            FieldViolation::new(path, ViolationKind::PatternMismatch, message)
        }
        _ => FieldViolation::new(fallback, ViolationKind::PatternMismatch, detail),
    }
}

fn backticked_after<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    let start = text.find(marker)? + marker.len();
    text[start..].strip_prefix('`')?.split('`').next()
}

fn is_field_path(path: &str) -> bool {
    !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'))
}

fn reject(kind: ViolationKind, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(kind.code());
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Nickname: `[A-Za-z0-9_-]+`, 3 to 50 characters.
pub fn nickname(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(reject(ViolationKind::Missing, "nickname is required"));
    }
    let len = value.chars().count();
    if !(NICKNAME_MIN_LEN..=NICKNAME_MAX_LEN).contains(&len) {
        return Err(reject(
            ViolationKind::PatternMismatch,
            "nickname must be 3 to 50 characters",
        ));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(reject(
            ViolationKind::PatternMismatch,
            "nickname may only contain letters, digits, '_' and '-'",
        ));
    }
    Ok(())
}

/// Email: mailbox syntax with a dotted domain.
pub fn email(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(reject(ViolationKind::Missing, "email is required"));
    }
    let dotted_domain = value
        .rsplit_once('@')
        .map(|(_, domain)| {
            domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        })
        .unwrap_or(false);
    if !dotted_domain || !value.validate_email() {
        return Err(reject(
            ViolationKind::PatternMismatch,
            "email must look like local@domain.tld",
        ));
    }
    Ok(())
}

/// Profile and social links: `http://` or `https://` followed by a host.
pub fn profile_url(value: &str) -> Result<(), ValidationError> {
    let Some((scheme, rest)) = value.split_once("://") else {
        return Err(reject(
            ViolationKind::PatternMismatch,
            "url must start with http:// or https://",
        ));
    };
    if !ALLOWED_URL_SCHEMES
        .iter()
        .any(|allowed| scheme.eq_ignore_ascii_case(allowed))
    {
        return Err(reject(
            ViolationKind::SchemeNotAllowed,
            "url scheme must be http or https",
        ));
    }
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    if host.is_empty() || host.chars().any(char::is_whitespace) {
        return Err(reject(ViolationKind::PatternMismatch, "url must include a host"));
    }
    Ok(())
}

/// Raw password at registration: 8 to 128 characters.
pub fn password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(reject(ViolationKind::Missing, "password is required"));
    }
    let len = value.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(reject(
            ViolationKind::PatternMismatch,
            "password must be 8 to 128 characters",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn code_of(r: Result<(), ValidationError>) -> String {
        r.unwrap_err().code.to_string()
    }

    #[test]
    fn nickname_accepts_valid() {
        for nick in ["test_user", "test-user", "testuser123", "123test"] {
            assert!(nickname(nick).is_ok(), "{nick} should be accepted");
        }
    }

    #[test]
    fn nickname_rejects_invalid() {
        assert_eq!(code_of(nickname("test user")), "pattern_mismatch");
        assert_eq!(code_of(nickname("test?user")), "pattern_mismatch");
        assert_eq!(code_of(nickname("us")), "pattern_mismatch");
        assert_eq!(code_of(nickname("")), "missing");
        assert_eq!(code_of(nickname(&"a".repeat(51))), "pattern_mismatch");
    }

    #[test]
    fn email_rules() {
        assert!(email("john.doe@example.com").is_ok());
        assert!(email("a@b.co").is_ok());
        assert_eq!(code_of(email("invalid-email-format")), "pattern_mismatch");
        assert_eq!(code_of(email("@nodomain")), "pattern_mismatch");
        assert_eq!(code_of(email("user@localhost")), "pattern_mismatch");
        assert_eq!(code_of(email("")), "missing");
    }

    #[test]
    fn url_rules() {
        assert!(profile_url("http://valid.com/profile.jpg").is_ok());
        assert!(profile_url("https://valid.com/x.png").is_ok());
        assert!(profile_url("HTTPS://valid.com").is_ok());
        assert_eq!(code_of(profile_url("ftp://invalid.com/x.jpg")), "scheme_not_allowed");
        assert_eq!(code_of(profile_url("http//invalid")), "pattern_mismatch");
        assert_eq!(code_of(profile_url("https//invalid")), "pattern_mismatch");
        assert_eq!(code_of(profile_url("https:///nohost")), "pattern_mismatch");
    }

    #[test]
    fn password_rules() {
        assert!(password("SecurePassword123!").is_ok());
        assert_eq!(code_of(password("short")), "pattern_mismatch");
        assert_eq!(code_of(password("")), "missing");
    }

    #[derive(Validate)]
    struct Profile {
        #[validate(custom(function = "nickname"))]
        nickname: String,
        #[validate(custom(function = "email"))]
        email: String,
        #[validate(custom(function = "profile_url"))]
        github_profile_url: Option<String>,
        #[validate(custom(function = "profile_url"))]
        profile_picture_url: Option<String>,
    }

    #[test]
    fn violations_are_aggregated_and_sorted() {
        let profile = Profile {
            nickname: "us".to_string(),
            email: "nope".to_string(),
            github_profile_url: None,
            profile_picture_url: Some("ftp://x.com/a.jpg".to_string()),
        };
        let errs = profile.validate().unwrap_err();
        let v = violations(&errs);
        let summary: Vec<(&str, ViolationKind)> =
            v.iter().map(|f| (f.field.as_str(), f.kind)).collect();
        assert_eq!(
            summary,
            vec![
                ("email", ViolationKind::PatternMismatch),
                ("nickname", ViolationKind::PatternMismatch),
                ("profile_picture_url", ViolationKind::SchemeNotAllowed),
            ]
        );
    }

    #[test]
    fn undecodable_body_names_the_field() {
        let missing = body_violation(
            "Failed to deserialize the JSON body into the target type: missing field `password` at line 1 column 2",
        );
        assert_eq!(missing.field, "password");
        assert_eq!(missing.kind, ViolationKind::Missing);

        let unknown = body_violation(
            "Failed to deserialize the JSON body into the target type: unknown field `role`, expected one of `nickname`, `email` at line 1 column 7",
        );
        assert_eq!(unknown.field, "role");
        assert_eq!(unknown.kind, ViolationKind::PatternMismatch);

        let wrong_type = body_violation(
            "Failed to deserialize the JSON body into the target type: bio: invalid type: integer `5`, expected a string at line 1 column 8",
        );
        assert_eq!(wrong_type.field, "bio");

        let syntax = body_violation(
            "Failed to parse the request body as JSON: expected value at line 1 column 1",
        );
        assert_eq!(syntax.field, "body");
        assert_eq!(syntax.message, "expected value at line 1 column 1");
    }

    #[test]
    fn undecodable_query_names_the_parameter() {
        let v = query_violation("Failed to deserialize query string: page: invalid digit found in string");
        assert_eq!(v.field, "page");
        assert_eq!(v.kind, ViolationKind::PatternMismatch);
        assert_eq!(v.message, "invalid digit found in string");

        let v = query_violation("Failed to deserialize query string: expected `,` or `}`");
        assert_eq!(v.field, "query");
    }

    #[test]
    fn kind_serializes_snake_case() {
        let v = FieldViolation::new("nickname", ViolationKind::Missing, "nickname is required");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["kind"], "missing");
    }
}
