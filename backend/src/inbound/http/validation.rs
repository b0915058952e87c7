//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use serde_json::json;

use directory_model::Role;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidRole,
    InvalidInteger,
    OutOfRange,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidRole => "invalid_role",
            ErrorCode::InvalidInteger => "invalid_integer",
            ErrorCode::OutOfRange => "out_of_range",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn invalid_param_error(
    field: FieldName,
    message: String,
    code: ErrorCode,
    value: &str,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// Parse a role query parameter against the closed enumeration.
pub(crate) fn parse_role(value: &str, field: FieldName) -> Result<Role, Error> {
    Role::from_str(value).map_err(|_| {
        let allowed = Role::ALL.map(Role::as_str).join(", ");
        invalid_param_error(
            field,
            format!("{} must be one of: {allowed}", field.as_str()),
            ErrorCode::InvalidRole,
            value,
        )
    })
}

/// Coerce a numeric query parameter into a positive integer.
///
/// Numeric strings are accepted; anything that does not parse, or parses to
/// zero, is rejected with field-level detail.
pub(crate) fn parse_positive_int(value: &str, field: FieldName) -> Result<u32, Error> {
    let parsed: u32 = value.trim().parse().map_err(|_| {
        invalid_param_error(
            field,
            format!("{} must be an integer", field.as_str()),
            ErrorCode::InvalidInteger,
            value,
        )
    })?;
    if parsed == 0 {
        return Err(invalid_param_error(
            field,
            format!("{} must be at least 1", field.as_str()),
            ErrorCode::OutOfRange,
            value,
        ));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::Value;

    const ROLE: FieldName = FieldName::new("role");
    const PAGE: FieldName = FieldName::new("page");

    #[test]
    fn parse_role_accepts_the_closed_set() {
        assert_eq!(parse_role("editor", ROLE).expect("valid role"), Role::Editor);
    }

    #[test]
    fn parse_role_reports_field_and_value() {
        let error = parse_role("owner", ROLE).expect_err("unknown role");
        let details = error.details().expect("details present");
        assert_eq!(details["field"], Value::from("role"));
        assert_eq!(details["value"], Value::from("owner"));
        assert_eq!(details["code"], Value::from("invalid_role"));
    }

    #[rstest]
    #[case("1", 1)]
    #[case("10", 10)]
    #[case(" 3 ", 3)]
    fn parse_positive_int_coerces_numeric_strings(#[case] raw: &str, #[case] expected: u32) {
        assert_eq!(parse_positive_int(raw, PAGE).expect("valid integer"), expected);
    }

    #[rstest]
    #[case("abc", "invalid_integer")]
    #[case("1.5", "invalid_integer")]
    #[case("-1", "invalid_integer")]
    #[case("0", "out_of_range")]
    fn parse_positive_int_rejects_bad_input(#[case] raw: &str, #[case] expected_code: &str) {
        let error = parse_positive_int(raw, PAGE).expect_err("invalid integer");
        let details = error.details().expect("details present");
        assert_eq!(details["code"], Value::from(expected_code));
    }
}
