//! Shared validation helpers for inbound HTTP adapters.
//!
//! Domain constructors report field-level failures as typed errors; these
//! helpers turn them into `invalid_request` payloads whose `details` name
//! the request field and a stable reason code.

use serde_json::json;

use crate::domain::{Error, LoginValidationError, RoleParseError, UserValidationError};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code,
    }))
}

/// Map a user field failure, reporting it against the field the domain
/// names.
pub(crate) fn user_field_error(err: &UserValidationError) -> Error {
    field_error(FieldName::new(err.field()), err.code(), err.to_string())
}

/// Map a user field failure onto a request field with a different name,
/// such as `new_password` on the reset endpoint.
pub(crate) fn user_field_error_as(field: FieldName, err: &UserValidationError) -> Error {
    field_error(field, err.code(), err.to_string())
}

pub(crate) fn login_field_error(err: &LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => {
            field_error(FieldName::new("username"), "empty_username", err.to_string())
        }
        LoginValidationError::EmptyPassword => {
            field_error(FieldName::new("password"), "empty_password", err.to_string())
        }
    }
}

pub(crate) fn role_field_error(err: &RoleParseError) -> Error {
    field_error(FieldName::new("role"), "invalid_role", err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(UserValidationError::InvalidEmail, "email", "invalid_email")]
    #[case(UserValidationError::PasswordTooShort { min: 8 }, "password", "password_too_short")]
    #[case(UserValidationError::InvalidPhoneNumber, "phone_number", "invalid_phone_number")]
    fn user_errors_name_field_and_code(
        #[case] err: UserValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let mapped = user_field_error(&err);
        assert_eq!(mapped.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            mapped.details(),
            Some(&json!({ "field": field, "code": code }))
        );
    }

    #[rstest]
    fn renamed_fields_keep_the_reason_code() {
        let mapped = user_field_error_as(
            FieldName::new("new_password"),
            &UserValidationError::PasswordTooShort { min: 8 },
        );
        assert_eq!(
            mapped.details(),
            Some(&json!({ "field": "new_password", "code": "password_too_short" }))
        );
    }

    #[rstest]
    #[case(LoginValidationError::EmptyUsername, "username")]
    #[case(LoginValidationError::EmptyPassword, "password")]
    fn login_errors_name_the_field(#[case] err: LoginValidationError, #[case] field: &str) {
        let mapped = login_field_error(&err);
        assert_eq!(
            mapped.details().and_then(|d| d.get("field")),
            Some(&json!(field))
        );
    }
}
