//! Authentication primitives: login credentials, bearer tokens, the claims a
//! token carries, and the principal recovered from it.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use super::{Email, Password, Role, UserAccount, UserId};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use clinic_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("alice@x.com", "password").unwrap();
/// assert_eq!(creds.username(), "alice@x.com");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Password wrapped for a credential verifier.
    pub fn password_candidate(&self) -> Password {
        Password::candidate(self.password())
    }
}

/// Raw bearer credential presented in an `Authorization` header.
///
/// The value is opaque to the domain; only a [`TokenService`] can interpret
/// it.
///
/// [`TokenService`]: crate::domain::ports::TokenService
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(Zeroizing<String>);

impl BearerToken {
    /// Wrap the token text, rejecting blank values.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Token text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Claims signed into a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Login address of the subject.
    pub subject: Email,
    /// Role held by the subject when the token was issued.
    pub role: Role,
    /// Issue instant.
    pub issued_at: DateTime<Utc>,
    /// Instant from which the token is no longer accepted.
    pub expires_at: DateTime<Utc>,
}

/// Token handed back to a client after a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Signed token text.
    pub access_token: String,
    /// Lifetime in whole seconds.
    pub expires_in: i64,
}

impl IssuedToken {
    /// Token scheme reported to clients.
    pub const TOKEN_TYPE: &'static str = "bearer";
}

/// Authenticated identity reconstructed for a single request.
///
/// ## Invariants
/// - Built only from a validated token whose subject still resolves to a
///   user row; `user_id` and `role` come from that row, not the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user_id: UserId,
    email: Email,
    role: Role,
}

impl Principal {
    /// Build a principal from its components.
    pub fn new(user_id: UserId, email: Email, role: Role) -> Self {
        Self {
            user_id,
            email,
            role,
        }
    }

    /// Identifier of the user row backing this principal.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Login address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Role consulted by the authorization guard.
    pub fn role(&self) -> Role {
        self.role
    }
}

impl From<&UserAccount> for Principal {
    fn from(account: &UserAccount) -> Self {
        Self::new(account.id(), account.email().clone(), account.role())
    }
}

/// Request to replace the password of the account identified by `email`.
#[derive(Debug, Clone)]
pub struct PasswordReset {
    /// Account whose password is replaced.
    pub email: Email,
    /// Replacement password, validated for length.
    pub new_password: Password,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  alice@x.com  ", "secret")]
    #[case("bob@clinic.org", "correct horse battery staple")]
    fn valid_credentials_trim_username(#[case] username: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(username, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.username(), username.trim());
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    #[case("", None)]
    #[case("   ", None)]
    #[case(" abc.def ", Some("abc.def"))]
    fn bearer_token_trims_and_rejects_blank(#[case] raw: &str, #[case] expected: Option<&str>) {
        let token = BearerToken::new(raw);
        assert_eq!(token.as_ref().map(BearerToken::as_str), expected);
    }

    #[rstest]
    fn bearer_token_debug_is_redacted() {
        let token = BearerToken::new("secret.token").expect("non-blank token");
        assert_eq!(format!("{token:?}"), "BearerToken(<redacted>)");
    }
}
