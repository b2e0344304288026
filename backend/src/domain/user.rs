//! User data model.
//!
//! Validated newtypes for the profile fields, the public projection returned
//! to clients ([`UserAccount`]), and the shapes used to create and modify
//! user rows. Password material never appears in the public projection.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{Role, UserId};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN: usize = 8;
/// Maximum accepted password length, in characters.
pub const PASSWORD_MAX: usize = 128;
/// Maximum accepted full name length, in characters.
pub const FULL_NAME_MAX: usize = 100;

/// Validation errors returned by the user field constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Email does not look like an address.
    InvalidEmail,
    /// Full name was blank once trimmed.
    EmptyFullName,
    /// Full name exceeded `max` characters.
    FullNameTooLong {
        /// Upper bound, in characters.
        max: usize,
    },
    /// Phone number has the wrong shape.
    InvalidPhoneNumber,
    /// Password shorter than `min` characters.
    PasswordTooShort {
        /// Lower bound, in characters.
        min: usize,
    },
    /// Password longer than `max` characters.
    PasswordTooLong {
        /// Upper bound, in characters.
        max: usize,
    },
}

impl UserValidationError {
    /// Wire name of the field that failed validation.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "email",
            Self::EmptyFullName | Self::FullNameTooLong { .. } => "full_name",
            Self::InvalidPhoneNumber => "phone_number",
            Self::PasswordTooShort { .. } | Self::PasswordTooLong { .. } => "password",
        }
    }

    /// Stable machine-readable reason code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "invalid_email",
            Self::EmptyFullName => "empty_full_name",
            Self::FullNameTooLong { .. } => "full_name_too_long",
            Self::InvalidPhoneNumber => "invalid_phone_number",
            Self::PasswordTooShort { .. } => "password_too_short",
            Self::PasswordTooLong { .. } => "password_too_long",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyFullName => write!(f, "full name must not be empty"),
            Self::FullNameTooLong { max } => {
                write!(f, "full name must be at most {max} characters")
            }
            Self::InvalidPhoneNumber => write!(f, "phone number must contain 6 to 20 digits"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordTooLong { max } => {
                write!(f, "password must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn phone_regex() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        Regex::new(r"^\+?[0-9][0-9 \-]{5,19}$")
            .unwrap_or_else(|error| panic!("phone regex failed to compile: {error}"))
    })
}

/// Login and contact address, stored lower-cased so uniqueness is
/// case-insensitive.
///
/// # Examples
/// ```
/// use clinic_backend::domain::Email;
///
/// let email = Email::new(" Alice@X.com ").expect("valid email");
/// assert_eq!(email.as_ref(), "alice@x.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = email.as_ref().trim().to_lowercase();
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

/// Person's display name as entered at signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FullName(String);

impl FullName {
    /// Validate a full name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyFullName);
        }
        if trimmed.chars().count() > FULL_NAME_MAX {
            return Err(UserValidationError::FullNameTooLong { max: FULL_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

/// Contact number; unique across users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate a phone number.
    pub fn new(number: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = number.as_ref().trim();
        if !phone_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidPhoneNumber);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

macro_rules! string_newtype_impls {
    ($name:ident) => {
        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_ref())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = UserValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

string_newtype_impls!(Email);
string_newtype_impls!(FullName);
string_newtype_impls!(PhoneNumber);

/// Plaintext password held only long enough to hash or verify it.
///
/// The buffer is zeroed on drop and never serialised.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate password length.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = Zeroizing::new(raw.into());
        let length = raw.chars().count();
        if length < PASSWORD_MIN {
            return Err(UserValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if length > PASSWORD_MAX {
            return Err(UserValidationError::PasswordTooLong { max: PASSWORD_MAX });
        }
        Ok(Self(raw))
    }

    /// Accept a candidate without length checks, for verification only.
    pub(crate) fn candidate(raw: &str) -> Self {
        Self(Zeroizing::new(raw.to_owned()))
    }

    /// Expose the plaintext to a hashing adapter.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// One-way password digest in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap a digest produced by a credential hasher or read from storage.
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// Digest text for persistence.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

/// Public projection of a user row.
///
/// ## Invariants
/// - Never carries password material.
/// - `id` and `role` are immutable once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserAccountDto", into = "UserAccountDto")]
pub struct UserAccount {
    id: UserId,
    full_name: FullName,
    email: Email,
    phone_number: PhoneNumber,
    role: Role,
    created_at: DateTime<Utc>,
}

/// Components of a [`UserAccount`], grouped to keep the constructor readable.
#[derive(Debug, Clone)]
pub struct UserAccountParts {
    /// Storage key.
    pub id: UserId,
    /// Display name.
    pub full_name: FullName,
    /// Login address.
    pub email: Email,
    /// Contact number.
    pub phone_number: PhoneNumber,
    /// Role assigned at signup.
    pub role: Role,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    /// Build an account projection from validated components.
    pub fn new(parts: UserAccountParts) -> Self {
        let UserAccountParts {
            id,
            full_name,
            email,
            phone_number,
            role,
            created_at,
        } = parts;
        Self {
            id,
            full_name,
            email,
            phone_number,
            role,
            created_at,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Full name.
    pub fn full_name(&self) -> &FullName {
        &self.full_name
    }

    /// Login address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Contact number.
    pub fn phone_number(&self) -> &PhoneNumber {
        &self.phone_number
    }

    /// Role assigned at signup.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserAccountDto {
    user_id: UserId,
    full_name: String,
    email: String,
    phone_number: String,
    role: Role,
    created_at: DateTime<Utc>,
}

impl From<UserAccount> for UserAccountDto {
    fn from(value: UserAccount) -> Self {
        Self {
            user_id: value.id,
            full_name: value.full_name.into(),
            email: value.email.into(),
            phone_number: value.phone_number.into(),
            role: value.role,
            created_at: value.created_at,
        }
    }
}

impl TryFrom<UserAccountDto> for UserAccount {
    type Error = UserValidationError;

    fn try_from(value: UserAccountDto) -> Result<Self, Self::Error> {
        Ok(Self::new(UserAccountParts {
            id: value.user_id,
            full_name: FullName::new(value.full_name)?,
            email: Email::new(value.email)?,
            phone_number: PhoneNumber::new(value.phone_number)?,
            role: value.role,
            created_at: value.created_at,
        }))
    }
}

/// A user row together with its password digest, as read for login.
#[derive(Debug, Clone)]
pub struct StoredUser {
    /// Public projection of the row.
    pub account: UserAccount,
    /// Digest compared against login attempts.
    pub password_hash: PasswordDigest,
}

/// Profile submitted at signup, with the plaintext password still attached.
#[derive(Debug, Clone)]
pub struct SignupProfile {
    /// Display name.
    pub full_name: FullName,
    /// Login address; must be unique.
    pub email: Email,
    /// Contact number; must be unique.
    pub phone_number: PhoneNumber,
    /// Requested role.
    pub role: Role,
    /// Plaintext password, hashed before storage.
    pub password: Password,
}

impl SignupProfile {
    /// Validate raw signup fields, reporting the first invalid one.
    ///
    /// # Examples
    /// ```
    /// use clinic_backend::domain::{Role, SignupProfile};
    ///
    /// let profile = SignupProfile::try_from_parts(
    ///     "Alice Liddell",
    ///     "alice@x.com",
    ///     "+44 7700 900001",
    ///     Role::Patient,
    ///     "correct horse",
    /// )
    /// .expect("valid profile");
    /// assert_eq!(profile.email.as_ref(), "alice@x.com");
    /// ```
    pub fn try_from_parts(
        full_name: &str,
        email: &str,
        phone_number: &str,
        role: Role,
        password: &str,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            full_name: FullName::new(full_name)?,
            email: Email::new(email)?,
            phone_number: PhoneNumber::new(phone_number)?,
            role,
            password: Password::new(password)?,
        })
    }
}

/// Insert payload for a new user row; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUserAccount {
    /// Display name.
    pub full_name: FullName,
    /// Login address.
    pub email: Email,
    /// Contact number.
    pub phone_number: PhoneNumber,
    /// Role, fixed for the lifetime of the row.
    pub role: Role,
    /// Digest of the signup password.
    pub password_hash: PasswordDigest,
}

/// Profile changes requested by a client. A new password arrives in
/// plaintext and is hashed before it becomes a [`UserChanges`].
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// Replacement display name.
    pub full_name: Option<FullName>,
    /// Replacement contact number.
    pub phone_number: Option<PhoneNumber>,
    /// Replacement password.
    pub password: Option<Password>,
}

impl ProfileUpdate {
    /// Validate raw optional fields, reporting the first invalid one.
    pub fn try_from_parts(
        full_name: Option<&str>,
        phone_number: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            full_name: full_name.map(FullName::new).transpose()?,
            phone_number: phone_number.map(PhoneNumber::new).transpose()?,
            password: password.map(Password::new).transpose()?,
        })
    }
}

/// Partial update to a user row. Role is absent: it never changes.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    /// Replacement display name.
    pub full_name: Option<FullName>,
    /// Replacement contact number.
    pub phone_number: Option<PhoneNumber>,
    /// Replacement password digest.
    pub password_hash: Option<PasswordDigest>,
}

impl UserChanges {
    /// True when the update would not modify any column.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.phone_number.is_none() && self.password_hash.is_none()
    }
}

/// Unique user columns that a write may collide on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueUserField {
    /// The `email` column.
    Email,
    /// The `phone_number` column.
    PhoneNumber,
}

impl UniqueUserField {
    /// Wire name of the column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::PhoneNumber => "phone_number",
        }
    }
}
