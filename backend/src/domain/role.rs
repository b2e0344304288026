//! Role enumeration governing operation eligibility.
//!
//! Roles are not ordered. Which roles may perform an operation is decided
//! solely by the allow-list table in [`crate::domain::access`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fixed set of roles a user may hold.
///
/// Serialised using the capitalised names (`"Patient"`, `"Doctor"`,
/// `"Admin"`), which is also the form embedded in bearer tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// A person receiving care.
    Patient,
    /// A clinician.
    Doctor,
    /// An operator with administrative rights.
    Admin,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Self; 3] = [Self::Patient, Self::Doctor, Self::Admin];

    /// Stable textual form used on the wire and in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Doctor => "Doctor",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when text does not name a known role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'; expected Patient, Doctor or Admin")]
pub struct RoleParseError(String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RoleParseError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for role parsing.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Patient", Role::Patient)]
    #[case("doctor", Role::Doctor)]
    #[case(" ADMIN ", Role::Admin)]
    fn parses_known_roles(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(raw.parse::<Role>().expect("known role"), expected);
    }

    #[rstest]
    fn rejects_unknown_roles() {
        assert!("Nurse".parse::<Role>().is_err());
    }

    #[rstest]
    fn display_matches_wire_form() {
        for role in Role::ALL {
            let json = serde_json::to_value(role).expect("serialise role");
            assert_eq!(json, serde_json::json!(role.to_string()));
        }
    }
}
