//! Token signing secret loading and validation.
//!
//! The secret is read once at startup and then shared read-only for the life
//! of the process. Rotating it means restarting with a new file, which
//! invalidates every outstanding token.

pub mod fingerprint;

use std::fmt;
use std::path::PathBuf;

use mockable::Env;
use rand::RngCore;
use tracing::warn;
use zeroize::Zeroizing;

const SECRET_DEFAULT_PATH: &str = "/var/run/secrets/token_secret";
/// Shortest secret accepted from a file, in bytes.
pub const TOKEN_SECRET_MIN_LEN: usize = 32;
const EPHEMERAL_SECRET_LEN: usize = 64;
const SECRET_FILE_ENV: &str = "CLINIC_TOKEN_SECRET_FILE";
const ALLOW_EPHEMERAL_ENV: &str = "CLINIC_TOKEN_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";

/// Build mode for secret validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds fall back to an ephemeral secret with a warning.
    Debug,
    /// Release builds require a readable secret unless explicitly allowed.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clinic_backend::outbound::security::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub const fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// HMAC key material for bearer tokens. Zeroed on drop.
#[derive(Clone)]
pub struct TokenSecret(Zeroizing<Vec<u8>>);

impl TokenSecret {
    /// Wrap raw key material, rejecting anything shorter than
    /// [`TOKEN_SECRET_MIN_LEN`].
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, TokenSecretError> {
        let bytes = Zeroizing::new(bytes);
        if bytes.len() < TOKEN_SECRET_MIN_LEN {
            return Err(TokenSecretError::TooShort {
                length: bytes.len(),
                min_len: TOKEN_SECRET_MIN_LEN,
            });
        }
        Ok(Self(bytes))
    }

    /// Fresh random key material, valid until the process exits.
    #[must_use]
    pub fn ephemeral() -> Self {
        let mut bytes = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
        rand::thread_rng().fill_bytes(bytes.as_mut_slice());
        Self(bytes)
    }

    /// Raw key material.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSecret(<redacted>)")
    }
}

/// Errors raised while loading the signing secret.
#[derive(thiserror::Error, Debug)]
pub enum TokenSecretError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
        /// Accepted forms.
        expected: &'static str,
    },
    /// Reading the secret file failed.
    #[error("failed to read token secret at {path}: {source}")]
    SecretRead {
        /// Location that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The secret is too short to sign with.
    #[error("token secret too short: need >= {min_len} bytes, got {length}")]
    TooShort {
        /// Bytes supplied.
        length: usize,
        /// Bytes required.
        min_len: usize,
    },
    /// Release builds must opt in to ephemeral secrets explicitly.
    #[error("token secret unreadable at {path} and ephemeral secrets are disabled")]
    EphemeralNotAllowed {
        /// Location that was read.
        path: PathBuf,
    },
}

/// Load the signing secret named by `CLINIC_TOKEN_SECRET_FILE`.
///
/// # Examples
///
/// ```rust
/// use clinic_backend::outbound::security::{token_secret_from_env, BuildMode};
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let path = std::env::temp_dir().join("token_secret_example");
/// std::fs::write(&path, vec![b'k'; 48])?;
///
/// let path_text = path.to_string_lossy().into_owned();
/// let mut env = MockEnv::new();
/// env.expect_string().returning(move |name| match name {
///     "CLINIC_TOKEN_SECRET_FILE" => Some(path_text.clone()),
///     _ => None,
/// });
///
/// let secret = token_secret_from_env(&env, BuildMode::Release)?;
/// assert_eq!(secret.as_bytes().len(), 48);
///
/// std::fs::remove_file(&path)?;
/// # Ok(())
/// # }
/// ```
pub fn token_secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSecret, TokenSecretError> {
    let allow_ephemeral = allow_ephemeral_from_env(env)?;
    let path = PathBuf::from(
        env.string(SECRET_FILE_ENV)
            .unwrap_or_else(|| SECRET_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(bytes) => TokenSecret::from_bytes(trim_trailing_newline(bytes)),
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using ephemeral token secret; tokens will not survive a restart"
            );
            Ok(TokenSecret::ephemeral())
        }
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            Err(TokenSecretError::EphemeralNotAllowed { path })
        }
        Err(error) => Err(TokenSecretError::SecretRead {
            path,
            source: error,
        }),
    }
}

fn allow_ephemeral_from_env<E: Env>(env: &E) -> Result<bool, TokenSecretError> {
    match env.string(ALLOW_EPHEMERAL_ENV) {
        None => Ok(false),
        Some(value) => parse_bool(&value).ok_or(TokenSecretError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn trim_trailing_newline(mut bytes: Vec<u8>) -> Vec<u8> {
    while matches!(bytes.last(), Some(b'\n' | b'\r')) {
        bytes.pop();
    }
    bytes
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
