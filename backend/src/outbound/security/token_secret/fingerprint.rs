//! Token secret fingerprinting for operational visibility.
//!
//! Operators compare the logged fingerprint against the one recorded when a
//! secret was provisioned, without the key material ever reaching the logs.

use sha2::{Digest, Sha256};

use super::TokenSecret;

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Truncated SHA-256 fingerprint of the secret as 16 lowercase hex digits.
///
/// # Examples
///
/// ```rust
/// use clinic_backend::outbound::security::TokenSecret;
/// use clinic_backend::outbound::security::secret_fingerprint;
///
/// let secret = TokenSecret::ephemeral();
/// let fp = secret_fingerprint(&secret);
///
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn secret_fingerprint(secret: &TokenSecret) -> String {
    let digest = Sha256::digest(secret.as_bytes());
    hex::encode(digest.iter().take(FINGERPRINT_BYTES).copied().collect::<Vec<u8>>())
}
