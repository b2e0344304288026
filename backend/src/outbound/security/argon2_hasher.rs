//! Argon2id implementation of the [`CredentialHasher`] port.
//!
//! Hashing is CPU-bound by design, so both operations run on the blocking
//! thread pool with the caller's trace identifier carried across.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use password_hash::rand_core::OsRng;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{CredentialError, CredentialHasher};
use crate::domain::{Password, PasswordDigest, TraceId};

/// Salted Argon2id hashing with PHC-formatted digests.
#[derive(Clone, Default)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Hasher using explicit cost parameters.
    ///
    /// Verification reads the parameters embedded in each digest, so
    /// changing them only affects newly produced digests.
    #[must_use]
    pub const fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn engine(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

fn current_trace() -> TraceId {
    TraceId::current().unwrap_or_else(TraceId::generate)
}

#[async_trait]
impl CredentialHasher for Argon2Hasher {
    async fn hash(&self, password: &Password) -> Result<PasswordDigest, CredentialError> {
        let secret = Zeroizing::new(password.expose().to_owned());
        let engine = self.engine();
        let trace_id = current_trace();
        let outcome = tokio::task::spawn_blocking(move || {
            TraceId::sync_scope(trace_id, || {
                let salt = SaltString::generate(&mut OsRng);
                engine
                    .hash_password(secret.as_bytes(), &salt)
                    .map(|digest| PasswordDigest::new(digest.to_string()))
                    .map_err(|err| CredentialError::hashing(err.to_string()))
            })
        })
        .await;
        match outcome {
            Ok(result) => result,
            Err(join_error) => Err(CredentialError::hashing(format!(
                "hashing task failed: {join_error}"
            ))),
        }
    }

    async fn verify(&self, password: &Password, digest: &PasswordDigest) -> bool {
        let secret = Zeroizing::new(password.expose().to_owned());
        let stored = digest.as_str().to_owned();
        let engine = self.engine();
        let trace_id = current_trace();
        let outcome = tokio::task::spawn_blocking(move || {
            TraceId::sync_scope(trace_id, || match PasswordHash::new(&stored) {
                Ok(parsed) => engine.verify_password(secret.as_bytes(), &parsed).is_ok(),
                Err(err) => {
                    debug!(error = %err, "stored digest is not a PHC string");
                    false
                }
            })
        })
        .await;
        outcome.unwrap_or_else(|join_error| {
            debug!(error = %join_error, "verification task failed");
            false
        })
    }
}
