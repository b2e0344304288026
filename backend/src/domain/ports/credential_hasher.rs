//! Port for one-way password hashing.

use async_trait::async_trait;

use crate::domain::{Password, PasswordDigest};

use super::define_port_error;

define_port_error! {
    /// Failures raised while producing a digest.
    pub enum CredentialError {
        /// The hashing backend rejected the input or parameters.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Salted, deliberately slow password hashing.
///
/// Hashing the same password twice yields different digests; both verify.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Produce a salted digest of `password`.
    async fn hash(&self, password: &Password) -> Result<PasswordDigest, CredentialError>;

    /// True when `password` matches `digest`. Malformed digests verify false.
    async fn verify(&self, password: &Password, digest: &PasswordDigest) -> bool;
}
