//! Driving port for login and identity resolution.
//!
//! Inbound adapters call these ports to exchange credentials for a token and
//! to turn a presented token back into a [`Principal`], without knowing which
//! hasher, signer, or store sits behind them.

use async_trait::async_trait;

use crate::domain::{BearerToken, Error, IssuedToken, LoginCredentials, Principal};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and issue a bearer token.
    ///
    /// Every failure, unknown email and wrong password alike, is reported as
    /// the same unauthorized error.
    async fn login(&self, credentials: &LoginCredentials) -> Result<IssuedToken, Error>;
}

/// Domain use-case port for recovering the caller behind a token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Validate `token` and re-read the subject's user row.
    async fn resolve(&self, token: &BearerToken) -> Result<Principal, Error>;
}
