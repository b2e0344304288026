//! Port for issuing and validating signed bearer tokens.

use chrono::Duration;

use crate::domain::{BearerToken, IssuedToken, Principal, TokenClaims};

use super::define_port_error;

define_port_error! {
    /// Token failures. Callers collapse `Invalid` and `Expired` into a single
    /// unauthorized outcome; the split exists for diagnostics.
    pub enum TokenError {
        /// Signature, structure, or claims did not check out.
        Invalid { message: String } => "token is invalid: {message}",
        /// The token was valid but its lifetime has elapsed.
        Expired => "token has expired",
        /// The token could not be signed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Stateless signed tokens carrying subject email and role.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token for `principal` valid for `ttl`, or the adapter default
    /// when `ttl` is `None`.
    fn issue(&self, principal: &Principal, ttl: Option<Duration>)
    -> Result<IssuedToken, TokenError>;

    /// Verify the signature and expiry of `token` and return its claims.
    fn validate(&self, token: &BearerToken) -> Result<TokenClaims, TokenError>;
}
