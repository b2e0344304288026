//! Login and identity resolution.
//!
//! [`AuthService`] implements the [`LoginService`] and [`IdentityResolver`]
//! driving ports on top of a user repository, a credential hasher, and a
//! token service. Every authentication failure is reported to callers as
//! `Unauthorized`; the specific reason is only logged.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;

use crate::domain::ports::{
    CredentialHasher, IdentityResolver, LoginService, TokenError, TokenService, UserRepository,
};
use crate::domain::{BearerToken, Email, Error, IssuedToken, LoginCredentials, Principal};

const INVALID_CREDENTIALS: &str = "invalid credentials";
const INVALID_TOKEN: &str = "Token is invalid or expired";
const UNKNOWN_SUBJECT: &str = "User not found";

/// Authentication service implementing the login and resolver ports.
#[derive(Clone)]
pub struct AuthService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    token_ttl: Option<Duration>,
}

impl<U, H, T> AuthService<U, H, T> {
    /// Create a service. `token_ttl` overrides the token adapter's default
    /// lifetime when set.
    pub fn new(
        users: Arc<U>,
        hasher: Arc<H>,
        tokens: Arc<T>,
        token_ttl: Option<Duration>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            token_ttl,
        }
    }
}

#[async_trait]
impl<U, H, T> LoginService for AuthService<U, H, T>
where
    U: UserRepository,
    H: CredentialHasher,
    T: TokenService,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<IssuedToken, Error> {
        let Ok(email) = Email::new(credentials.username()) else {
            tracing::debug!("login rejected: username is not an email address");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let Some(stored) = self.users.find_by_email(&email).await? else {
            tracing::debug!("login rejected: unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let candidate = credentials.password_candidate();
        if !self.hasher.verify(&candidate, &stored.password_hash).await {
            tracing::debug!(user_id = %stored.account.id(), "login rejected: password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let principal = Principal::from(&stored.account);
        let token = self
            .tokens
            .issue(&principal, self.token_ttl)
            .map_err(|err| Error::internal(format!("failed to issue token: {err}")))?;
        tracing::info!(user_id = %principal.user_id(), role = %principal.role(), "login succeeded");
        Ok(token)
    }
}

#[async_trait]
impl<U, H, T> IdentityResolver for AuthService<U, H, T>
where
    U: UserRepository,
    H: CredentialHasher,
    T: TokenService,
{
    async fn resolve(&self, token: &BearerToken) -> Result<Principal, Error> {
        let claims = self.tokens.validate(token).map_err(|err| {
            match err {
                TokenError::Expired => tracing::debug!("bearer token expired"),
                other => tracing::debug!(error = %other, "bearer token rejected"),
            }
            Error::unauthorized(INVALID_TOKEN)
        })?;

        let Some(stored) = self.users.find_by_email(&claims.subject).await? else {
            tracing::debug!("bearer token subject no longer exists");
            return Err(Error::unauthorized(UNKNOWN_SUBJECT));
        };
        Ok(Principal::from(&stored.account))
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
