//! HS256 JSON Web Token implementation of the [`TokenService`] port.
//!
//! Expiry is checked here against an injected clock instead of inside
//! `jsonwebtoken`, so the validity window is exact (no leeway) and tests can
//! move time.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use super::TokenSecret;
use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{BearerToken, Email, IssuedToken, Principal, Role, TokenClaims};

/// Lifetime applied when the caller does not ask for one.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 15;

#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies bearer tokens with a process-wide secret.
#[derive(Clone)]
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock + Send + Sync>,
    default_ttl: Duration,
}

impl JwtTokenService {
    /// Service signing with `secret` and reading time from `clock`.
    #[must_use]
    pub fn new(secret: &TokenSecret, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::from(["exp".to_owned(), "sub".to_owned()]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            clock,
            default_ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
        }
    }

    fn decode_claims(&self, token: &BearerToken) -> Result<WireClaims, TokenError> {
        decode::<WireClaims>(token.as_str(), &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| TokenError::invalid(err.to_string()))
    }
}

fn instant(field: &str, seconds: i64) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| TokenError::invalid(format!("{field} is out of range")))
}

impl TokenService for JwtTokenService {
    fn issue(
        &self,
        principal: &Principal,
        ttl: Option<Duration>,
    ) -> Result<IssuedToken, TokenError> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let issued_at = self.clock.utc();
        let claims = WireClaims {
            sub: principal.email().as_ref().to_owned(),
            role: principal.role().as_str().to_owned(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        };
        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))?;
        Ok(IssuedToken {
            access_token,
            expires_in: ttl.num_seconds(),
        })
    }

    fn validate(&self, token: &BearerToken) -> Result<TokenClaims, TokenError> {
        let claims = self.decode_claims(token)?;
        if self.clock.utc().timestamp() >= claims.exp {
            return Err(TokenError::expired());
        }
        let subject = Email::new(&claims.sub)
            .map_err(|err| TokenError::invalid(format!("subject: {err}")))?;
        let role: Role = claims
            .role
            .parse()
            .map_err(|err| TokenError::invalid(format!("role: {err}")))?;
        Ok(TokenClaims {
            subject,
            role,
            issued_at: instant("iat", claims.iat)?,
            expires_at: instant("exp", claims.exp)?,
        })
    }
}

#[cfg(test)]
#[path = "jwt_token_service_tests.rs"]
mod tests;
