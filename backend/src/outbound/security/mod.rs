//! Credential and token adapters.
//!
//! - [`Argon2Hasher`] implements [`CredentialHasher`](crate::domain::ports::CredentialHasher).
//! - [`JwtTokenService`] implements [`TokenService`](crate::domain::ports::TokenService).
//! - [`token_secret_from_env`] loads the signing secret both rely on.

mod argon2_hasher;
mod jwt_token_service;
mod token_secret;

pub use argon2_hasher::Argon2Hasher;
pub use jwt_token_service::{DEFAULT_TOKEN_TTL_MINUTES, JwtTokenService};
pub use token_secret::fingerprint::secret_fingerprint;
pub use token_secret::{
    BuildMode, TOKEN_SECRET_MIN_LEN, TokenSecret, TokenSecretError, token_secret_from_env,
};
