//! Test helpers for inbound HTTP components.
//!
//! [`memory_state`] wires the real domain services over the in-memory store,
//! a cheap Argon2 profile, and a fixed signing secret, so handler tests
//! exercise the same code paths as the server.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::{AUTHORIZATION, HeaderName};
use actix_web::{App, web};
use argon2::Params;
use mockable::DefaultClock;

use crate::domain::{LoginCredentials, Role, SignupProfile, UserId};
use crate::outbound::memory::MemoryStore;
use crate::outbound::security::{Argon2Hasher, JwtTokenService, TokenSecret};

use super::routes::configure;
use super::state::HttpState;

/// Password shared by every account [`enrol`] creates.
pub(crate) const TEST_PASSWORD: &str = "correct horse battery";

/// The API routes mounted over `state`, as the server mounts them.
pub(crate) fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).configure(configure)
}

/// Argon2id with the smallest sensible cost so tests stay fast.
pub(crate) fn fast_hasher() -> Argon2Hasher {
    let params = Params::new(8 * 1024, 1, 1, None)
        .unwrap_or_else(|error| panic!("argon2 test params: {error}"));
    Argon2Hasher::with_params(params)
}

/// HTTP state backed by a fresh in-memory store.
pub(crate) fn memory_state() -> web::Data<HttpState> {
    let clock = Arc::new(DefaultClock);
    let store = Arc::new(MemoryStore::new(clock.clone()));
    let secret = TokenSecret::from_bytes(vec![7_u8; 32])
        .unwrap_or_else(|error| panic!("test secret: {error}"));
    let tokens = Arc::new(JwtTokenService::new(&secret, clock));
    web::Data::new(HttpState::from_adapters(
        store.clone(),
        store,
        Arc::new(fast_hasher()),
        tokens,
        None,
    ))
}

/// Account created through the driving ports together with a live token.
#[derive(Debug, Clone)]
pub(crate) struct Enrolled {
    pub id: UserId,
    pub email: String,
    pub token: String,
}

impl Enrolled {
    /// `Authorization` header carrying this account's token.
    pub(crate) fn bearer(&self) -> (HeaderName, String) {
        (AUTHORIZATION, format!("Bearer {}", self.token))
    }
}

/// Sign up `handle@clinic.test` with `role`, then log in.
///
/// `seq` keeps phone numbers unique within one store.
pub(crate) async fn enrol(state: &HttpState, handle: &str, role: Role, seq: u8) -> Enrolled {
    let email = format!("{handle}@clinic.test");
    let phone = format!("+44 7700 9000{seq:02}");
    let profile = SignupProfile::try_from_parts(handle, &email, &phone, role, TEST_PASSWORD)
        .unwrap_or_else(|error| panic!("test profile: {error}"));
    let account = state
        .accounts
        .signup(profile)
        .await
        .unwrap_or_else(|error| panic!("signup {handle}: {error}"));
    let credentials = LoginCredentials::try_from_parts(&email, TEST_PASSWORD)
        .unwrap_or_else(|error| panic!("credentials: {error}"));
    let token = state
        .login
        .login(&credentials)
        .await
        .unwrap_or_else(|error| panic!("login {handle}: {error}"));
    Enrolled {
        id: account.id(),
        email,
        token: token.access_token,
    }
}
