//! Shared harness for the HTTP integration suites.
//!
//! The app is assembled from the public crate surface exactly as the server
//! binary assembles it, minus the listener: trace middleware, the API route
//! table, and domain services over the in-memory store.

pub mod embedded_postgres;

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::{AUTHORIZATION, HeaderName};
use actix_web::{App, web};
use argon2::Params;
use clinic_backend::Trace;
use clinic_backend::domain::{Email, LoginCredentials, Principal, Role, SignupProfile, UserId};
use clinic_backend::inbound::http::routes;
use clinic_backend::inbound::http::state::HttpState;
use clinic_backend::outbound::memory::MemoryStore;
use clinic_backend::outbound::security::{Argon2Hasher, JwtTokenService, TokenSecret};
use mockable::DefaultClock;

/// Password every enrolled account shares.
pub const PASSWORD: &str = "correct horse battery";

/// Argon2id with the cheapest accepted cost.
pub fn fast_hasher() -> Argon2Hasher {
    let params = Params::new(8 * 1024, 1, 1, None).expect("argon2 params");
    Argon2Hasher::with_params(params)
}

/// Domain services over a fresh in-memory store.
pub fn memory_state() -> web::Data<HttpState> {
    let clock = Arc::new(DefaultClock);
    let store = Arc::new(MemoryStore::new(clock.clone()));
    let secret = TokenSecret::from_bytes(b"integration-suite-signing-secret!".to_vec())
        .expect("secret long enough");
    let tokens = Arc::new(JwtTokenService::new(&secret, clock));
    web::Data::new(HttpState::from_adapters(
        store.clone(),
        store,
        Arc::new(fast_hasher()),
        tokens,
        Some(chrono::Duration::minutes(60)),
    ))
}

/// The application as served, over `state`.
pub fn clinic_app(
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
    App::new()
        .app_data(state)
        .wrap(Trace)
        .configure(routes::configure)
}

/// An account plus a live bearer token.
#[derive(Debug, Clone)]
pub struct Enrolled {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    pub token: String,
}

impl Enrolled {
    /// `Authorization: Bearer ...` for this account.
    pub fn bearer(&self) -> (HeaderName, String) {
        (AUTHORIZATION, format!("Bearer {}", self.token))
    }

    /// The principal the identity resolver would produce for this account.
    pub fn principal(&self) -> Principal {
        let email = Email::new(&self.email).expect("enrolled email is valid");
        Principal::new(self.id, email, self.role)
    }
}

/// Create `handle@clinic.test` with `role` and log it in.
///
/// `seq` must differ between accounts in one store; it keeps phone numbers
/// unique.
pub async fn enrol(state: &HttpState, handle: &str, role: Role, seq: u8) -> Enrolled {
    let email = format!("{handle}@clinic.test");
    let phone = format!("+1 555 010 {seq:04}");
    let profile = SignupProfile::try_from_parts(handle, &email, &phone, role, PASSWORD)
        .expect("valid profile");
    let account = state.accounts.signup(profile).await.expect("signup");
    let credentials = LoginCredentials::try_from_parts(&email, PASSWORD).expect("credentials");
    let token = state.login.login(&credentials).await.expect("login");
    Enrolled {
        id: account.id(),
        email,
        role,
        token: token.access_token,
    }
}
