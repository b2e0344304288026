//! Bearer authentication for HTTP handlers.
//!
//! [`Authenticated`] is an extractor: adding it to a handler signature makes
//! Actix resolve the `Authorization: Bearer <token>` header into a
//! [`Principal`] before the handler body runs. Missing, malformed, expired,
//! or orphaned tokens short-circuit with `401 Unauthorized`.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{BearerToken, Error, Principal};

use super::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// Principal resolved from the request's bearer token.
#[derive(Debug, Clone)]
pub struct Authenticated(Principal);

impl Authenticated {
    /// The resolved principal.
    pub fn principal(&self) -> &Principal {
        &self.0
    }

    /// Consume the extractor, returning the principal.
    pub fn into_inner(self) -> Principal {
        self.0
    }
}

/// Pull the bearer token out of the `Authorization` header.
pub(crate) fn bearer_token(req: &HttpRequest) -> Result<BearerToken, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("Not authenticated"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("Malformed authorization header"))?;
    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| Error::unauthorized("Malformed authorization header"))?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(Error::unauthorized("Unsupported authorization scheme"));
    }
    BearerToken::new(token.trim()).ok_or_else(|| Error::unauthorized("Not authenticated"))
}

impl FromRequest for Authenticated {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not registered"))?;
            let token = token.inspect_err(|error| {
                tracing::debug!(reason = error.message(), "bearer token missing or malformed");
            })?;
            let principal = state.identity.resolve(&token).await?;
            Ok(Self(principal))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use rstest::rstest;

    use crate::domain::ports::{
        MockClinicalRecords, MockIdentityResolver, MockLoginService, MockUserAccounts,
    };
    use crate::domain::{Email, Role, UserId};
    use crate::inbound::http::state::HttpStatePorts;

    fn doctor() -> Principal {
        Principal::new(
            UserId::new(2),
            Email::new("house@clinic.org").expect("email"),
            Role::Doctor,
        )
    }

    fn state_with(identity: MockIdentityResolver) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            login: Arc::new(MockLoginService::new()),
            identity: Arc::new(identity),
            accounts: Arc::new(MockUserAccounts::new()),
            records: Arc::new(MockClinicalRecords::new()),
        }))
    }

    async fn whoami(auth: Authenticated) -> HttpResponse {
        HttpResponse::Ok().body(auth.principal().role().to_string())
    }

    #[rstest]
    #[case("Bearer good-token")]
    #[case("bearer good-token")]
    #[case("  Bearer   good-token ")]
    #[actix_web::test]
    async fn resolves_the_principal(#[case] header: &str) {
        let mut identity = MockIdentityResolver::new();
        identity
            .expect_resolve()
            .withf(|token| token.as_str() == "good-token")
            .times(1)
            .returning(|_| Ok(doctor()));
        let app = test::init_service(
            App::new()
                .app_data(state_with(identity))
                .route("/", web::get().to(whoami)),
        )
        .await;

        let request = test::TestRequest::get()
            .uri("/")
            .insert_header((AUTHORIZATION, header))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(test::read_body(response).await, "Doctor");
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Basic dXNlcjpwdw=="))]
    #[case(Some("Bearer"))]
    #[case(Some("Bearer    "))]
    #[actix_web::test]
    async fn rejects_requests_without_a_usable_token(#[case] header: Option<&str>) {
        let mut identity = MockIdentityResolver::new();
        identity.expect_resolve().never();
        let app = test::init_service(
            App::new()
                .app_data(state_with(identity))
                .route("/", web::get().to(whoami)),
        )
        .await;

        let mut request = test::TestRequest::get().uri("/");
        if let Some(value) = header {
            request = request.insert_header((AUTHORIZATION, value));
        }
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn resolver_failures_surface_as_unauthorised() {
        let mut identity = MockIdentityResolver::new();
        identity
            .expect_resolve()
            .returning(|_| Err(Error::unauthorized("Token is invalid or expired")));
        let app = test::init_service(
            App::new()
                .app_data(state_with(identity))
                .route("/", web::get().to(whoami)),
        )
        .await;

        let request = test::TestRequest::get()
            .uri("/")
            .insert_header((AUTHORIZATION, "Bearer stale"))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body.get("code"), Some(&serde_json::json!("unauthorized")));
    }
}
