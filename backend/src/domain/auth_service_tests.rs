//! Tests for login and identity resolution.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockCredentialHasher, MockTokenService, MockUserRepository, StoreError};
use crate::domain::{
    ErrorCode, FullName, PasswordDigest, PhoneNumber, Role, StoredUser, TokenClaims, UserAccount,
    UserAccountParts, UserId,
};
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

type Service = AuthService<MockUserRepository, MockCredentialHasher, MockTokenService>;

fn make_service(
    users: MockUserRepository,
    hasher: MockCredentialHasher,
    tokens: MockTokenService,
) -> Service {
    AuthService::new(
        Arc::new(users),
        Arc::new(hasher),
        Arc::new(tokens),
        Some(Duration::minutes(60)),
    )
}

#[fixture]
fn stored_doctor() -> StoredUser {
    StoredUser {
        account: UserAccount::new(UserAccountParts {
            id: UserId::new(2),
            full_name: FullName::new("Gregory House").expect("valid name"),
            email: Email::new("house@clinic.test").expect("valid email"),
            phone_number: PhoneNumber::new("+1 555-0102").expect("valid phone"),
            role: Role::Doctor,
            created_at: Utc
                .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .single()
                .expect("valid timestamp"),
        }),
        password_hash: PasswordDigest::new("$argon2id$stub"),
    }
}

fn credentials(password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts("house@clinic.test", password).expect("credential shape")
}

fn bearer() -> BearerToken {
    BearerToken::new("header.payload.signature").expect("non-blank token")
}

fn claims_for(email: &str, role: Role) -> TokenClaims {
    let issued_at = Utc
        .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    TokenClaims {
        subject: Email::new(email).expect("valid email"),
        role,
        issued_at,
        expires_at: issued_at + Duration::minutes(15),
    }
}

#[rstest]
#[tokio::test]
async fn login_issues_token_for_matching_password(stored_doctor: StoredUser) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(Some(stored_doctor)));
    let mut hasher = MockCredentialHasher::new();
    hasher.expect_verify().times(1).return_const(true);
    let mut tokens = MockTokenService::new();
    tokens
        .expect_issue()
        .withf(|principal, ttl| {
            principal.role() == Role::Doctor
                && principal.user_id() == UserId::new(2)
                && *ttl == Some(Duration::minutes(60))
        })
        .times(1)
        .returning(|_, _| {
            Ok(IssuedToken {
                access_token: "signed".to_owned(),
                expires_in: 3600,
            })
        });

    let service = make_service(users, hasher, tokens);
    let token = service
        .login(&credentials("correct horse"))
        .await
        .expect("login succeeds");
    assert_eq!(token.access_token, "signed");
    assert_eq!(token.expires_in, 3600);
}

#[rstest]
#[tokio::test]
async fn wrong_password_and_unknown_email_are_indistinguishable(stored_doctor: StoredUser) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(Some(stored_doctor)));
    let mut hasher = MockCredentialHasher::new();
    hasher.expect_verify().times(1).return_const(false);
    let service = make_service(users, hasher, MockTokenService::new());
    let wrong_password = service
        .login(&credentials("wrong password"))
        .await
        .expect_err("wrong password");

    let mut missing = MockUserRepository::new();
    missing.expect_find_by_email().return_once(|_| Ok(None));
    let service = make_service(missing, MockCredentialHasher::new(), MockTokenService::new());
    let unknown_email = service
        .login(&credentials("whatever"))
        .await
        .expect_err("unknown email");

    assert_eq!(wrong_password.code(), ErrorCode::Unauthorized);
    assert_eq!(wrong_password.code(), unknown_email.code());
    assert_eq!(wrong_password.message(), unknown_email.message());
    assert_eq!(wrong_password.message(), "invalid credentials");
}

#[rstest]
#[tokio::test]
async fn login_rejects_non_email_usernames_without_lookup() {
    let service = make_service(
        MockUserRepository::new(),
        MockCredentialHasher::new(),
        MockTokenService::new(),
    );
    let creds = LoginCredentials::try_from_parts("house", "pw").expect("credential shape");
    let err = service.login(&creds).await.expect_err("not an email");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn login_surfaces_store_outages() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(|_| Err(StoreError::connection("refused")));
    let service = make_service(users, MockCredentialHasher::new(), MockTokenService::new());
    let err = service
        .login(&credentials("correct horse"))
        .await
        .expect_err("store down");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn resolve_takes_role_from_the_current_row(stored_doctor: StoredUser) {
    let mut tokens = MockTokenService::new();
    tokens
        .expect_validate()
        .times(1)
        .returning(|_| Ok(claims_for("house@clinic.test", Role::Admin)));
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .withf(|email| email.as_ref() == "house@clinic.test")
        .times(1)
        .return_once(move |_| Ok(Some(stored_doctor)));

    let service = make_service(users, MockCredentialHasher::new(), tokens);
    let principal = service.resolve(&bearer()).await.expect("resolves");
    assert_eq!(principal.role(), Role::Doctor);
    assert_eq!(principal.user_id(), UserId::new(2));
}

#[rstest]
#[case(TokenError::Expired)]
#[case(TokenError::invalid("bad signature"))]
#[tokio::test]
async fn resolve_collapses_token_failures(#[case] failure: TokenError) {
    let mut tokens = MockTokenService::new();
    tokens
        .expect_validate()
        .times(1)
        .return_once(move |_| Err(failure));
    let service = make_service(MockUserRepository::new(), MockCredentialHasher::new(), tokens);
    let err = service.resolve(&bearer()).await.expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "Token is invalid or expired");
}

#[rstest]
#[tokio::test]
async fn resolve_rejects_tokens_for_deleted_users() {
    let mut tokens = MockTokenService::new();
    tokens
        .expect_validate()
        .returning(|_| Ok(claims_for("gone@clinic.test", Role::Patient)));
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    let service = make_service(users, MockCredentialHasher::new(), tokens);
    let err = service.resolve(&bearer()).await.expect_err("subject missing");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "User not found");
}
