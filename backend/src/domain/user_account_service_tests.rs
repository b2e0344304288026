//! Tests for the account service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockCredentialHasher, MockRecordStore, MockUserRepository};
use crate::domain::{
    Email, ErrorCode, FullName, PhoneNumber, RecordId, ReferenceCensus, ReferenceField,
    StoredUser, UserAccountParts,
};
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::json;

type Service = UserAccountService<MockUserRepository, MockRecordStore, MockCredentialHasher>;

fn make_service(
    users: MockUserRepository,
    records: MockRecordStore,
    hasher: MockCredentialHasher,
) -> Service {
    UserAccountService::new(Arc::new(users), Arc::new(records), Arc::new(hasher))
}

fn principal(id: i64, email: &str, role: Role) -> Principal {
    Principal::new(UserId::new(id), Email::new(email).expect("valid email"), role)
}

fn hashing() -> MockCredentialHasher {
    let mut hasher = MockCredentialHasher::new();
    hasher
        .expect_hash()
        .returning(|_| Ok(PasswordDigest::new("$argon2id$fresh")));
    hasher
}

#[fixture]
fn alice() -> UserAccount {
    UserAccount::new(UserAccountParts {
        id: UserId::new(1),
        full_name: FullName::new("Alice Liddell").expect("valid name"),
        email: Email::new("alice@x.com").expect("valid email"),
        phone_number: PhoneNumber::new("+44 7700 900001").expect("valid phone"),
        role: Role::Patient,
        created_at: Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp"),
    })
}

fn signup_profile() -> SignupProfile {
    SignupProfile::try_from_parts(
        "Alice Liddell",
        "alice@x.com",
        "+44 7700 900001",
        Role::Patient,
        "correct horse",
    )
    .expect("valid profile")
}

#[rstest]
#[tokio::test]
async fn signup_stores_only_the_digest(alice: UserAccount) {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .withf(|user: &NewUserAccount| {
            user.password_hash.as_str() == "$argon2id$fresh" && user.role == Role::Patient
        })
        .times(1)
        .return_once(move |_| Ok(UserInsert::Inserted(alice)));
    let service = make_service(users, MockRecordStore::new(), hashing());

    let account = service.signup(signup_profile()).await.expect("signup");
    assert_eq!(account.email().as_ref(), "alice@x.com");
}

#[rstest]
#[case(UniqueUserField::Email, "email")]
#[case(UniqueUserField::PhoneNumber, "phone_number")]
#[tokio::test]
async fn signup_reports_duplicates_as_conflicts(
    #[case] field: UniqueUserField,
    #[case] name: &str,
) {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .return_once(move |_| Ok(UserInsert::Duplicate(field)));
    let service = make_service(users, MockRecordStore::new(), hashing());

    let err = service
        .signup(signup_profile())
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.details(), Some(&json!({ "field": name })));
}

#[rstest]
#[tokio::test]
async fn patients_may_not_list_users() {
    let service = make_service(
        MockUserRepository::new(),
        MockRecordStore::new(),
        MockCredentialHasher::new(),
    );
    let err = service
        .list(&principal(1, "alice@x.com", Role::Patient))
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn any_role_may_get_a_user(alice: UserAccount) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .withf(|id| *id == UserId::new(1))
        .return_once(move |_| Ok(Some(alice)));
    let service = make_service(users, MockRecordStore::new(), MockCredentialHasher::new());
    let account = service
        .get(&principal(3, "bob@x.com", Role::Patient), UserId::new(1))
        .await
        .expect("visible");
    assert_eq!(account.id(), UserId::new(1));
}

#[rstest]
#[tokio::test]
async fn update_hashes_new_passwords(alice: UserAccount) {
    let mut users = MockUserRepository::new();
    users
        .expect_update()
        .withf(|_, changes: &UserChanges| {
            changes
                .password_hash
                .as_ref()
                .is_some_and(|digest| digest.as_str() == "$argon2id$fresh")
                && changes.full_name.is_none()
        })
        .times(1)
        .return_once(move |_, _| Ok(UserUpdate::Updated(alice)));
    let service = make_service(users, MockRecordStore::new(), hashing());
    let update = ProfileUpdate::try_from_parts(None, None, Some("new password")).expect("shape");
    service
        .update(&principal(9, "root@x.com", Role::Admin), UserId::new(1), update)
        .await
        .expect("updated");
}

#[rstest]
#[tokio::test]
async fn update_requires_some_change() {
    let service = make_service(
        MockUserRepository::new(),
        MockRecordStore::new(),
        MockCredentialHasher::new(),
    );
    let err = service
        .update(
            &principal(9, "root@x.com", Role::Admin),
            UserId::new(1),
            ProfileUpdate::default(),
        )
        .await
        .expect_err("empty update");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case(Role::Doctor)]
#[case(Role::Patient)]
#[tokio::test]
async fn only_admins_update_users(#[case] role: Role) {
    let service = make_service(
        MockUserRepository::new(),
        MockRecordStore::new(),
        MockCredentialHasher::new(),
    );
    let update = ProfileUpdate::try_from_parts(Some("New Name"), None, None).expect("shape");
    let err = service
        .update(&principal(2, "doc@x.com", role), UserId::new(1), update)
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn delete_reports_blocking_relations() {
    let mut records = MockRecordStore::new();
    records
        .expect_delete_unreferenced()
        .withf(|kind, id| *kind == EntityKind::User && *id == RecordId::new(1))
        .times(1)
        .return_once(|_, _| {
            Ok(Deletion::Referenced(ReferenceCensus::from_counts([(
                ReferenceField::PaymentUser,
                1,
            )])))
        });
    let service = make_service(MockUserRepository::new(), records, MockCredentialHasher::new());
    let err = service
        .delete(&principal(9, "root@x.com", Role::Admin), UserId::new(1))
        .await
        .expect_err("blocked");
    assert_eq!(err.code(), ErrorCode::ReferencedConflict);
    assert_eq!(err.message(), "User is referenced in payments");
}

#[rstest]
#[tokio::test]
async fn delete_of_missing_user_is_not_found() {
    let mut records = MockRecordStore::new();
    records
        .expect_delete_unreferenced()
        .return_once(|_, _| Ok(Deletion::NotFound));
    let service = make_service(MockUserRepository::new(), records, MockCredentialHasher::new());
    let err = service
        .delete(&principal(9, "root@x.com", Role::Admin), UserId::new(44))
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "User not found");
}

fn reset_for(email: &str) -> PasswordReset {
    PasswordReset {
        email: Email::new(email).expect("valid email"),
        new_password: Password::new("brand new secret").expect("valid password"),
    }
}

#[rstest]
#[tokio::test]
async fn users_reset_their_own_password(alice: UserAccount) {
    let stored = StoredUser {
        account: alice.clone(),
        password_hash: PasswordDigest::new("$argon2id$old"),
    };
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(stored)));
    users
        .expect_update()
        .withf(|id, changes| *id == UserId::new(1) && changes.password_hash.is_some())
        .times(1)
        .return_once(move |_, _| Ok(UserUpdate::Updated(alice)));
    let service = make_service(users, MockRecordStore::new(), hashing());
    service
        .reset_password(&principal(1, "alice@x.com", Role::Patient), reset_for("alice@x.com"))
        .await
        .expect("reset");
}

#[rstest]
#[tokio::test]
async fn resetting_someone_elses_password_is_forbidden() {
    let service = make_service(
        MockUserRepository::new(),
        MockRecordStore::new(),
        MockCredentialHasher::new(),
    );
    let err = service
        .reset_password(&principal(2, "doc@x.com", Role::Doctor), reset_for("alice@x.com"))
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn admins_reset_unknown_email_as_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    let service = make_service(users, MockRecordStore::new(), MockCredentialHasher::new());
    let err = service
        .reset_password(&principal(9, "root@x.com", Role::Admin), reset_for("nobody@x.com"))
        .await
        .expect_err("unknown");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
