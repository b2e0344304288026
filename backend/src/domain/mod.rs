//! Domain primitives, services, and ports.
//!
//! Purpose: define strongly typed entities, the authorization table, and the
//! services that enforce authentication, authorization, and referential
//! integrity. Nothing in this module knows about HTTP or SQL; adapters plug
//! in through [`ports`].
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: transport-agnostic failure payload.
//! - [`UserAccount`], [`Principal`], [`Role`]: identities and their roles.
//! - [`Record`], [`RecordDraft`], [`EntityKind`]: the six record kinds.
//! - [`ACCESS_RULES`], [`guard`], [`read_scope`]: the authorization guard.
//! - [`AuthService`], [`UserAccountService`], [`ClinicalRecordService`]:
//!   driving port implementations.

pub mod access;
pub mod auth;
pub mod auth_service;
pub mod clinical_record_service;
pub mod entity;
pub mod error;
pub mod ids;
pub mod ports;
pub mod records;
pub mod role;
pub mod trace_id;
pub mod user;
pub mod user_account_service;

pub use self::access::{
    ACCESS_RULES, AccessRule, Action, ReadScope, allowed_roles, authorize, guard, read_scope,
};
pub use self::auth::{
    BearerToken, IssuedToken, LoginCredentials, LoginValidationError, PasswordReset, Principal,
    TokenClaims,
};
pub use self::auth_service::AuthService;
pub use self::clinical_record_service::ClinicalRecordService;
pub use self::entity::{EntityKind, ForeignKey, ReferenceCensus, ReferenceField, Relation};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{IdParseError, RecordId, UserId};
pub use self::records::{
    Appointment, AppointmentDraft, AppointmentStatus, Entity, FieldError, InventoryDraft,
    InventoryItem, LabTest, LabTestDraft, MedicalRecord, MedicalRecordDraft, Payment,
    PaymentDraft, PaymentStatus, Prescription, PrescriptionDraft, Record, RecordDraft,
};
pub use self::role::{Role, RoleParseError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, FULL_NAME_MAX, FullName, NewUserAccount, PASSWORD_MAX, PASSWORD_MIN, Password,
    PasswordDigest, PhoneNumber, ProfileUpdate, SignupProfile, StoredUser, UniqueUserField,
    UserAccount, UserAccountParts, UserChanges, UserValidationError,
};
pub use self::user_account_service::UserAccountService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use clinic_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
