//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the structure of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

#![expect(
    dead_code,
    reason = "Schema mirrors are only read by OpenAPI generation"
)]

use chrono::{DateTime, NaiveDate, Utc};
use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A foreign key names a row that does not exist.
    #[schema(rename = "invalid_reference")]
    InvalidReference,
    /// The target row is still referenced by dependent rows.
    #[schema(rename = "referenced_conflict")]
    ReferencedConflict,
    /// A unique column already holds the submitted value.
    #[schema(rename = "conflict")]
    Conflict,
    /// A downstream dependency is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = Error)]
#[schema(rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_reference")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Invalid doctor_id")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details: `field` for reference and validation
    /// failures, `relations` for blocked deletes.
    details: Option<serde_json::Value>,
}

/// User role.
#[derive(ToSchema)]
#[schema(as = Role)]
pub enum RoleSchema {
    /// Sees only their own clinical rows.
    Patient,
    /// Authors clinical rows.
    Doctor,
    /// Manages accounts, stock, and payments.
    Admin,
}

/// OpenAPI schema for [`crate::domain::UserAccount`].
#[derive(ToSchema)]
#[schema(as = UserAccount)]
pub struct UserAccountSchema {
    /// Stable user identifier.
    #[schema(example = 1)]
    user_id: i64,
    /// Display name.
    #[schema(example = "Alice Liddell")]
    full_name: String,
    /// Lower-cased login address.
    #[schema(example = "alice@x.com")]
    email: String,
    /// Contact number.
    #[schema(example = "+44 7700 900001")]
    phone_number: String,
    /// Role fixed at signup.
    role: RoleSchema,
    /// Creation timestamp.
    created_at: DateTime<Utc>,
}

/// Appointment lifecycle state.
#[derive(ToSchema)]
#[schema(as = AppointmentStatus)]
pub enum AppointmentStatusSchema {
    /// Awaiting confirmation.
    Pending,
    /// Accepted by the clinic.
    Confirmed,
    /// Called off.
    Cancelled,
}

/// Payment settlement state.
#[derive(ToSchema)]
#[schema(as = PaymentStatus)]
pub enum PaymentStatusSchema {
    /// Not yet settled.
    Pending,
    /// Settled.
    Completed,
    /// Declined or reversed.
    Failed,
}

/// OpenAPI schema for [`crate::domain::AppointmentDraft`].
#[derive(ToSchema)]
#[schema(as = AppointmentDraft)]
pub struct AppointmentDraftSchema {
    /// Patient the appointment is for.
    patient_id: i64,
    /// Responsible doctor.
    doctor_id: i64,
    /// Scheduled start.
    appointment_date: DateTime<Utc>,
    /// Defaults to `Pending`.
    status: Option<AppointmentStatusSchema>,
}

/// OpenAPI schema for [`crate::domain::Appointment`].
#[derive(ToSchema)]
#[schema(as = Appointment)]
pub struct AppointmentSchema {
    appointment_id: i64,
    patient_id: i64,
    doctor_id: i64,
    appointment_date: DateTime<Utc>,
    status: AppointmentStatusSchema,
}

/// OpenAPI schema for [`crate::domain::PrescriptionDraft`].
#[derive(ToSchema)]
#[schema(as = PrescriptionDraft)]
pub struct PrescriptionDraftSchema {
    /// Appointment the prescription was written in.
    appointment_id: i64,
    doctor_id: i64,
    patient_id: i64,
    prescribed_on: NaiveDate,
    /// Free text; markup is stripped.
    notes: Option<String>,
}

/// OpenAPI schema for [`crate::domain::Prescription`].
#[derive(ToSchema)]
#[schema(as = Prescription)]
pub struct PrescriptionSchema {
    prescription_id: i64,
    appointment_id: i64,
    doctor_id: i64,
    patient_id: i64,
    prescribed_on: NaiveDate,
    notes: Option<String>,
}

/// OpenAPI schema for [`crate::domain::InventoryDraft`].
#[derive(ToSchema)]
#[schema(as = InventoryDraft)]
pub struct InventoryDraftSchema {
    name: String,
    /// Free text; markup is stripped.
    description: Option<String>,
    #[schema(minimum = 0)]
    quantity: i32,
    /// Minor currency units.
    #[schema(minimum = 0)]
    unit_price_cents: i64,
}

/// OpenAPI schema for [`crate::domain::InventoryItem`].
#[derive(ToSchema)]
#[schema(as = InventoryItem)]
pub struct InventoryItemSchema {
    medicine_id: i64,
    name: String,
    description: Option<String>,
    quantity: i32,
    unit_price_cents: i64,
}

/// OpenAPI schema for [`crate::domain::PaymentDraft`].
#[derive(ToSchema)]
#[schema(as = PaymentDraft)]
pub struct PaymentDraftSchema {
    /// Paying user.
    user_id: i64,
    /// Minor currency units; must be positive.
    #[schema(minimum = 1)]
    amount_cents: i64,
    payment_date: DateTime<Utc>,
    #[schema(example = "card")]
    method: String,
    /// Defaults to `Pending`.
    status: Option<PaymentStatusSchema>,
}

/// OpenAPI schema for [`crate::domain::Payment`].
#[derive(ToSchema)]
#[schema(as = Payment)]
pub struct PaymentSchema {
    payment_id: i64,
    user_id: i64,
    amount_cents: i64,
    payment_date: DateTime<Utc>,
    method: String,
    status: PaymentStatusSchema,
}

/// OpenAPI schema for [`crate::domain::LabTestDraft`].
#[derive(ToSchema)]
#[schema(as = LabTestDraft)]
pub struct LabTestDraftSchema {
    patient_id: i64,
    test_name: String,
    /// Free text; markup is stripped.
    result: Option<String>,
    test_date: NaiveDate,
}

/// OpenAPI schema for [`crate::domain::LabTest`].
#[derive(ToSchema)]
#[schema(as = LabTest)]
pub struct LabTestSchema {
    test_id: i64,
    patient_id: i64,
    test_name: String,
    result: Option<String>,
    test_date: NaiveDate,
}

/// OpenAPI schema for [`crate::domain::MedicalRecordDraft`].
#[derive(ToSchema)]
#[schema(as = MedicalRecordDraft)]
pub struct MedicalRecordDraftSchema {
    patient_id: i64,
    doctor_id: i64,
    /// Free text; markup is stripped.
    summary: Option<String>,
}

/// OpenAPI schema for [`crate::domain::MedicalRecord`].
#[derive(ToSchema)]
#[schema(as = MedicalRecord)]
pub struct MedicalRecordSchema {
    emr_id: i64,
    patient_id: i64,
    doctor_id: i64,
    summary: Option<String>,
    created_at: DateTime<Utc>,
}
