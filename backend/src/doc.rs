//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every account, record, and health endpoint
//! - **Schemas**: schema mirrors of domain types from
//!   [`crate::inbound::http::schemas`] plus the request and response bodies
//!   owned by the handlers
//! - **Security**: the bearer token scheme issued by `POST /api/v1/login`
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::records::{
    appointments, emrs, inventory, lab_tests, payments, prescriptions,
};
use crate::inbound::http::schemas::{
    AppointmentDraftSchema, AppointmentSchema, AppointmentStatusSchema, ErrorCodeSchema,
    ErrorSchema, InventoryDraftSchema, InventoryItemSchema, LabTestDraftSchema, LabTestSchema,
    MedicalRecordDraftSchema, MedicalRecordSchema, PaymentDraftSchema, PaymentSchema,
    PaymentStatusSchema, PrescriptionDraftSchema, PrescriptionSchema, RoleSchema,
    UserAccountSchema,
};
use crate::inbound::http::users::{
    LoginRequest, PasswordResetRequest, SignupRequest, TokenResponse, UpdateUserRequest,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name under which the bearer scheme is registered.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token issued by POST /api/v1/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Clinic backend API",
        description = "Role-gated access to accounts and clinical records."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::signup,
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::reset_password,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        appointments::create, appointments::list, appointments::get,
        appointments::update, appointments::delete,
        prescriptions::create, prescriptions::list, prescriptions::get,
        prescriptions::update, prescriptions::delete,
        inventory::create, inventory::list, inventory::get,
        inventory::update, inventory::delete,
        payments::create, payments::list, payments::get,
        payments::update, payments::delete,
        lab_tests::create, lab_tests::list, lab_tests::get,
        lab_tests::update, lab_tests::delete,
        emrs::create, emrs::list, emrs::get,
        emrs::update, emrs::delete,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema, ErrorCodeSchema, RoleSchema, UserAccountSchema,
        SignupRequest, LoginRequest, TokenResponse, PasswordResetRequest, UpdateUserRequest,
        AppointmentStatusSchema, PaymentStatusSchema,
        AppointmentDraftSchema, AppointmentSchema,
        PrescriptionDraftSchema, PrescriptionSchema,
        InventoryDraftSchema, InventoryItemSchema,
        PaymentDraftSchema, PaymentSchema,
        LabTestDraftSchema, LabTestSchema,
        MedicalRecordDraftSchema, MedicalRecordSchema,
    )),
    tags(
        (name = "auth", description = "Signup, login, and credential management"),
        (name = "users", description = "Account administration"),
        (name = "appointments", description = "Appointment booking"),
        (name = "prescriptions", description = "Prescriptions written during appointments"),
        (name = "inventory", description = "Medicine stock"),
        (name = "payments", description = "Payments made by users"),
        (name = "lab-tests", description = "Laboratory tests and results"),
        (name = "emrs", description = "Electronic medical records"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
