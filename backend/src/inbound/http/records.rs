//! Record API handlers.
//!
//! Every record kind exposes the same five operations:
//!
//! ```text
//! POST   /api/v1/{kind}        create (201)
//! GET    /api/v1/{kind}        list; patients only see their own rows
//! GET    /api/v1/{kind}/{id}   fetch one
//! PUT    /api/v1/{kind}/{id}   replace the mutable fields
//! DELETE /api/v1/{kind}/{id}   delete unless still referenced (204)
//! ```
//!
//! The generic handlers below do the work; [`record_endpoints!`] stamps out
//! one documented module per kind so each gets its own OpenAPI entries.

use actix_web::{HttpResponse, web};

use crate::domain::{Entity, Record, RecordId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::state::HttpState;

async fn create_record<E: Entity>(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<E::Draft>,
) -> ApiResult<HttpResponse> {
    let record = state
        .records
        .create(auth.principal(), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(record))
}

async fn list_records<E: Entity>(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<Vec<Record>>> {
    let records = state.records.list(auth.principal(), E::KIND).await?;
    Ok(web::Json(records))
}

async fn get_record<E: Entity>(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<RecordId>,
) -> ApiResult<web::Json<Record>> {
    let record = state
        .records
        .get(auth.principal(), E::KIND, path.into_inner())
        .await?;
    Ok(web::Json(record))
}

async fn update_record<E: Entity>(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<RecordId>,
    payload: web::Json<E::Draft>,
) -> ApiResult<web::Json<Record>> {
    let record = state
        .records
        .update(auth.principal(), path.into_inner(), payload.into_inner().into())
        .await?;
    Ok(web::Json(record))
}

async fn delete_record<E: Entity>(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<RecordId>,
) -> ApiResult<HttpResponse> {
    state
        .records
        .delete(auth.principal(), E::KIND, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

macro_rules! record_endpoints {
    (
        $module:ident => $entity:ident,
        draft = $draft_schema:ident,
        record = $record_schema:ident,
        tag = $tag:tt,
        collection = $collection:tt,
        item = $item:tt,
        relative = $relative:tt $(,)?
    ) => {
        #[doc = concat!("Endpoints under `", $collection, "`.")]
        pub mod $module {
            use actix_web::{HttpResponse, web};

            use crate::domain::{$entity, Entity, Record, RecordId};
            use crate::inbound::http::ApiResult;
            use crate::inbound::http::auth::Authenticated;
            use crate::inbound::http::schemas::{$draft_schema, $record_schema, ErrorSchema};
            use crate::inbound::http::state::HttpState;

            type Draft = <$entity as Entity>::Draft;

            #[doc = concat!("Create a row under `", $collection, "`.")]
            #[utoipa::path(
                post,
                path = $collection,
                request_body = $draft_schema,
                responses(
                    (status = 201, description = "Created", body = $record_schema),
                    (status = 400, description = "Invalid request or reference", body = ErrorSchema),
                    (status = 401, description = "Unauthorised", body = ErrorSchema),
                    (status = 403, description = "Forbidden", body = ErrorSchema)
                ),
                tags = [$tag],
                operation_id = concat!("create_", stringify!($module))
            )]
            pub async fn create(
                state: web::Data<HttpState>,
                auth: Authenticated,
                payload: web::Json<Draft>,
            ) -> ApiResult<HttpResponse> {
                super::create_record::<$entity>(state, auth, payload).await
            }

            #[doc = concat!("List rows under `", $collection, "`.")]
            #[utoipa::path(
                get,
                path = $collection,
                responses(
                    (status = 200, description = "Visible rows", body = [$record_schema]),
                    (status = 401, description = "Unauthorised", body = ErrorSchema),
                    (status = 403, description = "Forbidden", body = ErrorSchema)
                ),
                tags = [$tag],
                operation_id = concat!("list_", stringify!($module))
            )]
            pub async fn list(
                state: web::Data<HttpState>,
                auth: Authenticated,
            ) -> ApiResult<web::Json<Vec<Record>>> {
                super::list_records::<$entity>(state, auth).await
            }

            #[doc = concat!("Fetch one row under `", $collection, "`.")]
            #[utoipa::path(
                get,
                path = $item,
                params(("id" = i64, Path, description = "Row identifier")),
                responses(
                    (status = 200, description = "Row", body = $record_schema),
                    (status = 401, description = "Unauthorised", body = ErrorSchema),
                    (status = 403, description = "Forbidden", body = ErrorSchema),
                    (status = 404, description = "Not found", body = ErrorSchema)
                ),
                tags = [$tag],
                operation_id = concat!("get_", stringify!($module))
            )]
            pub async fn get(
                state: web::Data<HttpState>,
                auth: Authenticated,
                path: web::Path<RecordId>,
            ) -> ApiResult<web::Json<Record>> {
                super::get_record::<$entity>(state, auth, path).await
            }

            #[doc = concat!("Replace one row under `", $collection, "`.")]
            #[utoipa::path(
                put,
                path = $item,
                params(("id" = i64, Path, description = "Row identifier")),
                request_body = $draft_schema,
                responses(
                    (status = 200, description = "Updated row", body = $record_schema),
                    (status = 400, description = "Invalid request or reference", body = ErrorSchema),
                    (status = 401, description = "Unauthorised", body = ErrorSchema),
                    (status = 403, description = "Forbidden", body = ErrorSchema),
                    (status = 404, description = "Not found", body = ErrorSchema)
                ),
                tags = [$tag],
                operation_id = concat!("update_", stringify!($module))
            )]
            pub async fn update(
                state: web::Data<HttpState>,
                auth: Authenticated,
                path: web::Path<RecordId>,
                payload: web::Json<Draft>,
            ) -> ApiResult<web::Json<Record>> {
                super::update_record::<$entity>(state, auth, path, payload).await
            }

            #[doc = concat!("Delete one row under `", $collection, "`.")]
            #[utoipa::path(
                delete,
                path = $item,
                params(("id" = i64, Path, description = "Row identifier")),
                responses(
                    (status = 204, description = "Deleted"),
                    (status = 401, description = "Unauthorised", body = ErrorSchema),
                    (status = 403, description = "Forbidden", body = ErrorSchema),
                    (status = 404, description = "Not found", body = ErrorSchema),
                    (status = 409, description = "Still referenced", body = ErrorSchema)
                ),
                tags = [$tag],
                operation_id = concat!("delete_", stringify!($module))
            )]
            pub async fn delete(
                state: web::Data<HttpState>,
                auth: Authenticated,
                path: web::Path<RecordId>,
            ) -> ApiResult<HttpResponse> {
                super::delete_record::<$entity>(state, auth, path).await
            }

            /// Register the five routes, relative to the API scope.
            pub fn configure(cfg: &mut web::ServiceConfig) {
                cfg.service(
                    web::resource($relative)
                        .route(web::post().to(create))
                        .route(web::get().to(list)),
                )
                .service(
                    web::resource(concat!($relative, "/{id}"))
                        .route(web::get().to(get))
                        .route(web::put().to(update))
                        .route(web::delete().to(delete)),
                );
            }
        }
    };
}

record_endpoints!(
    appointments => Appointment,
    draft = AppointmentDraftSchema,
    record = AppointmentSchema,
    tag = "appointments",
    collection = "/api/v1/appointments",
    item = "/api/v1/appointments/{id}",
    relative = "/appointments",
);

record_endpoints!(
    prescriptions => Prescription,
    draft = PrescriptionDraftSchema,
    record = PrescriptionSchema,
    tag = "prescriptions",
    collection = "/api/v1/prescriptions",
    item = "/api/v1/prescriptions/{id}",
    relative = "/prescriptions",
);

record_endpoints!(
    inventory => InventoryItem,
    draft = InventoryDraftSchema,
    record = InventoryItemSchema,
    tag = "inventory",
    collection = "/api/v1/inventory",
    item = "/api/v1/inventory/{id}",
    relative = "/inventory",
);

record_endpoints!(
    payments => Payment,
    draft = PaymentDraftSchema,
    record = PaymentSchema,
    tag = "payments",
    collection = "/api/v1/payments",
    item = "/api/v1/payments/{id}",
    relative = "/payments",
);

record_endpoints!(
    lab_tests => LabTest,
    draft = LabTestDraftSchema,
    record = LabTestSchema,
    tag = "lab-tests",
    collection = "/api/v1/lab-tests",
    item = "/api/v1/lab-tests/{id}",
    relative = "/lab-tests",
);

record_endpoints!(
    emrs => MedicalRecord,
    draft = MedicalRecordDraftSchema,
    record = MedicalRecordSchema,
    tag = "emrs",
    collection = "/api/v1/emrs",
    item = "/api/v1/emrs/{id}",
    relative = "/emrs",
);

/// Register every record surface, relative to the API scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(appointments::configure)
        .configure(prescriptions::configure)
        .configure(inventory::configure)
        .configure(payments::configure)
        .configure(lab_tests::configure)
        .configure(emrs::configure);
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
