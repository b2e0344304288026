//! Per-table Diesel queries behind the record store.
//!
//! Each helper dispatches on [`EntityKind`], [`ReferenceField`], or
//! [`RecordDraft`] to the concrete table. They run on a connection the
//! caller already holds inside a transaction; none of them opens one.

use diesel::prelude::*;
use diesel::result::QueryResult;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use super::models::{
    AppointmentRow, AppointmentWrite, InventoryRow, InventoryWrite, LabTestRow, LabTestWrite,
    MedicalRecordRow, MedicalRecordWrite, PaymentRow, PaymentWrite, PrescriptionRow,
    PrescriptionWrite,
};
use super::schema::{appointments, emrs, inventory, lab_tests, payments, prescriptions, users};
use crate::domain::{
    Appointment, EntityKind, InventoryItem, LabTest, MedicalRecord, Payment, Prescription,
    ReadScope, Record, RecordDraft, RecordId, ReferenceField,
};

/// Row lock taken while probing for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowLock {
    /// `FOR KEY SHARE`: blocks deletes of the row, not other readers.
    KeyShare,
    /// `FOR UPDATE`: exclusive against every other lock on the row.
    Update,
}

macro_rules! probe {
    ($conn:expr, $lock:expr, $table:ident, $pk:ident, $id:expr) => {{
        let query = $table::table.find($id).select($table::$pk);
        let found: Option<i64> = match $lock {
            RowLock::KeyShare => query.for_key_share().first($conn).await.optional()?,
            RowLock::Update => query.for_update().first($conn).await.optional()?,
        };
        Ok(found.is_some())
    }};
}

/// Whether a row of `kind` with key `id` exists, locking it if so.
pub(crate) async fn lock_row(
    conn: &mut AsyncPgConnection,
    kind: EntityKind,
    id: RecordId,
    lock: RowLock,
) -> QueryResult<bool> {
    let key = id.get();
    match kind {
        EntityKind::User => probe!(conn, lock, users, user_id, key),
        EntityKind::Appointment => probe!(conn, lock, appointments, appointment_id, key),
        EntityKind::Prescription => probe!(conn, lock, prescriptions, prescription_id, key),
        EntityKind::Inventory => probe!(conn, lock, inventory, medicine_id, key),
        EntityKind::Payment => probe!(conn, lock, payments, payment_id, key),
        EntityKind::LabTest => probe!(conn, lock, lab_tests, test_id, key),
        EntityKind::MedicalRecord => probe!(conn, lock, emrs, emr_id, key),
    }
}

/// First foreign key of `draft`, in column order, that names no row.
///
/// Every key that does resolve is left key-share locked until the
/// surrounding transaction ends.
pub(crate) async fn first_unresolved(
    conn: &mut AsyncPgConnection,
    draft: &RecordDraft,
) -> QueryResult<Option<ReferenceField>> {
    for key in draft.foreign_keys() {
        if !lock_row(conn, key.field.target(), key.id, RowLock::KeyShare).await? {
            return Ok(Some(key.field));
        }
    }
    Ok(None)
}

macro_rules! count_where {
    ($conn:expr, $table:ident, $column:ident, $id:expr) => {{
        let count: i64 = $table::table
            .filter($table::$column.eq($id))
            .count()
            .get_result($conn)
            .await?;
        count
    }};
}

/// Rows holding `field = id`.
pub(crate) async fn count_references(
    conn: &mut AsyncPgConnection,
    field: ReferenceField,
    id: RecordId,
) -> QueryResult<u64> {
    let key = id.get();
    let count = match field {
        ReferenceField::AppointmentPatient => count_where!(conn, appointments, patient_id, key),
        ReferenceField::AppointmentDoctor => count_where!(conn, appointments, doctor_id, key),
        ReferenceField::PrescriptionAppointment => {
            count_where!(conn, prescriptions, appointment_id, key)
        }
        ReferenceField::PrescriptionDoctor => count_where!(conn, prescriptions, doctor_id, key),
        ReferenceField::PrescriptionPatient => count_where!(conn, prescriptions, patient_id, key),
        ReferenceField::PaymentUser => count_where!(conn, payments, user_id, key),
        ReferenceField::LabTestPatient => count_where!(conn, lab_tests, patient_id, key),
        ReferenceField::MedicalRecordPatient => count_where!(conn, emrs, patient_id, key),
        ReferenceField::MedicalRecordDoctor => count_where!(conn, emrs, doctor_id, key),
    };
    Ok(u64::try_from(count).unwrap_or(0))
}

macro_rules! find_as {
    ($conn:expr, $table:ident, $row:ident, $record:ident, $id:expr) => {{
        let row: Option<$row> = $table::table
            .find($id)
            .select($row::as_select())
            .first($conn)
            .await
            .optional()?;
        Ok(row.map(|found| Record::from($record::from(found))))
    }};
}

/// Fetch one record row; user rows are not records and always miss.
pub(crate) async fn find_record(
    conn: &mut AsyncPgConnection,
    kind: EntityKind,
    id: RecordId,
) -> QueryResult<Option<Record>> {
    let key = id.get();
    match kind {
        EntityKind::User => Ok(None),
        EntityKind::Appointment => find_as!(conn, appointments, AppointmentRow, Appointment, key),
        EntityKind::Prescription => {
            find_as!(conn, prescriptions, PrescriptionRow, Prescription, key)
        }
        EntityKind::Inventory => find_as!(conn, inventory, InventoryRow, InventoryItem, key),
        EntityKind::Payment => find_as!(conn, payments, PaymentRow, Payment, key),
        EntityKind::LabTest => find_as!(conn, lab_tests, LabTestRow, LabTest, key),
        EntityKind::MedicalRecord => find_as!(conn, emrs, MedicalRecordRow, MedicalRecord, key),
    }
}

macro_rules! list_as {
    ($conn:expr, $table:ident, $pk:ident, $row:ident, $record:ident) => {{
        let rows: Vec<$row> = $table::table
            .select($row::as_select())
            .order_by($table::$pk)
            .load($conn)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| Record::from($record::from(row)))
            .collect())
    }};
    ($conn:expr, $table:ident, $pk:ident, $row:ident, $record:ident, owner = $owner:expr) => {{
        let mut query = $table::table
            .select($row::as_select())
            .order_by($table::$pk)
            .into_boxed();
        if let Some(patient) = $owner {
            query = query.filter($table::patient_id.eq(patient));
        }
        let rows: Vec<$row> = query.load($conn).await?;
        Ok(rows
            .into_iter()
            .map(|row| Record::from($record::from(row)))
            .collect())
    }};
}

/// Every record row of `kind` visible in `scope`, ordered by key.
pub(crate) async fn list_records(
    conn: &mut AsyncPgConnection,
    kind: EntityKind,
    scope: ReadScope,
) -> QueryResult<Vec<Record>> {
    let owner = match scope {
        ReadScope::All => None,
        ReadScope::Patient(patient) => Some(patient.get()),
    };
    if owner.is_some() && !kind.is_patient_owned() {
        return Ok(Vec::new());
    }
    match kind {
        EntityKind::User => Ok(Vec::new()),
        EntityKind::Appointment => list_as!(
            conn,
            appointments,
            appointment_id,
            AppointmentRow,
            Appointment,
            owner = owner
        ),
        EntityKind::Prescription => list_as!(
            conn,
            prescriptions,
            prescription_id,
            PrescriptionRow,
            Prescription,
            owner = owner
        ),
        EntityKind::Inventory => list_as!(conn, inventory, medicine_id, InventoryRow, InventoryItem),
        EntityKind::Payment => list_as!(conn, payments, payment_id, PaymentRow, Payment),
        EntityKind::LabTest => {
            list_as!(conn, lab_tests, test_id, LabTestRow, LabTest, owner = owner)
        }
        EntityKind::MedicalRecord => {
            list_as!(conn, emrs, emr_id, MedicalRecordRow, MedicalRecord, owner = owner)
        }
    }
}

macro_rules! insert_as {
    ($conn:expr, $table:ident, $write:ident, $row:ident, $record:ident, $draft:expr) => {{
        let row: $row = diesel::insert_into($table::table)
            .values($write::from($draft))
            .returning($row::as_returning())
            .get_result($conn)
            .await?;
        Ok(Record::from($record::from(row)))
    }};
}

/// Insert `draft`, returning the stored row.
pub(crate) async fn insert_record(
    conn: &mut AsyncPgConnection,
    draft: &RecordDraft,
) -> QueryResult<Record> {
    match draft {
        RecordDraft::Appointment(fields) => insert_as!(
            conn,
            appointments,
            AppointmentWrite,
            AppointmentRow,
            Appointment,
            fields
        ),
        RecordDraft::Prescription(fields) => insert_as!(
            conn,
            prescriptions,
            PrescriptionWrite,
            PrescriptionRow,
            Prescription,
            fields
        ),
        RecordDraft::Inventory(fields) => insert_as!(
            conn,
            inventory,
            InventoryWrite,
            InventoryRow,
            InventoryItem,
            fields
        ),
        RecordDraft::Payment(fields) => {
            insert_as!(conn, payments, PaymentWrite, PaymentRow, Payment, fields)
        }
        RecordDraft::LabTest(fields) => {
            insert_as!(conn, lab_tests, LabTestWrite, LabTestRow, LabTest, fields)
        }
        RecordDraft::MedicalRecord(fields) => insert_as!(
            conn,
            emrs,
            MedicalRecordWrite,
            MedicalRecordRow,
            MedicalRecord,
            fields
        ),
    }
}

macro_rules! update_as {
    ($conn:expr, $table:ident, $write:ident, $row:ident, $record:ident, $id:expr, $draft:expr) => {{
        let row: Option<$row> = diesel::update($table::table.find($id))
            .set($write::from($draft))
            .returning($row::as_returning())
            .get_result($conn)
            .await
            .optional()?;
        Ok(row.map(|updated| Record::from($record::from(updated))))
    }};
}

/// Replace the mutable columns of row `id` with `draft`.
pub(crate) async fn update_record(
    conn: &mut AsyncPgConnection,
    id: RecordId,
    draft: &RecordDraft,
) -> QueryResult<Option<Record>> {
    let key = id.get();
    match draft {
        RecordDraft::Appointment(fields) => update_as!(
            conn,
            appointments,
            AppointmentWrite,
            AppointmentRow,
            Appointment,
            key,
            fields
        ),
        RecordDraft::Prescription(fields) => update_as!(
            conn,
            prescriptions,
            PrescriptionWrite,
            PrescriptionRow,
            Prescription,
            key,
            fields
        ),
        RecordDraft::Inventory(fields) => update_as!(
            conn,
            inventory,
            InventoryWrite,
            InventoryRow,
            InventoryItem,
            key,
            fields
        ),
        RecordDraft::Payment(fields) => {
            update_as!(conn, payments, PaymentWrite, PaymentRow, Payment, key, fields)
        }
        RecordDraft::LabTest(fields) => {
            update_as!(conn, lab_tests, LabTestWrite, LabTestRow, LabTest, key, fields)
        }
        RecordDraft::MedicalRecord(fields) => update_as!(
            conn,
            emrs,
            MedicalRecordWrite,
            MedicalRecordRow,
            MedicalRecord,
            key,
            fields
        ),
    }
}

/// Delete row `id` of `kind`, returning the number of rows removed.
pub(crate) async fn delete_row(
    conn: &mut AsyncPgConnection,
    kind: EntityKind,
    id: RecordId,
) -> QueryResult<usize> {
    let key = id.get();
    match kind {
        EntityKind::User => diesel::delete(users::table.find(key)).execute(conn).await,
        EntityKind::Appointment => {
            diesel::delete(appointments::table.find(key))
                .execute(conn)
                .await
        }
        EntityKind::Prescription => {
            diesel::delete(prescriptions::table.find(key))
                .execute(conn)
                .await
        }
        EntityKind::Inventory => diesel::delete(inventory::table.find(key)).execute(conn).await,
        EntityKind::Payment => diesel::delete(payments::table.find(key)).execute(conn).await,
        EntityKind::LabTest => diesel::delete(lab_tests::table.find(key)).execute(conn).await,
        EntityKind::MedicalRecord => diesel::delete(emrs::table.find(key)).execute(conn).await,
    }
}
