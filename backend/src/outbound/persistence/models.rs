//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Each record kind has a read row and a
//! write row; the write row doubles as the update changeset so that clearing
//! an optional text field on update writes `NULL`.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use tracing::warn;

use super::schema::{appointments, emrs, inventory, lab_tests, payments, prescriptions, users};
use crate::domain::{
    Appointment, AppointmentDraft, AppointmentStatus, Email, FullName, InventoryDraft,
    InventoryItem, LabTest, LabTestDraft, MedicalRecord, MedicalRecordDraft, NewUserAccount,
    PasswordDigest, Payment, PaymentDraft, PaymentStatus, PhoneNumber, Prescription,
    PrescriptionDraft, RecordId, Role, StoredUser, UserAccount, UserAccountParts, UserChanges,
    UserId,
};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub role: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    /// Rebuild the domain user, failing when a stored value no longer
    /// satisfies domain validation.
    pub(crate) fn into_stored(self) -> Result<StoredUser, String> {
        let role = Role::from_str(&self.role).map_err(|err| err.to_string())?;
        let account = UserAccount::new(UserAccountParts {
            id: UserId::new(self.user_id),
            full_name: FullName::new(&self.full_name).map_err(|err| err.to_string())?,
            email: Email::new(&self.email).map_err(|err| err.to_string())?,
            phone_number: PhoneNumber::new(&self.phone_number).map_err(|err| err.to_string())?,
            role,
            created_at: self.created_at,
        });
        Ok(StoredUser {
            account,
            password_hash: PasswordDigest::new(self.password_hash),
        })
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
    pub role: &'a str,
    pub password_hash: &'a str,
}

impl<'a> From<&'a NewUserAccount> for NewUserRow<'a> {
    fn from(user: &'a NewUserAccount) -> Self {
        Self {
            full_name: user.full_name.as_ref(),
            email: user.email.as_ref(),
            phone_number: user.phone_number.as_ref(),
            role: user.role.as_str(),
            password_hash: user.password_hash.as_str(),
        }
    }
}

/// Partial update of a user row; `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub full_name: Option<&'a str>,
    pub phone_number: Option<&'a str>,
    pub password_hash: Option<&'a str>,
}

impl<'a> From<&'a UserChanges> for UserChangeset<'a> {
    fn from(changes: &'a UserChanges) -> Self {
        Self {
            full_name: changes.full_name.as_ref().map(AsRef::as_ref),
            phone_number: changes.phone_number.as_ref().map(AsRef::as_ref),
            password_hash: changes.password_hash.as_ref().map(PasswordDigest::as_str),
        }
    }
}

// ---------------------------------------------------------------------------
// Status columns
// ---------------------------------------------------------------------------

fn appointment_status(value: &str, id: i64) -> AppointmentStatus {
    AppointmentStatus::parse(value).unwrap_or_else(|| {
        warn!(
            value,
            appointment_id = id,
            "unrecognised appointment status, defaulting to Pending"
        );
        AppointmentStatus::Pending
    })
}

fn payment_status(value: &str, id: i64) -> PaymentStatus {
    PaymentStatus::parse(value).unwrap_or_else(|| {
        warn!(
            value,
            payment_id = id,
            "unrecognised payment status, defaulting to Pending"
        );
        PaymentStatus::Pending
    })
}

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = appointments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AppointmentRow {
    pub appointment_id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_date: DateTime<Utc>,
    pub status: String,
}

impl From<AppointmentRow> for Appointment {
    fn from(row: AppointmentRow) -> Self {
        Self {
            appointment_id: RecordId::new(row.appointment_id),
            patient_id: UserId::new(row.patient_id),
            doctor_id: UserId::new(row.doctor_id),
            appointment_date: row.appointment_date,
            status: appointment_status(&row.status, row.appointment_id),
        }
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = appointments)]
pub(crate) struct AppointmentWrite {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_date: DateTime<Utc>,
    pub status: &'static str,
}

impl From<&AppointmentDraft> for AppointmentWrite {
    fn from(draft: &AppointmentDraft) -> Self {
        Self {
            patient_id: draft.patient_id.get(),
            doctor_id: draft.doctor_id.get(),
            appointment_date: draft.appointment_date,
            status: draft.status.as_str(),
        }
    }
}

// ---------------------------------------------------------------------------
// Prescriptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = prescriptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PrescriptionRow {
    pub prescription_id: i64,
    pub appointment_id: i64,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub prescribed_on: NaiveDate,
    pub notes: Option<String>,
}

impl From<PrescriptionRow> for Prescription {
    fn from(row: PrescriptionRow) -> Self {
        Self {
            prescription_id: RecordId::new(row.prescription_id),
            appointment_id: RecordId::new(row.appointment_id),
            doctor_id: UserId::new(row.doctor_id),
            patient_id: UserId::new(row.patient_id),
            prescribed_on: row.prescribed_on,
            notes: row.notes,
        }
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = prescriptions, treat_none_as_null = true)]
pub(crate) struct PrescriptionWrite<'a> {
    pub appointment_id: i64,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub prescribed_on: NaiveDate,
    pub notes: Option<&'a str>,
}

impl<'a> From<&'a PrescriptionDraft> for PrescriptionWrite<'a> {
    fn from(draft: &'a PrescriptionDraft) -> Self {
        Self {
            appointment_id: draft.appointment_id.get(),
            doctor_id: draft.doctor_id.get(),
            patient_id: draft.patient_id.get(),
            prescribed_on: draft.prescribed_on,
            notes: draft.notes.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = inventory)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InventoryRow {
    pub medicine_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_price_cents: i64,
}

impl From<InventoryRow> for InventoryItem {
    fn from(row: InventoryRow) -> Self {
        Self {
            medicine_id: RecordId::new(row.medicine_id),
            name: row.name,
            description: row.description,
            quantity: row.quantity,
            unit_price_cents: row.unit_price_cents,
        }
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = inventory, treat_none_as_null = true)]
pub(crate) struct InventoryWrite<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub quantity: i32,
    pub unit_price_cents: i64,
}

impl<'a> From<&'a InventoryDraft> for InventoryWrite<'a> {
    fn from(draft: &'a InventoryDraft) -> Self {
        Self {
            name: &draft.name,
            description: draft.description.as_deref(),
            quantity: draft.quantity,
            unit_price_cents: draft.unit_price_cents,
        }
    }
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PaymentRow {
    pub payment_id: i64,
    pub user_id: i64,
    pub amount_cents: i64,
    pub payment_date: DateTime<Utc>,
    pub method: String,
    pub status: String,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Self {
            payment_id: RecordId::new(row.payment_id),
            user_id: UserId::new(row.user_id),
            amount_cents: row.amount_cents,
            payment_date: row.payment_date,
            method: row.method,
            status: payment_status(&row.status, row.payment_id),
        }
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = payments)]
pub(crate) struct PaymentWrite<'a> {
    pub user_id: i64,
    pub amount_cents: i64,
    pub payment_date: DateTime<Utc>,
    pub method: &'a str,
    pub status: &'static str,
}

impl<'a> From<&'a PaymentDraft> for PaymentWrite<'a> {
    fn from(draft: &'a PaymentDraft) -> Self {
        Self {
            user_id: draft.user_id.get(),
            amount_cents: draft.amount_cents,
            payment_date: draft.payment_date,
            method: &draft.method,
            status: draft.status.as_str(),
        }
    }
}

// ---------------------------------------------------------------------------
// Lab tests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = lab_tests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LabTestRow {
    pub test_id: i64,
    pub patient_id: i64,
    pub test_name: String,
    pub result: Option<String>,
    pub test_date: NaiveDate,
}

impl From<LabTestRow> for LabTest {
    fn from(row: LabTestRow) -> Self {
        Self {
            test_id: RecordId::new(row.test_id),
            patient_id: UserId::new(row.patient_id),
            test_name: row.test_name,
            result: row.result,
            test_date: row.test_date,
        }
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = lab_tests, treat_none_as_null = true)]
pub(crate) struct LabTestWrite<'a> {
    pub patient_id: i64,
    pub test_name: &'a str,
    pub result: Option<&'a str>,
    pub test_date: NaiveDate,
}

impl<'a> From<&'a LabTestDraft> for LabTestWrite<'a> {
    fn from(draft: &'a LabTestDraft) -> Self {
        Self {
            patient_id: draft.patient_id.get(),
            test_name: &draft.test_name,
            result: draft.result.as_deref(),
            test_date: draft.test_date,
        }
    }
}

// ---------------------------------------------------------------------------
// Medical records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = emrs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MedicalRecordRow {
    pub emr_id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<MedicalRecordRow> for MedicalRecord {
    fn from(row: MedicalRecordRow) -> Self {
        Self {
            emr_id: RecordId::new(row.emr_id),
            patient_id: UserId::new(row.patient_id),
            doctor_id: UserId::new(row.doctor_id),
            summary: row.summary,
            created_at: row.created_at,
        }
    }
}

/// `created_at` is omitted: the column default stamps inserts and updates
/// leave it alone.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = emrs, treat_none_as_null = true)]
pub(crate) struct MedicalRecordWrite<'a> {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub summary: Option<&'a str>,
}

impl<'a> From<&'a MedicalRecordDraft> for MedicalRecordWrite<'a> {
    fn from(draft: &'a MedicalRecordDraft) -> Self {
        Self {
            patient_id: draft.patient_id.get(),
            doctor_id: draft.doctor_id.get(),
            summary: draft.summary.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Conversion coverage for row structs.
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn user_row(role: &str) -> UserRow {
        UserRow {
            user_id: 3,
            full_name: "Grace Hopper".to_owned(),
            email: "grace@clinic.test".to_owned(),
            phone_number: "+1 555 0100".to_owned(),
            role: role.to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            created_at: stamp(),
        }
    }

    #[rstest]
    fn user_rows_rebuild_domain_accounts() {
        let stored = user_row("Doctor").into_stored().expect("valid row");
        assert_eq!(stored.account.id(), UserId::new(3));
        assert_eq!(stored.account.role(), Role::Doctor);
        assert_eq!(stored.password_hash.as_str(), "$argon2id$stub");
    }

    #[rstest]
    fn unknown_roles_are_rejected() {
        assert!(user_row("Nurse").into_stored().is_err());
    }

    #[rstest]
    #[case("Confirmed", AppointmentStatus::Confirmed)]
    #[case("bogus", AppointmentStatus::Pending)]
    fn appointment_status_falls_back_to_pending(
        #[case] stored: &str,
        #[case] expected: AppointmentStatus,
    ) {
        let appointment = Appointment::from(AppointmentRow {
            appointment_id: 1,
            patient_id: 2,
            doctor_id: 3,
            appointment_date: stamp(),
            status: stored.to_owned(),
        });
        assert_eq!(appointment.status, expected);
    }

    #[rstest]
    fn user_changesets_skip_absent_fields() {
        let changes = UserChanges {
            full_name: None,
            phone_number: Some(PhoneNumber::new("+1 555 0199").expect("valid phone")),
            password_hash: None,
        };
        let changeset = UserChangeset::from(&changes);
        assert_eq!(changeset.full_name, None);
        assert_eq!(changeset.phone_number, Some("+1 555 0199"));
    }
}
