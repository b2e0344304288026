//! Entity kinds and the reference graph between them.
//!
//! Every foreign key in the schema is listed once in [`ReferenceField`]. The
//! create-time existence checks and the delete-time reference census are
//! both derived from that single table, so adding a relation means adding a
//! variant here and nowhere else in the domain.

use std::fmt;

use super::{Error, RecordId};

/// The seven kinds of persisted entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Accounts of every role.
    User,
    /// Patient and doctor meetings.
    Appointment,
    /// Medication issued during an appointment.
    Prescription,
    /// Medicine stock.
    Inventory,
    /// Money received from a user.
    Payment,
    /// Laboratory test orders and results.
    LabTest,
    /// Electronic medical records.
    MedicalRecord,
}

impl EntityKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::User,
        Self::Appointment,
        Self::Prescription,
        Self::Inventory,
        Self::Payment,
        Self::LabTest,
        Self::MedicalRecord,
    ];

    /// Human-readable noun used in error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Appointment => "Appointment",
            Self::Prescription => "Prescription",
            Self::Inventory => "Item",
            Self::Payment => "Payment",
            Self::LabTest => "Lab test",
            Self::MedicalRecord => "EMR",
        }
    }

    /// Name of the primary key field on the wire.
    #[must_use]
    pub const fn id_field(self) -> &'static str {
        match self {
            Self::User => "user_id",
            Self::Appointment => "appointment_id",
            Self::Prescription => "prescription_id",
            Self::Inventory => "medicine_id",
            Self::Payment => "payment_id",
            Self::LabTest => "test_id",
            Self::MedicalRecord => "emr_id",
        }
    }

    /// Foreign keys elsewhere in the schema that point at this kind, in the
    /// order the reference census reports them.
    ///
    /// # Examples
    /// ```
    /// use clinic_backend::domain::{EntityKind, ReferenceField};
    ///
    /// assert_eq!(
    ///     EntityKind::Appointment.referenced_by(),
    ///     &[ReferenceField::PrescriptionAppointment]
    /// );
    /// assert!(EntityKind::Inventory.referenced_by().is_empty());
    /// ```
    #[must_use]
    pub const fn referenced_by(self) -> &'static [ReferenceField] {
        match self {
            Self::User => &USER_REFERENCES,
            Self::Appointment => &[ReferenceField::PrescriptionAppointment],
            Self::Prescription
            | Self::Inventory
            | Self::Payment
            | Self::LabTest
            | Self::MedicalRecord => &[],
        }
    }

    /// Whether rows of this kind belong to a patient and are therefore
    /// filtered for patient principals.
    #[must_use]
    pub const fn is_patient_owned(self) -> bool {
        matches!(
            self,
            Self::Appointment | Self::Prescription | Self::LabTest | Self::MedicalRecord
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const USER_REFERENCES: [ReferenceField; 8] = [
    ReferenceField::AppointmentPatient,
    ReferenceField::AppointmentDoctor,
    ReferenceField::PrescriptionPatient,
    ReferenceField::PrescriptionDoctor,
    ReferenceField::PaymentUser,
    ReferenceField::LabTestPatient,
    ReferenceField::MedicalRecordPatient,
    ReferenceField::MedicalRecordDoctor,
];

/// Dependent relations that can block a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Rows in `appointments`.
    Appointments,
    /// Rows in `prescriptions`.
    Prescriptions,
    /// Rows in `payments`.
    Payments,
    /// Rows in `lab_tests`.
    LabTests,
    /// Rows in `emrs`.
    MedicalRecords,
}

impl Relation {
    /// Relation name reported to clients.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Appointments => "appointments",
            Self::Prescriptions => "prescriptions",
            Self::Payments => "payments",
            Self::LabTests => "lab_tests",
            Self::MedicalRecords => "emrs",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every foreign key column in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceField {
    /// `appointments.patient_id`.
    AppointmentPatient,
    /// `appointments.doctor_id`.
    AppointmentDoctor,
    /// `prescriptions.appointment_id`.
    PrescriptionAppointment,
    /// `prescriptions.doctor_id`.
    PrescriptionDoctor,
    /// `prescriptions.patient_id`.
    PrescriptionPatient,
    /// `payments.user_id`.
    PaymentUser,
    /// `lab_tests.patient_id`.
    LabTestPatient,
    /// `emrs.patient_id`.
    MedicalRecordPatient,
    /// `emrs.doctor_id`.
    MedicalRecordDoctor,
}

impl ReferenceField {
    /// Kind holding the foreign key column.
    #[must_use]
    pub const fn owner(self) -> EntityKind {
        match self {
            Self::AppointmentPatient | Self::AppointmentDoctor => EntityKind::Appointment,
            Self::PrescriptionAppointment | Self::PrescriptionDoctor | Self::PrescriptionPatient => {
                EntityKind::Prescription
            }
            Self::PaymentUser => EntityKind::Payment,
            Self::LabTestPatient => EntityKind::LabTest,
            Self::MedicalRecordPatient | Self::MedicalRecordDoctor => EntityKind::MedicalRecord,
        }
    }

    /// Kind the column points at.
    #[must_use]
    pub const fn target(self) -> EntityKind {
        match self {
            Self::PrescriptionAppointment => EntityKind::Appointment,
            _ => EntityKind::User,
        }
    }

    /// Column name, as used on the wire and in error details.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::AppointmentPatient
            | Self::PrescriptionPatient
            | Self::LabTestPatient
            | Self::MedicalRecordPatient => "patient_id",
            Self::AppointmentDoctor | Self::PrescriptionDoctor | Self::MedicalRecordDoctor => {
                "doctor_id"
            }
            Self::PrescriptionAppointment => "appointment_id",
            Self::PaymentUser => "user_id",
        }
    }

    /// Relation a row holding this column belongs to.
    #[must_use]
    pub const fn relation(self) -> Relation {
        match self.owner() {
            EntityKind::Appointment => Relation::Appointments,
            EntityKind::Prescription => Relation::Prescriptions,
            EntityKind::Payment => Relation::Payments,
            EntityKind::LabTest => Relation::LabTests,
            _ => Relation::MedicalRecords,
        }
    }
}

/// A foreign key value carried by a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    /// Column holding the key.
    pub field: ReferenceField,
    /// Referenced primary key.
    pub id: RecordId,
}

impl ForeignKey {
    /// Pair a column with the identifier it holds.
    pub fn new(field: ReferenceField, id: impl Into<RecordId>) -> Self {
        Self {
            field,
            id: id.into(),
        }
    }
}

/// Dependent rows that would be orphaned by deleting a given row, grouped by
/// relation.
///
/// ## Invariants
/// - Entries have non-zero counts.
/// - Each relation appears at most once, in census order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceCensus {
    entries: Vec<(Relation, u64)>,
}

impl ReferenceCensus {
    /// Aggregate per-column counts into per-relation totals.
    ///
    /// # Examples
    /// ```
    /// use clinic_backend::domain::{ReferenceCensus, ReferenceField, Relation};
    ///
    /// let census = ReferenceCensus::from_counts([
    ///     (ReferenceField::AppointmentPatient, 1),
    ///     (ReferenceField::AppointmentDoctor, 2),
    ///     (ReferenceField::PaymentUser, 0),
    /// ]);
    /// assert_eq!(census.count(Relation::Appointments), 3);
    /// assert_eq!(census.relations(), vec![Relation::Appointments]);
    /// ```
    pub fn from_counts(counts: impl IntoIterator<Item = (ReferenceField, u64)>) -> Self {
        let mut entries: Vec<(Relation, u64)> = Vec::new();
        for (field, count) in counts {
            if count == 0 {
                continue;
            }
            let relation = field.relation();
            match entries.iter_mut().find(|(existing, _)| *existing == relation) {
                Some((_, total)) => *total += count,
                None => entries.push((relation, count)),
            }
        }
        Self { entries }
    }

    /// True when nothing references the row.
    pub fn is_clear(&self) -> bool {
        self.entries.is_empty()
    }

    /// Blocking relations in census order.
    pub fn relations(&self) -> Vec<Relation> {
        self.entries.iter().map(|(relation, _)| *relation).collect()
    }

    /// `ReferencedConflict` error blocking a delete of a `kind` row.
    ///
    /// The message names the first blocking relation; details list them all.
    pub fn conflict_for(&self, kind: EntityKind) -> Error {
        let relations: Vec<&str> = self
            .entries
            .iter()
            .map(|(relation, _)| relation.as_str())
            .collect();
        Error::referenced_conflict(kind.label(), &relations)
    }

    /// Number of referencing rows in `relation`.
    pub fn count(&self, relation: Relation) -> u64 {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == relation)
            .map_or(0, |(_, count)| *count)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the reference graph.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn every_reference_field_is_listed_under_its_target() {
        let all = [
            ReferenceField::AppointmentPatient,
            ReferenceField::AppointmentDoctor,
            ReferenceField::PrescriptionAppointment,
            ReferenceField::PrescriptionDoctor,
            ReferenceField::PrescriptionPatient,
            ReferenceField::PaymentUser,
            ReferenceField::LabTestPatient,
            ReferenceField::MedicalRecordPatient,
            ReferenceField::MedicalRecordDoctor,
        ];
        for field in all {
            assert!(
                field.target().referenced_by().contains(&field),
                "{field:?} missing from {:?}",
                field.target()
            );
        }
        let listed: usize = EntityKind::ALL
            .iter()
            .map(|kind| kind.referenced_by().len())
            .sum();
        assert_eq!(listed, all.len());
    }

    #[rstest]
    fn user_census_order_matches_relation_priority() {
        let relations: Vec<Relation> = EntityKind::User
            .referenced_by()
            .iter()
            .map(|field| field.relation())
            .fold(Vec::new(), |mut acc, relation| {
                if !acc.contains(&relation) {
                    acc.push(relation);
                }
                acc
            });
        assert_eq!(
            relations,
            vec![
                Relation::Appointments,
                Relation::Prescriptions,
                Relation::Payments,
                Relation::LabTests,
                Relation::MedicalRecords,
            ]
        );
    }

    #[rstest]
    #[case(ReferenceField::AppointmentDoctor, "doctor_id", EntityKind::Appointment)]
    #[case(ReferenceField::PrescriptionAppointment, "appointment_id", EntityKind::Prescription)]
    #[case(ReferenceField::PaymentUser, "user_id", EntityKind::Payment)]
    #[case(ReferenceField::MedicalRecordPatient, "patient_id", EntityKind::MedicalRecord)]
    fn columns_and_owners(
        #[case] field: ReferenceField,
        #[case] column: &str,
        #[case] owner: EntityKind,
    ) {
        assert_eq!(field.column(), column);
        assert_eq!(field.owner(), owner);
    }

    #[rstest]
    fn conflicts_name_the_first_relation() {
        let census = ReferenceCensus::from_counts([
            (ReferenceField::AppointmentDoctor, 1),
            (ReferenceField::PaymentUser, 2),
        ]);
        let err = census.conflict_for(EntityKind::User);
        assert_eq!(err.message(), "User is referenced in appointments");
        assert_eq!(
            err.details(),
            Some(&serde_json::json!({ "relations": ["appointments", "payments"] }))
        );
    }

    #[rstest]
    fn empty_census_is_clear() {
        let census = ReferenceCensus::from_counts([(ReferenceField::PaymentUser, 0)]);
        assert!(census.is_clear());
        assert!(census.relations().is_empty());
    }

    #[rstest]
    fn census_keeps_first_seen_order() {
        let census = ReferenceCensus::from_counts([
            (ReferenceField::PaymentUser, 1),
            (ReferenceField::MedicalRecordDoctor, 2),
            (ReferenceField::MedicalRecordPatient, 1),
        ]);
        assert_eq!(
            census.relations(),
            vec![Relation::Payments, Relation::MedicalRecords]
        );
        assert_eq!(census.count(Relation::MedicalRecords), 3);
        assert_eq!(census.count(Relation::LabTests), 0);
    }
}
