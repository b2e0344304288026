//! Prescriptions issued during an appointment.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{DraftFields, FieldError, RowFields, sanitize_optional};
use crate::domain::{ForeignKey, RecordId, ReferenceField, UserId};

/// Maximum length of prescription notes.
const NOTES_MAX: usize = 4000;

/// Fields accepted when writing a prescription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescriptionDraft {
    /// Appointment the prescription was written in.
    pub appointment_id: RecordId,
    /// Responsible doctor.
    pub doctor_id: UserId,
    /// Patient the row belongs to.
    pub patient_id: UserId,
    /// Date the prescription was written.
    pub prescribed_on: NaiveDate,
    /// Dosage and instructions; markup is stripped.
    #[serde(default)]
    pub notes: Option<String>,
}

/// A persisted prescription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    /// Primary key.
    pub prescription_id: RecordId,
    /// Appointment the prescription was written in.
    pub appointment_id: RecordId,
    /// Responsible doctor.
    pub doctor_id: UserId,
    /// Patient the row belongs to.
    pub patient_id: UserId,
    /// Date the prescription was written.
    pub prescribed_on: NaiveDate,
    /// Dosage and instructions; markup is stripped.
    pub notes: Option<String>,
}

impl DraftFields for PrescriptionDraft {
    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![
            ForeignKey::new(ReferenceField::PrescriptionAppointment, self.appointment_id),
            ForeignKey::new(ReferenceField::PrescriptionDoctor, self.doctor_id),
            ForeignKey::new(ReferenceField::PrescriptionPatient, self.patient_id),
        ]
    }

    fn sanitize(&mut self) {
        sanitize_optional("notes", &mut self.notes);
    }

    fn validate(&self) -> Result<(), FieldError> {
        match &self.notes {
            Some(notes) if notes.chars().count() > NOTES_MAX => Err(FieldError::new(
                "notes",
                "too_long",
                format!("notes must be at most {NOTES_MAX} characters"),
            )),
            _ => Ok(()),
        }
    }
}

impl RowFields for Prescription {
    type Draft = PrescriptionDraft;

    fn from_draft(id: RecordId, draft: PrescriptionDraft, _stamped_at: DateTime<Utc>) -> Self {
        Self {
            prescription_id: id,
            appointment_id: draft.appointment_id,
            doctor_id: draft.doctor_id,
            patient_id: draft.patient_id,
            prescribed_on: draft.prescribed_on,
            notes: draft.notes,
        }
    }

    fn id(&self) -> RecordId {
        self.prescription_id
    }

    fn patient(&self) -> Option<UserId> {
        Some(self.patient_id)
    }

    fn to_draft(&self) -> PrescriptionDraft {
        PrescriptionDraft {
            appointment_id: self.appointment_id,
            doctor_id: self.doctor_id,
            patient_id: self.patient_id,
            prescribed_on: self.prescribed_on,
            notes: self.notes.clone(),
        }
    }
}
