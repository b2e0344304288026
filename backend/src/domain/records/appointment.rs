//! Appointments between a patient and a doctor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DraftFields, FieldError, RowFields};
use crate::domain::{ForeignKey, RecordId, ReferenceField, UserId};

/// Lifecycle state of an appointment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    /// Awaiting confirmation or settlement.
    #[default]
    Pending,
    /// Accepted by the clinic.
    Confirmed,
    /// Called off.
    Cancelled,
}

impl AppointmentStatus {
    /// Stored and wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Parse the stored form.
    pub fn parse(value: &str) -> Option<Self> {
        [Self::Pending, Self::Confirmed, Self::Cancelled]
            .into_iter()
            .find(|status| status.as_str() == value)
    }
}

/// Fields accepted when booking or rescheduling an appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDraft {
    /// Patient the row belongs to.
    pub patient_id: UserId,
    /// Responsible doctor.
    pub doctor_id: UserId,
    /// Scheduled start.
    pub appointment_date: DateTime<Utc>,
    /// Current state.
    #[serde(default)]
    pub status: AppointmentStatus,
}

/// A booked appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Primary key.
    pub appointment_id: RecordId,
    /// Patient the row belongs to.
    pub patient_id: UserId,
    /// Responsible doctor.
    pub doctor_id: UserId,
    /// Scheduled start.
    pub appointment_date: DateTime<Utc>,
    /// Current state.
    pub status: AppointmentStatus,
}

impl DraftFields for AppointmentDraft {
    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![
            ForeignKey::new(ReferenceField::AppointmentPatient, self.patient_id),
            ForeignKey::new(ReferenceField::AppointmentDoctor, self.doctor_id),
        ]
    }

    fn sanitize(&mut self) {}

    fn validate(&self) -> Result<(), FieldError> {
        if self.patient_id == self.doctor_id {
            return Err(FieldError::new(
                "doctor_id",
                "same_as_patient",
                "doctor_id must differ from patient_id",
            ));
        }
        Ok(())
    }
}

impl RowFields for Appointment {
    type Draft = AppointmentDraft;

    fn from_draft(id: RecordId, draft: AppointmentDraft, _stamped_at: DateTime<Utc>) -> Self {
        Self {
            appointment_id: id,
            patient_id: draft.patient_id,
            doctor_id: draft.doctor_id,
            appointment_date: draft.appointment_date,
            status: draft.status,
        }
    }

    fn id(&self) -> RecordId {
        self.appointment_id
    }

    fn patient(&self) -> Option<UserId> {
        Some(self.patient_id)
    }

    fn to_draft(&self) -> AppointmentDraft {
        AppointmentDraft {
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            appointment_date: self.appointment_date,
            status: self.status,
        }
    }
}
