//! Electronic medical records (EMRs) written by a doctor about a patient.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DraftFields, FieldError, RowFields, sanitize_optional};
use crate::domain::{ForeignKey, RecordId, ReferenceField, UserId};

const SUMMARY_MAX: usize = 8000;

/// Fields accepted when writing an EMR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalRecordDraft {
    /// Patient the row belongs to.
    pub patient_id: UserId,
    /// Responsible doctor.
    pub doctor_id: UserId,
    /// Clinical summary; markup is stripped.
    #[serde(default)]
    pub summary: Option<String>,
}

/// A persisted EMR. `created_at` is assigned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalRecord {
    /// Primary key.
    pub emr_id: RecordId,
    /// Patient the row belongs to.
    pub patient_id: UserId,
    /// Responsible doctor.
    pub doctor_id: UserId,
    /// Clinical summary; markup is stripped.
    pub summary: Option<String>,
    /// Assigned when the record is first written.
    pub created_at: DateTime<Utc>,
}

impl DraftFields for MedicalRecordDraft {
    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![
            ForeignKey::new(ReferenceField::MedicalRecordPatient, self.patient_id),
            ForeignKey::new(ReferenceField::MedicalRecordDoctor, self.doctor_id),
        ]
    }

    fn sanitize(&mut self) {
        sanitize_optional("summary", &mut self.summary);
    }

    fn validate(&self) -> Result<(), FieldError> {
        match &self.summary {
            Some(summary) if summary.chars().count() > SUMMARY_MAX => Err(FieldError::new(
                "summary",
                "too_long",
                format!("summary must be at most {SUMMARY_MAX} characters"),
            )),
            _ => Ok(()),
        }
    }
}

impl RowFields for MedicalRecord {
    type Draft = MedicalRecordDraft;

    fn from_draft(id: RecordId, draft: MedicalRecordDraft, stamped_at: DateTime<Utc>) -> Self {
        Self {
            emr_id: id,
            patient_id: draft.patient_id,
            doctor_id: draft.doctor_id,
            summary: draft.summary,
            created_at: stamped_at,
        }
    }

    fn id(&self) -> RecordId {
        self.emr_id
    }

    fn patient(&self) -> Option<UserId> {
        Some(self.patient_id)
    }

    fn stamp(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn to_draft(&self) -> MedicalRecordDraft {
        MedicalRecordDraft {
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            summary: self.summary.clone(),
        }
    }
}
