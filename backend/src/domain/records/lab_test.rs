//! Laboratory tests ordered for a patient.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{DraftFields, FieldError, RowFields, require_text, sanitize_optional};
use crate::domain::{ForeignKey, RecordId, ReferenceField, UserId};

const TEST_NAME_MAX: usize = 200;
const RESULT_MAX: usize = 4000;

/// Fields accepted when ordering or reporting a lab test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabTestDraft {
    /// Patient the row belongs to.
    pub patient_id: UserId,
    /// Name of the test ordered.
    pub test_name: String,
    /// Reported result; markup is stripped.
    #[serde(default)]
    pub result: Option<String>,
    /// Date the sample was taken.
    pub test_date: NaiveDate,
}

/// A lab test row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabTest {
    /// Primary key.
    pub test_id: RecordId,
    /// Patient the row belongs to.
    pub patient_id: UserId,
    /// Name of the test ordered.
    pub test_name: String,
    /// Reported result; markup is stripped.
    pub result: Option<String>,
    /// Date the sample was taken.
    pub test_date: NaiveDate,
}

impl DraftFields for LabTestDraft {
    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![ForeignKey::new(ReferenceField::LabTestPatient, self.patient_id)]
    }

    fn sanitize(&mut self) {
        sanitize_optional("result", &mut self.result);
    }

    fn validate(&self) -> Result<(), FieldError> {
        require_text("test_name", &self.test_name, TEST_NAME_MAX)?;
        match &self.result {
            Some(result) if result.chars().count() > RESULT_MAX => Err(FieldError::new(
                "result",
                "too_long",
                format!("result must be at most {RESULT_MAX} characters"),
            )),
            _ => Ok(()),
        }
    }
}

impl RowFields for LabTest {
    type Draft = LabTestDraft;

    fn from_draft(id: RecordId, draft: LabTestDraft, _stamped_at: DateTime<Utc>) -> Self {
        Self {
            test_id: id,
            patient_id: draft.patient_id,
            test_name: draft.test_name,
            result: draft.result,
            test_date: draft.test_date,
        }
    }

    fn id(&self) -> RecordId {
        self.test_id
    }

    fn patient(&self) -> Option<UserId> {
        Some(self.patient_id)
    }

    fn to_draft(&self) -> LabTestDraft {
        LabTestDraft {
            patient_id: self.patient_id,
            test_name: self.test_name.clone(),
            result: self.result.clone(),
            test_date: self.test_date,
        }
    }
}
