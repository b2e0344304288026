//! Clinical records: appointments, prescriptions, inventory items, payments,
//! lab tests, and medical records (EMRs).
//!
//! Each kind comes as a pair: a *draft* holding client-supplied fields, and a
//! *record* holding a persisted row. Storage adapters work with the
//! [`RecordDraft`] and [`Record`] sum types so a single integrity-checked
//! code path serves every kind; HTTP handlers pick a concrete kind through
//! the [`Entity`] trait.

mod appointment;
mod inventory;
mod lab_test;
mod medical_record;
mod payment;
mod prescription;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{EntityKind, Error, ForeignKey, RecordId, UserId};

pub use appointment::{Appointment, AppointmentDraft, AppointmentStatus};
pub use inventory::{InventoryDraft, InventoryItem};
pub use lab_test::{LabTest, LabTestDraft};
pub use medical_record::{MedicalRecord, MedicalRecordDraft};
pub use payment::{Payment, PaymentDraft, PaymentStatus};
pub use prescription::{Prescription, PrescriptionDraft};

/// A draft field that failed shape validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    field: &'static str,
    code: &'static str,
    message: String,
}

impl FieldError {
    pub(crate) fn new(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }

    /// Wire name of the offending field.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Machine-readable reason.
    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FieldError {}

impl From<FieldError> for Error {
    fn from(value: FieldError) -> Self {
        Error::invalid_request(value.message.clone())
            .with_details(json!({ "field": value.field, "code": value.code }))
    }
}

/// Behaviour shared by every draft type.
pub(crate) trait DraftFields {
    /// Foreign keys that must resolve before the draft may be written.
    fn foreign_keys(&self) -> Vec<ForeignKey>;

    /// Strip markup from free-text fields.
    fn sanitize(&mut self);

    /// Check field shapes that do not need storage to verify.
    fn validate(&self) -> Result<(), FieldError>;
}

/// Accessors shared by every persisted row type.
pub(crate) trait RowFields: Sized {
    type Draft: DraftFields;

    fn from_draft(id: RecordId, draft: Self::Draft, stamped_at: DateTime<Utc>) -> Self;

    fn id(&self) -> RecordId;

    fn patient(&self) -> Option<UserId>;

    fn stamp(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn to_draft(&self) -> Self::Draft;
}

/// Reject blank or over-long required text.
pub(crate) fn require_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::new(
            field,
            "empty",
            format!("{field} must not be empty"),
        ));
    }
    if value.chars().count() > max {
        return Err(FieldError::new(
            field,
            "too_long",
            format!("{field} must be at most {max} characters"),
        ));
    }
    Ok(())
}

/// Apply markup stripping to an optional free-text field.
pub(crate) fn sanitize_optional(field: &'static str, value: &mut Option<String>) {
    let Some(text) = value.as_mut() else {
        return;
    };
    if sanitize::needs_stripping(text) {
        tracing::debug!(field, "markup stripped from free text");
        *text = sanitize::strip_markup(text);
    }
}

/// A concrete record kind exposed over HTTP.
pub trait Entity {
    /// Kind tag used for authorization and storage dispatch.
    const KIND: EntityKind;
    /// Client-supplied payload for create and update.
    type Draft: DeserializeOwned + Into<RecordDraft> + Send + 'static;
}

macro_rules! record_kinds {
    ($( $variant:ident => $record:ident, $draft:ident; )*) => {
        /// Client-supplied fields for any record kind.
        #[derive(Debug, Clone, PartialEq)]
        pub enum RecordDraft {
            $(
                #[doc = concat!("Fields for a new or revised [`", stringify!($record), "`].")]
                $variant($draft),
            )*
        }

        /// A persisted row of any record kind.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(untagged)]
        pub enum Record {
            $(
                #[doc = concat!("A stored [`", stringify!($record), "`].")]
                $variant($record),
            )*
        }

        $(
            impl Entity for $record {
                const KIND: EntityKind = EntityKind::$variant;
                type Draft = $draft;
            }

            impl From<$draft> for RecordDraft {
                fn from(value: $draft) -> Self {
                    Self::$variant(value)
                }
            }

            impl From<$record> for Record {
                fn from(value: $record) -> Self {
                    Self::$variant(value)
                }
            }
        )*

        impl RecordDraft {
            /// Kind the draft will be stored as.
            pub fn kind(&self) -> EntityKind {
                match self {
                    $( Self::$variant(_) => EntityKind::$variant, )*
                }
            }

            /// Foreign keys to verify, in column order.
            pub fn foreign_keys(&self) -> Vec<ForeignKey> {
                match self {
                    $( Self::$variant(draft) => draft.foreign_keys(), )*
                }
            }

            /// Return the draft with free-text fields stripped of markup.
            #[must_use]
            pub fn sanitized(mut self) -> Self {
                match &mut self {
                    $( Self::$variant(draft) => draft.sanitize(), )*
                }
                self
            }

            /// Validate field shapes.
            pub fn validate(&self) -> Result<(), FieldError> {
                match self {
                    $( Self::$variant(draft) => draft.validate(), )*
                }
            }

            /// Materialise the draft as a row with the given key.
            ///
            /// `stamped_at` fills server-assigned timestamps; on update pass
            /// the original value so it is preserved.
            pub fn into_record(self, id: RecordId, stamped_at: DateTime<Utc>) -> Record {
                match self {
                    $( Self::$variant(draft) => Record::$variant($record::from_draft(id, draft, stamped_at)), )*
                }
            }
        }

        impl Record {
            /// Kind of the row.
            pub fn kind(&self) -> EntityKind {
                match self {
                    $( Self::$variant(_) => EntityKind::$variant, )*
                }
            }

            /// Primary key.
            pub fn id(&self) -> RecordId {
                match self {
                    $( Self::$variant(record) => record.id(), )*
                }
            }

            /// Patient the row belongs to, for patient-owned kinds.
            pub fn patient_id(&self) -> Option<UserId> {
                match self {
                    $( Self::$variant(record) => record.patient(), )*
                }
            }

            /// Server-assigned timestamp, for kinds that carry one.
            pub fn stamped_at(&self) -> Option<DateTime<Utc>> {
                match self {
                    $( Self::$variant(record) => record.stamp(), )*
                }
            }

            /// Value of a foreign key column, if the row has it.
            pub fn reference(&self, field: super::ReferenceField) -> Option<RecordId> {
                match self {
                    $( Self::$variant(record) => record
                        .to_draft()
                        .foreign_keys()
                        .into_iter()
                        .find(|key| key.field == field)
                        .map(|key| key.id), )*
                }
            }
        }
    };
}

record_kinds! {
    Appointment => Appointment, AppointmentDraft;
    Prescription => Prescription, PrescriptionDraft;
    Inventory => InventoryItem, InventoryDraft;
    Payment => Payment, PaymentDraft;
    LabTest => LabTest, LabTestDraft;
    MedicalRecord => MedicalRecord, MedicalRecordDraft;
}
