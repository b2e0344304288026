//! Payments made by a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DraftFields, FieldError, RowFields, require_text};
use crate::domain::{ForeignKey, RecordId, ReferenceField, UserId};

const METHOD_MAX: usize = 32;

/// Settlement state of a payment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Awaiting confirmation or settlement.
    #[default]
    Pending,
    /// Settled.
    Completed,
    /// Declined or reversed.
    Failed,
}

impl PaymentStatus {
    /// Stored and wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }

    /// Parse the stored form.
    pub fn parse(value: &str) -> Option<Self> {
        [Self::Pending, Self::Completed, Self::Failed]
            .into_iter()
            .find(|status| status.as_str() == value)
    }
}

/// Fields accepted when recording a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDraft {
    /// User who paid.
    pub user_id: UserId,
    /// Amount in minor currency units.
    pub amount_cents: i64,
    /// Instant the payment was taken.
    pub payment_date: DateTime<Utc>,
    /// Payment method, such as `card` or `cash`.
    pub method: String,
    /// Current state.
    #[serde(default)]
    pub status: PaymentStatus,
}

/// A recorded payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Primary key.
    pub payment_id: RecordId,
    /// User who paid.
    pub user_id: UserId,
    /// Amount in minor currency units.
    pub amount_cents: i64,
    /// Instant the payment was taken.
    pub payment_date: DateTime<Utc>,
    /// Payment method, such as `card` or `cash`.
    pub method: String,
    /// Current state.
    pub status: PaymentStatus,
}

impl DraftFields for PaymentDraft {
    fn foreign_keys(&self) -> Vec<ForeignKey> {
        vec![ForeignKey::new(ReferenceField::PaymentUser, self.user_id)]
    }

    fn sanitize(&mut self) {}

    fn validate(&self) -> Result<(), FieldError> {
        if self.amount_cents <= 0 {
            return Err(FieldError::new(
                "amount_cents",
                "not_positive",
                "amount_cents must be positive",
            ));
        }
        require_text("method", &self.method, METHOD_MAX)
    }
}

impl RowFields for Payment {
    type Draft = PaymentDraft;

    fn from_draft(id: RecordId, draft: PaymentDraft, _stamped_at: DateTime<Utc>) -> Self {
        Self {
            payment_id: id,
            user_id: draft.user_id,
            amount_cents: draft.amount_cents,
            payment_date: draft.payment_date,
            method: draft.method,
            status: draft.status,
        }
    }

    fn id(&self) -> RecordId {
        self.payment_id
    }

    fn patient(&self) -> Option<UserId> {
        None
    }

    fn to_draft(&self) -> PaymentDraft {
        PaymentDraft {
            user_id: self.user_id,
            amount_cents: self.amount_cents,
            payment_date: self.payment_date,
            method: self.method.clone(),
            status: self.status,
        }
    }
}
