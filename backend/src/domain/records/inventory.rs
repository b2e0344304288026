//! Medicine stock held by the clinic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DraftFields, FieldError, RowFields, require_text, sanitize_optional};
use crate::domain::{ForeignKey, RecordId, UserId};

const NAME_MAX: usize = 200;
const DESCRIPTION_MAX: usize = 2000;

/// Fields accepted when stocking or restocking an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryDraft {
    /// Medicine name.
    pub name: String,
    /// Free-text description; markup is stripped.
    #[serde(default)]
    pub description: Option<String>,
    /// Units in stock.
    pub quantity: i32,
    /// Unit price in minor currency units.
    pub unit_price_cents: i64,
}

/// A stocked medicine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Primary key.
    pub medicine_id: RecordId,
    /// Medicine name.
    pub name: String,
    /// Free-text description; markup is stripped.
    pub description: Option<String>,
    /// Units in stock.
    pub quantity: i32,
    /// Unit price in minor currency units.
    pub unit_price_cents: i64,
}

impl DraftFields for InventoryDraft {
    fn foreign_keys(&self) -> Vec<ForeignKey> {
        Vec::new()
    }

    fn sanitize(&mut self) {
        sanitize_optional("description", &mut self.description);
    }

    fn validate(&self) -> Result<(), FieldError> {
        require_text("name", &self.name, NAME_MAX)?;
        if let Some(description) = &self.description
            && description.chars().count() > DESCRIPTION_MAX
        {
            return Err(FieldError::new(
                "description",
                "too_long",
                format!("description must be at most {DESCRIPTION_MAX} characters"),
            ));
        }
        if self.quantity < 0 {
            return Err(FieldError::new(
                "quantity",
                "negative",
                "quantity must not be negative",
            ));
        }
        if self.unit_price_cents < 0 {
            return Err(FieldError::new(
                "unit_price_cents",
                "negative",
                "unit_price_cents must not be negative",
            ));
        }
        Ok(())
    }
}

impl RowFields for InventoryItem {
    type Draft = InventoryDraft;

    fn from_draft(id: RecordId, draft: InventoryDraft, _stamped_at: DateTime<Utc>) -> Self {
        Self {
            medicine_id: id,
            name: draft.name,
            description: draft.description,
            quantity: draft.quantity,
            unit_price_cents: draft.unit_price_cents,
        }
    }

    fn id(&self) -> RecordId {
        self.medicine_id
    }

    fn patient(&self) -> Option<UserId> {
        None
    }

    fn to_draft(&self) -> InventoryDraft {
        InventoryDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            quantity: self.quantity,
            unit_price_cents: self.unit_price_cents,
        }
    }
}
