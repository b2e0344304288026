//! Driving port for the record surfaces (appointments through EMRs).

use async_trait::async_trait;

use crate::domain::{EntityKind, Error, Principal, Record, RecordDraft, RecordId};

/// Domain use-case port for guarded record mutation and scoped reads.
///
/// Each call runs the authorization guard for the draft's or argument's
/// kind before touching storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClinicalRecords: Send + Sync {
    /// Create a row after checking its foreign keys.
    async fn create(&self, principal: &Principal, draft: RecordDraft) -> Result<Record, Error>;

    /// Rows visible to the caller.
    async fn list(&self, principal: &Principal, kind: EntityKind) -> Result<Vec<Record>, Error>;

    /// One row visible to the caller.
    async fn get(
        &self,
        principal: &Principal,
        kind: EntityKind,
        id: RecordId,
    ) -> Result<Record, Error>;

    /// Replace a row after checking its foreign keys.
    async fn update(
        &self,
        principal: &Principal,
        id: RecordId,
        draft: RecordDraft,
    ) -> Result<Record, Error>;

    /// Delete a row that nothing references.
    async fn delete(&self, principal: &Principal, kind: EntityKind, id: RecordId)
    -> Result<(), Error>;
}
