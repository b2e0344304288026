//! Port abstraction for the integrity-checked record store.
//!
//! Every method that writes performs its reference checks and its mutation
//! inside one transaction (or, for in-process adapters, one critical
//! section). Callers never see a state where a check passed but the world
//! changed before the write landed.

use async_trait::async_trait;

use crate::domain::{
    EntityKind, ReadScope, Record, RecordDraft, RecordId, ReferenceCensus, ReferenceField,
};

use super::StoreError;

/// Result of an integrity-checked insert.
#[derive(Debug, Clone, PartialEq)]
pub enum Insertion {
    /// The row was written.
    Inserted(Record),
    /// The first foreign key, in column order, that names no row.
    MissingReference(ReferenceField),
}

/// Result of an integrity-checked update.
#[derive(Debug, Clone, PartialEq)]
pub enum Revision {
    /// The row was replaced.
    Updated(Record),
    /// No row of the draft's kind has the given key.
    NotFound,
    /// The first foreign key, in column order, that names no row.
    MissingReference(ReferenceField),
}

/// Result of a census-guarded delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deletion {
    /// The row was removed.
    Deleted,
    /// No row of the kind has the given key.
    NotFound,
    /// Dependent rows still point at the target; nothing was removed.
    Referenced(ReferenceCensus),
}

/// Driven port over every table, users included for deletes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch one row of a record kind.
    async fn find(&self, kind: EntityKind, id: RecordId) -> Result<Option<Record>, StoreError>;

    /// Rows of a record kind visible in `scope`, ordered by key.
    async fn list(&self, kind: EntityKind, scope: ReadScope) -> Result<Vec<Record>, StoreError>;

    /// Verify every foreign key of `draft`, then insert it.
    async fn insert_checked(&self, draft: &RecordDraft) -> Result<Insertion, StoreError>;

    /// Verify the target exists and every foreign key of `draft` resolves,
    /// then replace the row. Server-assigned timestamps are preserved.
    async fn update_checked(
        &self,
        id: RecordId,
        draft: &RecordDraft,
    ) -> Result<Revision, StoreError>;

    /// Lock the target, take its reference census, and delete it only when
    /// the census is clear. Accepts [`EntityKind::User`].
    async fn delete_unreferenced(
        &self,
        kind: EntityKind,
        id: RecordId,
    ) -> Result<Deletion, StoreError>;
}
