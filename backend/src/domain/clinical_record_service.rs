//! Guarded create, read, update, and delete over every record kind.
//!
//! Each operation consults the allow-list for its (kind, action) pair before
//! anything else, then hands integrity checks to the [`RecordStore`], which
//! performs them in the same transaction as the write.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{ClinicalRecords, Deletion, Insertion, RecordStore, Revision};
use crate::domain::{
    Action, EntityKind, Error, Principal, Record, RecordDraft, RecordId, ReferenceField, guard,
    read_scope,
};

/// Record service implementing the [`ClinicalRecords`] driving port.
#[derive(Clone)]
pub struct ClinicalRecordService<R> {
    records: Arc<R>,
}

impl<R> ClinicalRecordService<R> {
    /// Create a new service over the given store.
    pub fn new(records: Arc<R>) -> Self {
        Self { records }
    }
}

fn not_found(kind: EntityKind) -> Error {
    Error::not_found(format!("{} not found", kind.label()))
}

fn invalid_reference(field: ReferenceField) -> Error {
    tracing::debug!(field = field.column(), target = %field.target(), "foreign key names no row");
    Error::invalid_reference(field.column())
}

/// Sanitise free text and validate shapes ahead of a write.
fn prepare(draft: RecordDraft) -> Result<RecordDraft, Error> {
    let cleaned = draft.sanitized();
    cleaned.validate()?;
    Ok(cleaned)
}

fn ensure_record_kind(kind: EntityKind) -> Result<(), Error> {
    if kind == EntityKind::User {
        return Err(Error::internal("user rows are not served by the record service"));
    }
    Ok(())
}

#[async_trait]
impl<R> ClinicalRecords for ClinicalRecordService<R>
where
    R: RecordStore,
{
    async fn create(&self, principal: &Principal, draft: RecordDraft) -> Result<Record, Error> {
        let kind = draft.kind();
        guard(principal, kind, Action::Create)?;
        let draft = prepare(draft)?;
        match self.records.insert_checked(&draft).await? {
            Insertion::Inserted(record) => {
                tracing::info!(kind = %kind, id = %record.id(), "record created");
                Ok(record)
            }
            Insertion::MissingReference(field) => Err(invalid_reference(field)),
        }
    }

    async fn list(&self, principal: &Principal, kind: EntityKind) -> Result<Vec<Record>, Error> {
        ensure_record_kind(kind)?;
        let scope = read_scope(principal, kind, Action::List)?;
        Ok(self.records.list(kind, scope).await?)
    }

    async fn get(
        &self,
        principal: &Principal,
        kind: EntityKind,
        id: RecordId,
    ) -> Result<Record, Error> {
        ensure_record_kind(kind)?;
        let scope = read_scope(principal, kind, Action::Get)?;
        match self.records.find(kind, id).await? {
            Some(record) if scope.admits_record(&record) => Ok(record),
            _ => Err(not_found(kind)),
        }
    }

    async fn update(
        &self,
        principal: &Principal,
        id: RecordId,
        draft: RecordDraft,
    ) -> Result<Record, Error> {
        let kind = draft.kind();
        guard(principal, kind, Action::Update)?;
        let draft = prepare(draft)?;
        match self.records.update_checked(id, &draft).await? {
            Revision::Updated(record) => {
                tracing::info!(kind = %kind, id = %id, "record updated");
                Ok(record)
            }
            Revision::NotFound => Err(not_found(kind)),
            Revision::MissingReference(field) => Err(invalid_reference(field)),
        }
    }

    async fn delete(
        &self,
        principal: &Principal,
        kind: EntityKind,
        id: RecordId,
    ) -> Result<(), Error> {
        ensure_record_kind(kind)?;
        guard(principal, kind, Action::Delete)?;
        match self.records.delete_unreferenced(kind, id).await? {
            Deletion::Deleted => {
                tracing::info!(kind = %kind, id = %id, "record deleted");
                Ok(())
            }
            Deletion::NotFound => Err(not_found(kind)),
            Deletion::Referenced(census) => {
                tracing::info!(kind = %kind, id = %id, ?census, "delete blocked by references");
                Err(census.conflict_for(kind))
            }
        }
    }
}

#[cfg(test)]
#[path = "clinical_record_service_tests.rs"]
mod tests;
