//! PostgreSQL-backed `RecordStore` implementation using Diesel ORM.
//!
//! Reference checks take row locks inside the same transaction as the write
//! they guard. Inserts and updates key-share lock every referenced row, so
//! a concurrent delete of that row blocks until they commit. Deletes lock
//! the target `FOR UPDATE` before counting dependants, so a concurrent
//! insert pointing at it blocks until the delete commits and then finds
//! the row gone.

use async_trait::async_trait;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use tracing::debug;

use crate::domain::ports::{Deletion, Insertion, RecordStore, Revision, StoreError};
use crate::domain::{EntityKind, ReadScope, Record, RecordDraft, RecordId, ReferenceCensus};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::pool::DbPool;
use super::record_queries::{
    RowLock, count_references, delete_row, find_record, first_unresolved, insert_record,
    list_records, lock_row, update_record,
};

/// Diesel-backed implementation of the [`RecordStore`] port.
#[derive(Clone)]
pub struct DieselRecordStore {
    pool: DbPool,
}

impl DieselRecordStore {
    /// Create a new store with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for DieselRecordStore {
    async fn find(&self, kind: EntityKind, id: RecordId) -> Result<Option<Record>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        find_record(&mut conn, kind, id)
            .await
            .map_err(map_diesel_error)
    }

    async fn list(&self, kind: EntityKind, scope: ReadScope) -> Result<Vec<Record>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        list_records(&mut conn, kind, scope)
            .await
            .map_err(map_diesel_error)
    }

    async fn insert_checked(&self, draft: &RecordDraft) -> Result<Insertion, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                if let Some(field) = first_unresolved(conn, draft).await? {
                    return Ok(Insertion::MissingReference(field));
                }
                insert_record(conn, draft).await.map(Insertion::Inserted)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn update_checked(
        &self,
        id: RecordId,
        draft: &RecordDraft,
    ) -> Result<Revision, StoreError> {
        let kind = draft.kind();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                if !lock_row(conn, kind, id, RowLock::Update).await? {
                    return Ok(Revision::NotFound);
                }
                if let Some(field) = first_unresolved(conn, draft).await? {
                    return Ok(Revision::MissingReference(field));
                }
                Ok(update_record(conn, id, draft)
                    .await?
                    .map_or(Revision::NotFound, Revision::Updated))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn delete_unreferenced(
        &self,
        kind: EntityKind,
        id: RecordId,
    ) -> Result<Deletion, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                if !lock_row(conn, kind, id, RowLock::Update).await? {
                    return Ok(Deletion::NotFound);
                }
                let mut counts = Vec::with_capacity(kind.referenced_by().len());
                for field in kind.referenced_by() {
                    counts.push((*field, count_references(conn, *field, id).await?));
                }
                let census = ReferenceCensus::from_counts(counts);
                if !census.is_clear() {
                    debug!(%kind, id = id.get(), "delete refused while dependants exist");
                    return Ok(Deletion::Referenced(census));
                }
                let removed = delete_row(conn, kind, id).await?;
                Ok(if removed == 0 {
                    Deletion::NotFound
                } else {
                    Deletion::Deleted
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
