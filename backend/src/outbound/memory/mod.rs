//! In-process storage adapter.
//!
//! [`MemoryStore`] implements both [`UserRepository`] and [`RecordStore`]
//! over one mutex-guarded state. Every port call takes the lock once, so a
//! reference check and the write it guards can never interleave with
//! another writer. Used by the test suites and by the server when no
//! database is configured.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    Deletion, Insertion, RecordStore, Revision, StoreError, UserInsert, UserRepository, UserUpdate,
};
use crate::domain::{
    Email, EntityKind, NewUserAccount, ReadScope, Record, RecordDraft, RecordId, ReferenceCensus,
    ReferenceField, StoredUser, UniqueUserField, UserAccount, UserAccountParts, UserChanges,
    UserId,
};

#[derive(Default)]
struct State {
    users: BTreeMap<UserId, StoredUser>,
    records: HashMap<EntityKind, BTreeMap<RecordId, Record>>,
    sequences: HashMap<EntityKind, i64>,
}

impl State {
    fn next_id(&mut self, kind: EntityKind) -> i64 {
        let counter = self.sequences.entry(kind).or_insert(0);
        *counter += 1;
        *counter
    }

    fn table(&self, kind: EntityKind) -> impl Iterator<Item = &Record> {
        self.records.get(&kind).into_iter().flat_map(BTreeMap::values)
    }

    fn exists(&self, kind: EntityKind, id: RecordId) -> bool {
        match kind {
            EntityKind::User => self.users.contains_key(&UserId::from(id)),
            _ => self
                .records
                .get(&kind)
                .is_some_and(|rows| rows.contains_key(&id)),
        }
    }

    fn first_missing(&self, draft: &RecordDraft) -> Option<ReferenceField> {
        draft
            .foreign_keys()
            .into_iter()
            .find(|key| !self.exists(key.field.target(), key.id))
            .map(|key| key.field)
    }

    fn census(&self, kind: EntityKind, id: RecordId) -> ReferenceCensus {
        ReferenceCensus::from_counts(kind.referenced_by().iter().map(|field| {
            let count = self
                .table(field.owner())
                .filter(|row| row.reference(*field) == Some(id))
                .count();
            (*field, u64::try_from(count).unwrap_or(u64::MAX))
        }))
    }

    fn collision(
        &self,
        except: Option<UserId>,
        email: Option<&Email>,
        phone: Option<&str>,
    ) -> Option<UniqueUserField> {
        let others = || {
            self.users
                .values()
                .filter(move |stored| Some(stored.account.id()) != except)
        };
        if email.is_some_and(|email| others().any(|stored| stored.account.email() == email)) {
            return Some(UniqueUserField::Email);
        }
        if phone.is_some_and(|phone| {
            others().any(|stored| stored.account.phone_number().as_ref() == phone)
        }) {
            return Some(UniqueUserField::PhoneNumber);
        }
        None
    }
}

/// Mutex-guarded storage for users and every record kind.
pub struct MemoryStore {
    state: Mutex<State>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl MemoryStore {
    /// Empty store stamping rows with `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::query("memory store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<StoredUser>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .users
            .values()
            .find(|stored| stored.account.email() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, StoreError> {
        let state = self.lock()?;
        Ok(state.users.get(&id).map(|stored| stored.account.clone()))
    }

    async fn list(&self) -> Result<Vec<UserAccount>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .users
            .values()
            .map(|stored| stored.account.clone())
            .collect())
    }

    async fn insert(&self, user: &NewUserAccount) -> Result<UserInsert, StoreError> {
        let mut state = self.lock()?;
        if let Some(field) =
            state.collision(None, Some(&user.email), Some(user.phone_number.as_ref()))
        {
            return Ok(UserInsert::Duplicate(field));
        }
        let id = UserId::new(state.next_id(EntityKind::User));
        let account = UserAccount::new(UserAccountParts {
            id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            role: user.role,
            created_at: self.clock.utc(),
        });
        state.users.insert(
            id,
            StoredUser {
                account: account.clone(),
                password_hash: user.password_hash.clone(),
            },
        );
        Ok(UserInsert::Inserted(account))
    }

    async fn update(&self, id: UserId, changes: &UserChanges) -> Result<UserUpdate, StoreError> {
        let mut state = self.lock()?;
        if !state.users.contains_key(&id) {
            return Ok(UserUpdate::NotFound);
        }
        let phone: Option<&str> = changes.phone_number.as_ref().map(AsRef::as_ref);
        if let Some(field) = state.collision(Some(id), None, phone) {
            return Ok(UserUpdate::Duplicate(field));
        }
        let Some(stored) = state.users.get_mut(&id) else {
            return Ok(UserUpdate::NotFound);
        };
        let current = &stored.account;
        let account = UserAccount::new(UserAccountParts {
            id,
            full_name: changes
                .full_name
                .clone()
                .unwrap_or_else(|| current.full_name().clone()),
            email: current.email().clone(),
            phone_number: changes
                .phone_number
                .clone()
                .unwrap_or_else(|| current.phone_number().clone()),
            role: current.role(),
            created_at: current.created_at(),
        });
        stored.account = account.clone();
        if let Some(digest) = &changes.password_hash {
            stored.password_hash = digest.clone();
        }
        Ok(UserUpdate::Updated(account))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find(&self, kind: EntityKind, id: RecordId) -> Result<Option<Record>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .records
            .get(&kind)
            .and_then(|rows| rows.get(&id))
            .cloned())
    }

    async fn list(&self, kind: EntityKind, scope: ReadScope) -> Result<Vec<Record>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .table(kind)
            .filter(|row| scope.admits_record(row))
            .cloned()
            .collect())
    }

    async fn insert_checked(&self, draft: &RecordDraft) -> Result<Insertion, StoreError> {
        let mut state = self.lock()?;
        if let Some(field) = state.first_missing(draft) {
            return Ok(Insertion::MissingReference(field));
        }
        let kind = draft.kind();
        let id = RecordId::new(state.next_id(kind));
        let record = draft.clone().into_record(id, self.clock.utc());
        state
            .records
            .entry(kind)
            .or_default()
            .insert(id, record.clone());
        Ok(Insertion::Inserted(record))
    }

    async fn update_checked(
        &self,
        id: RecordId,
        draft: &RecordDraft,
    ) -> Result<Revision, StoreError> {
        let mut state = self.lock()?;
        let kind = draft.kind();
        let Some(stamped_at) = state
            .records
            .get(&kind)
            .and_then(|rows| rows.get(&id))
            .map(|existing| existing.stamped_at().unwrap_or_else(|| self.clock.utc()))
        else {
            return Ok(Revision::NotFound);
        };
        if let Some(field) = state.first_missing(draft) {
            return Ok(Revision::MissingReference(field));
        }
        let record = draft.clone().into_record(id, stamped_at);
        state
            .records
            .entry(kind)
            .or_default()
            .insert(id, record.clone());
        Ok(Revision::Updated(record))
    }

    async fn delete_unreferenced(
        &self,
        kind: EntityKind,
        id: RecordId,
    ) -> Result<Deletion, StoreError> {
        let mut state = self.lock()?;
        if !state.exists(kind, id) {
            return Ok(Deletion::NotFound);
        }
        let census = state.census(kind, id);
        if !census.is_clear() {
            return Ok(Deletion::Referenced(census));
        }
        match kind {
            EntityKind::User => {
                state.users.remove(&UserId::from(id));
            }
            _ => {
                if let Some(rows) = state.records.get_mut(&kind) {
                    rows.remove(&id);
                }
            }
        }
        Ok(Deletion::Deleted)
    }
}
