//! Port abstraction for user persistence adapters.
use async_trait::async_trait;

use crate::domain::{
    Email, NewUserAccount, StoredUser, UniqueUserField, UserAccount, UserChanges, UserId,
};

use super::StoreError;

/// Result of inserting a user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInsert {
    /// The row was written.
    Inserted(UserAccount),
    /// A unique column already holds the submitted value.
    Duplicate(UniqueUserField),
}

/// Result of modifying a user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserUpdate {
    /// The row was modified.
    Updated(UserAccount),
    /// No row has the given key.
    NotFound,
    /// A unique column already holds the submitted value.
    Duplicate(UniqueUserField),
}

/// Driven port over the `users` table.
///
/// Deleting a user goes through
/// [`RecordStore::delete_unreferenced`](super::RecordStore::delete_unreferenced)
/// so that the reference census and the delete share a transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user and its password digest by login address.
    async fn find_by_email(&self, email: &Email) -> Result<Option<StoredUser>, StoreError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, StoreError>;

    /// Every user, ordered by identifier.
    async fn list(&self) -> Result<Vec<UserAccount>, StoreError>;

    /// Insert a user, reporting unique-column collisions as a value.
    async fn insert(&self, user: &NewUserAccount) -> Result<UserInsert, StoreError>;

    /// Apply a partial update.
    async fn update(&self, id: UserId, changes: &UserChanges) -> Result<UserUpdate, StoreError>;
}
