//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Unique-column collisions are detected from the violated constraint name
//! rather than a read-then-write check, so two concurrent signups with the
//! same email cannot both succeed.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StoreError, UserInsert, UserRepository, UserUpdate};
use crate::domain::{Email, NewUserAccount, StoredUser, UserAccount, UserChanges, UserId};

use super::error_mapping::{duplicate_user_field, map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_stored(row: UserRow) -> Result<StoredUser, StoreError> {
    let id = row.user_id;
    row.into_stored().map_err(|message| {
        tracing::error!(user_id = id, %message, "stored user row failed validation");
        StoreError::query(format!("user {id} is malformed"))
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_email(&self, email: &Email) -> Result<Option<StoredUser>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_stored).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_stored).transpose()?.map(|stored| stored.account))
    }

    async fn list(&self) -> Result<Vec<UserAccount>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order_by(users::user_id)
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| row_to_stored(row).map(|stored| stored.account))
            .collect()
    }

    async fn insert(&self, user: &NewUserAccount) -> Result<UserInsert, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let outcome = diesel::insert_into(users::table)
            .values(NewUserRow::from(user))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await;
        match outcome {
            Ok(row) => Ok(UserInsert::Inserted(row_to_stored(row)?.account)),
            Err(error) => match duplicate_user_field(&error) {
                Some(field) => Ok(UserInsert::Duplicate(field)),
                None => Err(map_diesel_error(error)),
            },
        }
    }

    async fn update(&self, id: UserId, changes: &UserChanges) -> Result<UserUpdate, StoreError> {
        if changes.is_empty() {
            return Ok(self
                .find_by_id(id)
                .await?
                .map_or(UserUpdate::NotFound, UserUpdate::Updated));
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let outcome = diesel::update(users::table.find(id.get()))
            .set(UserChangeset::from(changes))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional();
        match outcome {
            Ok(Some(row)) => Ok(UserUpdate::Updated(row_to_stored(row)?.account)),
            Ok(None) => Ok(UserUpdate::NotFound),
            Err(error) => match duplicate_user_field(&error) {
                Some(field) => Ok(UserUpdate::Duplicate(field)),
                None => Err(map_diesel_error(error)),
            },
        }
    }
}
