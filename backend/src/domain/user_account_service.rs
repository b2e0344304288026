//! Account management: signup, profile reads and updates, guarded deletes,
//! and password resets.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{
    CredentialError, CredentialHasher, Deletion, RecordStore, UserAccounts, UserInsert,
    UserRepository, UserUpdate,
};
use crate::domain::{
    Action, EntityKind, Error, NewUserAccount, Password, PasswordDigest, PasswordReset,
    Principal, ProfileUpdate, Role, SignupProfile, UniqueUserField, UserAccount, UserChanges,
    UserId, guard,
};

/// Account service implementing the [`UserAccounts`] driving port.
///
/// User deletes go through the record store so the reference census and the
/// delete run in the same transaction as every other guarded delete.
#[derive(Clone)]
pub struct UserAccountService<U, R, H> {
    users: Arc<U>,
    records: Arc<R>,
    hasher: Arc<H>,
}

impl<U, R, H> UserAccountService<U, R, H> {
    /// Create a new service over the given adapters.
    pub fn new(users: Arc<U>, records: Arc<R>, hasher: Arc<H>) -> Self {
        Self {
            users,
            records,
            hasher,
        }
    }
}

fn user_not_found() -> Error {
    Error::not_found(format!("{} not found", EntityKind::User.label()))
}

fn duplicate(field: UniqueUserField) -> Error {
    tracing::info!(field = field.as_str(), "user write rejected by unique column");
    Error::conflict(format!("{} already registered", field.as_str()))
        .with_details(json!({ "field": field.as_str() }))
}

fn map_credential_error(error: CredentialError) -> Error {
    Error::internal(format!("credential hashing failed: {error}"))
}

impl<U, R, H> UserAccountService<U, R, H>
where
    U: UserRepository,
    R: RecordStore,
    H: CredentialHasher,
{
    async fn digest(&self, password: &Password) -> Result<PasswordDigest, Error> {
        self.hasher
            .hash(password)
            .await
            .map_err(map_credential_error)
    }

    async fn apply(&self, id: UserId, changes: &UserChanges) -> Result<UserAccount, Error> {
        match self.users.update(id, changes).await? {
            UserUpdate::Updated(account) => Ok(account),
            UserUpdate::NotFound => Err(user_not_found()),
            UserUpdate::Duplicate(field) => Err(duplicate(field)),
        }
    }
}

#[async_trait]
impl<U, R, H> UserAccounts for UserAccountService<U, R, H>
where
    U: UserRepository,
    R: RecordStore,
    H: CredentialHasher,
{
    async fn signup(&self, profile: SignupProfile) -> Result<UserAccount, Error> {
        let SignupProfile {
            full_name,
            email,
            phone_number,
            role,
            password,
        } = profile;
        let password_hash = self.digest(&password).await?;
        let new_user = NewUserAccount {
            full_name,
            email,
            phone_number,
            role,
            password_hash,
        };
        match self.users.insert(&new_user).await? {
            UserInsert::Inserted(account) => {
                tracing::info!(user_id = %account.id(), role = %account.role(), "user registered");
                Ok(account)
            }
            UserInsert::Duplicate(field) => Err(duplicate(field)),
        }
    }

    async fn me(&self, principal: &Principal) -> Result<UserAccount, Error> {
        self.users
            .find_by_id(principal.user_id())
            .await?
            .ok_or_else(user_not_found)
    }

    async fn list(&self, principal: &Principal) -> Result<Vec<UserAccount>, Error> {
        guard(principal, EntityKind::User, Action::List)?;
        Ok(self.users.list().await?)
    }

    async fn get(&self, principal: &Principal, id: UserId) -> Result<UserAccount, Error> {
        guard(principal, EntityKind::User, Action::Get)?;
        self.users.find_by_id(id).await?.ok_or_else(user_not_found)
    }

    async fn update(
        &self,
        principal: &Principal,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<UserAccount, Error> {
        guard(principal, EntityKind::User, Action::Update)?;
        let ProfileUpdate {
            full_name,
            phone_number,
            password,
        } = update;
        let password_hash = match password {
            Some(password) => Some(self.digest(&password).await?),
            None => None,
        };
        let changes = UserChanges {
            full_name,
            phone_number,
            password_hash,
        };
        if changes.is_empty() {
            return Err(Error::invalid_request(
                "at least one of full_name, phone_number or password is required",
            ));
        }
        self.apply(id, &changes).await
    }

    async fn delete(&self, principal: &Principal, id: UserId) -> Result<(), Error> {
        guard(principal, EntityKind::User, Action::Delete)?;
        match self
            .records
            .delete_unreferenced(EntityKind::User, id.into())
            .await?
        {
            Deletion::Deleted => {
                tracing::info!(user_id = %id, "user deleted");
                Ok(())
            }
            Deletion::NotFound => Err(user_not_found()),
            Deletion::Referenced(census) => {
                tracing::info!(user_id = %id, ?census, "user delete blocked by references");
                Err(census.conflict_for(EntityKind::User))
            }
        }
    }

    async fn reset_password(
        &self,
        principal: &Principal,
        reset: PasswordReset,
    ) -> Result<(), Error> {
        if principal.email() != &reset.email && principal.role() != Role::Admin {
            tracing::debug!(user_id = %principal.user_id(), "password reset for another account refused");
            return Err(Error::forbidden("Insufficient privileges"));
        }
        let Some(stored) = self.users.find_by_email(&reset.email).await? else {
            return Err(user_not_found());
        };
        let changes = UserChanges {
            password_hash: Some(self.digest(&reset.new_password).await?),
            ..UserChanges::default()
        };
        self.apply(stored.account.id(), &changes).await?;
        tracing::info!(user_id = %stored.account.id(), "password reset");
        Ok(())
    }
}

#[cfg(test)]
#[path = "user_account_service_tests.rs"]
mod tests;
