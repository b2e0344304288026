//! Driving port for account management.

use async_trait::async_trait;

use crate::domain::{
    Error, PasswordReset, Principal, ProfileUpdate, SignupProfile, UserAccount, UserId,
};

/// Domain use-case port for the `/users` surface and password resets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Register a new account. Open to anonymous callers.
    async fn signup(&self, profile: SignupProfile) -> Result<UserAccount, Error>;

    /// The caller's own account.
    async fn me(&self, principal: &Principal) -> Result<UserAccount, Error>;

    /// Every account.
    async fn list(&self, principal: &Principal) -> Result<Vec<UserAccount>, Error>;

    /// One account by identifier.
    async fn get(&self, principal: &Principal, id: UserId) -> Result<UserAccount, Error>;

    /// Change profile fields. Role is never changed.
    async fn update(
        &self,
        principal: &Principal,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<UserAccount, Error>;

    /// Delete an account that nothing references.
    async fn delete(&self, principal: &Principal, id: UserId) -> Result<(), Error>;

    /// Replace the password of the account named in `reset`.
    async fn reset_password(&self, principal: &Principal, reset: PasswordReset)
    -> Result<(), Error>;
}
