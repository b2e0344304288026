//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`UserRepository`], [`RecordStore`], [`CredentialHasher`],
//! [`TokenService`]) are implemented by outbound adapters. Driving ports
//! ([`LoginService`], [`IdentityResolver`], [`UserAccounts`],
//! [`ClinicalRecords`]) are implemented by domain services and called by
//! inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod clinical_records;
mod credential_hasher;
mod login_service;
mod record_store;
mod store_error;
mod token_service;
mod user_accounts;
mod user_repository;

pub use clinical_records::ClinicalRecords;
#[cfg(test)]
pub use clinical_records::MockClinicalRecords;
pub use credential_hasher::{CredentialError, CredentialHasher};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use login_service::{IdentityResolver, LoginService};
#[cfg(test)]
pub use login_service::{MockIdentityResolver, MockLoginService};
#[cfg(test)]
pub use record_store::MockRecordStore;
pub use record_store::{Deletion, Insertion, RecordStore, Revision};
pub use store_error::StoreError;
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::UserAccounts;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserInsert, UserRepository, UserUpdate};
