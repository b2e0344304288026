//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use chrono::Duration;

use crate::domain::ports::{
    ClinicalRecords, CredentialHasher, IdentityResolver, LoginService, RecordStore,
    TokenService, UserAccounts, UserRepository,
};
use crate::domain::{AuthService, ClinicalRecordService, UserAccountService};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Exchanges credentials for a bearer token.
    pub login: Arc<dyn LoginService>,
    /// Turns a bearer token back into a principal.
    pub identity: Arc<dyn IdentityResolver>,
    /// Signup, profile, and password management.
    pub accounts: Arc<dyn UserAccounts>,
    /// Guarded record mutations.
    pub records: Arc<dyn ClinicalRecords>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Exchanges credentials for a bearer token.
    pub login: Arc<dyn LoginService>,
    /// Turns a bearer token back into a principal.
    pub identity: Arc<dyn IdentityResolver>,
    /// Signup, profile, and password management.
    pub accounts: Arc<dyn UserAccounts>,
    /// Guarded record mutations.
    pub records: Arc<dyn ClinicalRecords>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            identity,
            accounts,
            records,
        } = ports;
        Self {
            login,
            identity,
            accounts,
            records,
        }
    }

    /// Wire the domain services over concrete outbound adapters.
    ///
    /// `token_ttl` overrides the token adapter's default lifetime when set.
    pub fn from_adapters<U, R, H, T>(
        users: Arc<U>,
        records: Arc<R>,
        hasher: Arc<H>,
        tokens: Arc<T>,
        token_ttl: Option<Duration>,
    ) -> Self
    where
        U: UserRepository + 'static,
        R: RecordStore + 'static,
        H: CredentialHasher + 'static,
        T: TokenService + 'static,
    {
        let auth = Arc::new(AuthService::new(
            Arc::clone(&users),
            Arc::clone(&hasher),
            tokens,
            token_ttl,
        ));
        Self::new(HttpStatePorts {
            login: auth.clone(),
            identity: auth,
            accounts: Arc::new(UserAccountService::new(users, Arc::clone(&records), hasher)),
            records: Arc::new(ClinicalRecordService::new(records)),
        })
    }
}
