//! Builders for HTTP state over the configured storage backend.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use clinic_backend::inbound::http::state::HttpState;
use clinic_backend::outbound::memory::MemoryStore;
use clinic_backend::outbound::persistence::{DieselRecordStore, DieselUserRepository};
use clinic_backend::outbound::security::{Argon2Hasher, JwtTokenService};

use super::ServerConfig;

/// Wire the domain services over PostgreSQL when a pool is configured,
/// otherwise over a process-local in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock + Send + Sync> = Arc::new(DefaultClock);
    let hasher = Arc::new(Argon2Hasher::default());
    let tokens = Arc::new(JwtTokenService::new(&config.token_secret, clock.clone()));
    let ttl = Some(config.token_ttl);

    let state = match &config.db_pool {
        Some(pool) => {
            tracing::info!("serving from PostgreSQL");
            HttpState::from_adapters(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselRecordStore::new(pool.clone())),
                hasher,
                tokens,
                ttl,
            )
        }
        None => {
            tracing::warn!("no database configured; data lives only as long as the process");
            let store = Arc::new(MemoryStore::new(clock));
            HttpState::from_adapters(store.clone(), store, hasher, tokens, ttl)
        }
    };
    web::Data::new(state)
}
