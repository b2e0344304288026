//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the [`UserRepository`] and [`RecordStore`]
//! ports backed by PostgreSQL through `diesel-async` and `bb8` pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories translate between Diesel rows and
//!   domain types. Access rules and validation live in the domain.
//! - **Internal models**: row structs (`models.rs`), schema definitions
//!   (`schema.rs`), and per-table queries (`record_queries.rs`) never leave
//!   this module.
//! - **Locking over read-then-write**: integrity checks take row locks in
//!   the transaction that performs the write.
//! - **Strongly typed errors**: driver failures are mapped to
//!   [`StoreError`] before they cross the port.
//!
//! # Example
//!
//! ```ignore
//! use clinic_backend::outbound::persistence::{DbPool, DieselRecordStore, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/clinic")).await?;
//! let records = DieselRecordStore::new(pool);
//! ```
//!
//! [`UserRepository`]: crate::domain::ports::UserRepository
//! [`RecordStore`]: crate::domain::ports::RecordStore
//! [`StoreError`]: crate::domain::ports::StoreError

mod diesel_record_store;
mod diesel_user_repository;
mod error_mapping;
mod models;
mod pool;
mod record_queries;
mod schema;

pub use diesel_record_store::DieselRecordStore;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError, run_migrations};
