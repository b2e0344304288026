//! Role-gated clinical record backend.
//!
//! The crate is split along hexagonal lines: [`domain`] holds the types,
//! authorization table, and services; [`inbound`] adapts HTTP onto them;
//! [`outbound`] provides storage and credential adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
