//! Request middleware.
//!
//! Purpose: attach a per-request trace identifier that logs and error
//! payloads share.

pub mod trace;

pub use trace::Trace;
