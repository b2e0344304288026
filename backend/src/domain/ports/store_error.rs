//! Failure type shared by the driven storage ports.

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by storage adapters.
    pub enum StoreError {
        /// The store could not be reached or a connection could not be checked out.
        Connection { message: String } => "store connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } => "store query failed: {message}",
    }
}

impl From<StoreError> for crate::domain::Error {
    fn from(error: StoreError) -> Self {
        tracing::error!(error = %error, "storage operation failed");
        match error {
            StoreError::Connection { message } => {
                Self::service_unavailable(format!("store unavailable: {message}"))
            }
            StoreError::Query { message } => Self::internal(format!("store error: {message}")),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the domain mapping of storage failures.
    use super::*;
    use crate::domain::{Error, ErrorCode};
    use rstest::rstest;

    #[rstest]
    #[case(StoreError::connection("pool timed out"), ErrorCode::ServiceUnavailable)]
    #[case(StoreError::query("syntax error"), ErrorCode::InternalError)]
    fn maps_to_domain_codes(#[case] error: StoreError, #[case] expected: ErrorCode) {
        assert_eq!(Error::from(error).code(), expected);
    }
}
