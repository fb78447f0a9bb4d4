//! Shared error definitions for Strata core types.

/// The result type used throughout strata-core.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in core partition operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An identifier string failed to parse.
    #[error("invalid identifier: {message}")]
    InvalidId {
        /// Description of the parse failure.
        message: String,
    },

    /// A partition catalog was constructed with a duplicate key.
    #[error("duplicate partition key in catalog: {key}")]
    DuplicatePartitionKey {
        /// The offending key.
        key: String,
    },

    /// A partition key was not found in the catalog.
    #[error("partition key not in catalog: {key}")]
    UnknownPartitionKey {
        /// The key that was not found.
        key: String,
    },
}
