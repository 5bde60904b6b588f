use std::error::Error as StdError;

/// A specialized `Result` type for this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Convenience alias for a boxed dynamic error.
pub type BoxDynError = Box<dyn StdError + Send + Sync + 'static>;

/// Represents all the ways a method can fail in this crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Error occurred while parsing a connection string or while
    /// assembling a client configuration.
    #[error("error with configuration: {0}")]
    Configuration(#[source] BoxDynError),

    /// The executor's underlying connection is not of the vendor type
    /// expected by the client.
    ///
    /// This can only happen when a client is built over an executor that
    /// was itself built over a foreign connection; it surfaces at the
    /// point of typed access, not at construction.
    #[error("expected a connection of type `{expected}`, found `{actual}`")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

impl Error {
    pub(crate) fn config(err: impl StdError + Send + Sync + 'static) -> Self {
        Error::Configuration(err.into())
    }
}
