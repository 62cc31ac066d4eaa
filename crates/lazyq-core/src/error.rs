use thiserror::Error;

/// Canonical result for every lazyq crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Argument is null: {0}")]
    ArgumentNull(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{}", if *predicate { "No element satisfies the condition" } else { "The source sequence is empty" })]
    EmptySequence { predicate: bool },

    #[error("{}", if *predicate { "More than one element satisfies the condition" } else { "The input sequence contains more than one element" })]
    MultipleElements { predicate: bool },

    #[error("Index out of range: {index} (length {len})")]
    IndexOutOfRange { index: i64, len: usize },

    // Raised when a lookup/group-join selector returns something that cannot
    // address an ordered map (lists, maps).
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid sort key: {0}")]
    InvalidSortKey(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidArgument(e.to_string())
    }
}
