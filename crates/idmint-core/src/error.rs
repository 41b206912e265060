use thiserror::Error;

/// Canonical result for idmint.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Rejected before any I/O (e.g. a batch of zero identifiers).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The batch, or the high-water mark it would produce, does not fit in the
    /// fixed-width address space. Retrying with the same size fails the same way.
    #[error("space limit reached: requested {requested} identifiers, {remaining} remaining")]
    SpaceExhausted { requested: u64, remaining: u64 },

    /// A decoded string contained a character outside the alphabet. When the
    /// string came from the store this means the counter row is corrupt.
    #[error("invalid character {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },

    #[error("invalid identifier length: expected {expected} characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),

    // Backends map their native errors (SQLite, I/O, lock poisoning) into this
    // variant with a short context prefix. Nothing was committed.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl Error {
    /// True for failures where the caller may retry the whole call.
    ///
    /// Only store failures qualify: an aborted transaction persisted nothing,
    /// so a retry allocates a fresh, disjoint batch.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::StoreUnavailable(_))
    }
}
