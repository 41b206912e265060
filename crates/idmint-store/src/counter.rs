//! Storage seam for the single persisted counter row.

use idmint_core::error::Result;

/// Opaque transactional store holding at most one row: the high-water code.
///
/// Implemented by `SqliteStore` for durable use and `MemoryStore` for tests.
pub trait CounterStore: Send + Sync {
    /// Read the stored code, `None` before the first allocation.
    fn load(&self) -> Result<Option<String>>;

    /// Atomically replace the stored code.
    ///
    /// Opens an exclusive transaction, hands the current code (or `None`) to
    /// `step`, writes the code `step` returns as the only row, and commits. No
    /// other `advance` on the same store can observe the row between the read
    /// and the commit. If `step` fails, nothing is written and its error is
    /// returned unchanged.
    fn advance(&self, step: &mut dyn FnMut(Option<&str>) -> Result<String>) -> Result<String>;
}
