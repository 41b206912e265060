#![forbid(unsafe_code)]
//! idmint: globally unique, monotonically increasing fixed-width identifiers.
//!
//! ```no_run
//! let id = idmint::generate()?;
//! let batch = idmint::generate_bulk(100)?;
//! assert!(batch[0] > id);
//! # Ok::<(), idmint::Error>(())
//! ```
//!
//! The free functions use a process-wide allocator configured from the
//! environment (`IDMINT_DB_PATH` and friends). Build an [`Allocator`] directly
//! to pick the store and codec yourself.

pub use idmint_core::prelude::*;
pub use idmint_store::{
    default_allocator, generate, generate_bulk, Allocator, CounterStore, MemoryStore, SqliteStore,
};
