#![forbid(unsafe_code)]
//! idmint-store: durable counter storage and the batch allocator.
//!
//! The only persisted state is one row holding the high-water identifier.
//! `CounterStore` is the seam to the transactional store; `SqliteStore` is the
//! durable backend and `MemoryStore` backs tests. `Allocator` runs the
//! read-advance-write protocol against either, and `global` holds the lazily
//! opened process-wide allocator behind `generate`/`generate_bulk`.

pub mod allocator;
pub mod counter;
pub mod global;
pub mod memory;
pub mod sqlite;

pub use allocator::Allocator;
pub use counter::CounterStore;
pub use global::{default_allocator, generate, generate_bulk};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
