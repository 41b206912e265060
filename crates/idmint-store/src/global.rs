//! Process-wide default allocator.
//!
//! Opened on first use from `AllocatorConfig::from_env()` and kept for the
//! life of the process. The cell serializes initialization, so concurrent
//! first callers open the store once. A failed open is not cached; the next
//! call tries again.

use idmint_core::config::AllocatorConfig;
use idmint_core::error::Result;
use idmint_core::id::Identifier;
use once_cell::sync::OnceCell;

use crate::allocator::Allocator;

static DEFAULT: OnceCell<Allocator> = OnceCell::new();

/// The shared allocator, opening it if this is the first call.
pub fn default_allocator() -> Result<&'static Allocator> {
    DEFAULT.get_or_try_init(|| {
        let config = AllocatorConfig::from_env();
        #[cfg(feature = "tracing")]
        tracing::debug!(path = %config.db_path, "initializing default allocator");
        Allocator::open(&config)
    })
}

/// Allocate one identifier from the default allocator.
pub fn generate() -> Result<Identifier> {
    default_allocator()?.generate()
}

/// Allocate `n` identifiers from the default allocator.
pub fn generate_bulk(n: usize) -> Result<Vec<Identifier>> {
    default_allocator()?.generate_bulk(n)
}
