//! In-memory counter store for testing.
//!
//! Clones share the same row, so dropping an `Allocator` and building a new
//! one over a clone behaves like a process restart against the same store.

use std::sync::{Arc, Mutex, MutexGuard};

use idmint_core::error::{Error, Result};

use crate::counter::CounterStore;

#[derive(Clone, Default)]
pub struct MemoryStore {
    row: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the high-water code (used by tests).
    pub fn with_high_water(code: impl Into<String>) -> Self {
        Self {
            row: Arc::new(Mutex::new(Some(code.into()))),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<String>>> {
        self.row
            .lock()
            .map_err(|_| Error::StoreUnavailable("memory store mutex poisoned".into()))
    }
}

impl CounterStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.lock()?.clone())
    }

    fn advance(&self, step: &mut dyn FnMut(Option<&str>) -> Result<String>) -> Result<String> {
        let mut row = self.lock()?;
        let next = step(row.as_deref())?;
        *row = Some(next.clone());
        Ok(next)
    }
}
