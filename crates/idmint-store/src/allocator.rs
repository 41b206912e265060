//! Batch allocator over a `CounterStore`.
//!
//! Each call advances the persisted high-water mark exactly once, inside one
//! store transaction, and only then materializes the batch. Batches are
//! issued back to back: the union of everything returned is always the
//! contiguous prefix `[0, high-water]` of the ordinal space.

use idmint_core::codec::Codec;
use idmint_core::config::AllocatorConfig;
use idmint_core::error::{Error, Result};
use idmint_core::id::{Identifier, Ordinal};

use crate::counter::CounterStore;
use crate::sqlite::SqliteStore;

pub struct Allocator {
    store: Box<dyn CounterStore>,
    codec: Codec,
}

impl Allocator {
    pub fn new(store: impl CounterStore + 'static, codec: Codec) -> Self {
        Self {
            store: Box::new(store),
            codec,
        }
    }

    /// Open the SQLite store and codec described by `config`.
    pub fn open(config: &AllocatorConfig) -> Result<Self> {
        let codec = config.codec()?;
        let store = SqliteStore::open(config)?;
        Ok(Self::new(store, codec))
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Allocate `n` never-issued identifiers in ascending order.
    ///
    /// # Errors
    /// - `InvalidRequest` if `n == 0`.
    /// - `SpaceExhausted` if `n` exceeds the whole address space (checked
    ///   before touching the store), or if the batch would run past the last
    ///   ordinal (the stored row is left untouched).
    /// - `InvalidCharacter`/`InvalidLength` if the stored row is corrupt.
    /// - `StoreUnavailable` if the transaction cannot be opened or committed.
    pub fn allocate(&self, n: usize) -> Result<Vec<Identifier>> {
        if n == 0 {
            return Err(Error::InvalidRequest(
                "batch size must be at least 1".into(),
            ));
        }
        let requested = u64::try_from(n).unwrap_or(u64::MAX);
        let space = self.codec.space();
        if requested > space {
            return Err(Error::SpaceExhausted {
                requested,
                remaining: space,
            });
        }

        let mut first = Ordinal::ZERO;
        self.store.advance(&mut |current| {
            let start = match current {
                None => 0,
                Some(code) => self.codec.decode(code)?.get() + 1,
            };
            let remaining = space - start;
            if requested > remaining {
                return Err(Error::SpaceExhausted {
                    requested,
                    remaining,
                });
            }
            first = Ordinal::new(start);
            let high_water = Ordinal::new(start + requested - 1);
            Ok(self.codec.encode(high_water).into_string())
        })?;

        let last = Ordinal::new(first.get() + requested - 1);

        #[cfg(feature = "tracing")]
        tracing::trace!(first = first.get(), last = last.get(), n, "allocated batch");

        Ok(self.codec.encode_range(first, last))
    }

    /// Allocate a single identifier; same as `allocate(1)`.
    pub fn generate(&self) -> Result<Identifier> {
        let mut batch = self.allocate(1)?;
        Ok(batch.remove(0))
    }

    /// Allocate `n` identifiers; same as `allocate(n)`.
    pub fn generate_bulk(&self, n: usize) -> Result<Vec<Identifier>> {
        self.allocate(n)
    }

    /// The last identifier issued, validated against the codec.
    pub fn high_water(&self) -> Result<Option<Identifier>> {
        self.store
            .load()?
            .map(|code| self.codec.parse(&code))
            .transpose()
    }

    /// How many identifiers can still be issued.
    pub fn remaining(&self) -> Result<u64> {
        let space = self.codec.space();
        match self.high_water()? {
            None => Ok(space),
            Some(id) => Ok(space - self.codec.decode(id.as_str())?.get() - 1),
        }
    }
}
