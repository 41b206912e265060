#![forbid(unsafe_code)]
//! idmint-core: the pure half of the identifier allocator.
//!
//! Holds the alphabet and fixed-width base-N codec, the strongly typed
//! `Ordinal`/`Identifier` pair, the shared error taxonomy and the allocator
//! configuration. Nothing in here touches storage; `idmint-store` owns the
//! durable counter.

pub mod alphabet;
pub mod codec;
pub mod config;
pub mod error;
pub mod id;
pub mod prelude;

pub use alphabet::{Alphabet, DEFAULT_ALPHABET};
pub use codec::{Codec, DEFAULT_WIDTH};
pub use config::{AllocatorConfig, Synchronous};
pub use error::{Error, Result};
pub use id::{Identifier, Ordinal};
