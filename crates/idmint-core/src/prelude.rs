//! Convenient re-exports for downstream crates.

pub use crate::alphabet::{Alphabet, DEFAULT_ALPHABET};
pub use crate::codec::{Codec, DEFAULT_WIDTH};
pub use crate::config::{AllocatorConfig, Synchronous};
pub use crate::error::{Error, Result};
pub use crate::id::{Identifier, Ordinal};
