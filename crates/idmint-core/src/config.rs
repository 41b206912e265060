//! Allocator configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::alphabet::DEFAULT_ALPHABET;
use crate::codec::{Codec, DEFAULT_WIDTH};
use crate::error::Result;

/// Store durability level (maps to SQLite `PRAGMA synchronous`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Synchronous {
    /// Survives an abrupt process kill in WAL mode; may lose the last commit on
    /// power loss.
    #[default]
    Normal,
    /// Also survives power loss, at the cost of an fsync per commit.
    Full,
}

impl Synchronous {
    pub fn as_pragma(self) -> &'static str {
        match self {
            Synchronous::Normal => "NORMAL",
            Synchronous::Full => "FULL",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(Synchronous::Normal),
            "full" => Some(Synchronous::Full),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatorConfig {
    /// Path of the database file holding the counter row. Parent directories
    /// are created on open.
    pub db_path: String,

    /// How long a caller waits for another writer's lock before failing with
    /// `StoreUnavailable`.
    pub busy_timeout_ms: u64,

    pub synchronous: Synchronous,

    /// Digit alphabet. Must never change for an existing store.
    pub alphabet: String,

    /// Identifier width. Must never change for an existing store.
    pub width: usize,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            db_path: "identity.db".to_string(),
            busy_timeout_ms: 5_000,
            synchronous: Synchronous::Normal,
            alphabet: DEFAULT_ALPHABET.to_string(),
            width: DEFAULT_WIDTH,
        }
    }
}

impl AllocatorConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `IDMINT_DB_PATH`: database file path
    /// - `IDMINT_BUSY_TIMEOUT_MS`: lock wait in milliseconds
    /// - `IDMINT_SYNCHRONOUS`: `normal` or `full`
    ///
    /// The alphabet and width always come from the defaults: a stored
    /// high-water mark only decodes correctly under the codec that wrote it.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(s) = get("IDMINT_DB_PATH") {
            if !s.trim().is_empty() {
                cfg.db_path = s;
            }
        }

        if let Some(s) = get("IDMINT_BUSY_TIMEOUT_MS") {
            if let Ok(v) = s.trim().parse::<u64>() {
                cfg.busy_timeout_ms = v;
            }
        }

        if let Some(s) = get("IDMINT_SYNCHRONOUS") {
            if let Some(v) = Synchronous::parse(&s) {
                cfg.synchronous = v;
            }
        }

        cfg
    }

    /// Same config pointed at another database file.
    pub fn with_db_path(mut self, path: impl Into<String>) -> Self {
        self.db_path = path.into();
        self
    }

    /// Build the codec described by `alphabet` and `width`.
    pub fn codec(&self) -> Result<Codec> {
        Codec::new(&self.alphabet, self.width)
    }
}
