//! SQLite-backed counter store.
//!
//! Layout: one table with a primary key pinned to `0`, so the schema itself
//! rejects a second row. The code column is checked against the configured
//! identifier width.
//!
//! ```text
//! id_counter(slot INTEGER PRIMARY KEY CHECK (slot = 0),
//!            code TEXT NOT NULL CHECK (length(code) = <width>))
//! ```

use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use idmint_core::config::AllocatorConfig;
use idmint_core::error::{Error, Result};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::counter::CounterStore;

const SELECT_CODE: &str = "SELECT code FROM id_counter WHERE slot = 0";
const INSERT_CODE: &str = "INSERT INTO id_counter (slot, code) VALUES (0, ?1)";
const UPDATE_CODE: &str = "UPDATE id_counter SET code = ?1 WHERE slot = 0 AND code = ?2";

fn unavailable<E: Display>(ctx: &'static str) -> impl FnOnce(E) -> Error {
    move |e| Error::StoreUnavailable(format!("{ctx}: {e}"))
}

/// Durable store over a single SQLite connection.
///
/// The connection sits behind a mutex so one handle can serve many threads.
/// Separate handles and separate processes on the same file serialize through
/// SQLite's own write lock (`BEGIN IMMEDIATE`).
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: String,
}

impl SqliteStore {
    /// Open (creating if absent) the database at `config.db_path`.
    ///
    /// Creates parent directories, applies the connection pragmas, and creates
    /// the table if needed. Safe to call repeatedly and from concurrent
    /// processes.
    pub fn open(config: &AllocatorConfig) -> Result<Self> {
        let path = Path::new(&config.db_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(unavailable("mkparent"))?;
            }
        }

        let conn = Connection::open(path).map_err(unavailable("open"))?;
        bootstrap(&conn, config)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(path = %config.db_path, "opened counter store");

        Ok(Self {
            conn: Mutex::new(conn),
            path: config.db_path.clone(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::StoreUnavailable("connection mutex poisoned".into()))
    }
}

/// Pragmas and schema. Every statement here is idempotent.
fn bootstrap(conn: &Connection, config: &AllocatorConfig) -> Result<()> {
    // Set first so the remaining statements wait out concurrent openers.
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(unavailable("busy_timeout"))?;

    // Readers are not blocked while one writer is active.
    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
        .map_err(unavailable("journal_mode"))?;
    conn.pragma_update(None, "synchronous", config.synchronous.as_pragma())
        .map_err(unavailable("synchronous"))?;

    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS id_counter (
            slot INTEGER PRIMARY KEY CHECK (slot = 0),
            code TEXT NOT NULL CHECK (length(code) = {})
        );",
        config.width
    ))
    .map_err(unavailable("create schema"))?;

    #[cfg(feature = "tracing")]
    tracing::debug!(journal_mode = %mode, synchronous = config.synchronous.as_pragma(), "counter schema ready");
    #[cfg(not(feature = "tracing"))]
    let _ = mode;

    Ok(())
}

impl CounterStore for SqliteStore {
    fn load(&self) -> Result<Option<String>> {
        let conn = self.lock()?;
        conn.query_row(SELECT_CODE, [], |row| row.get(0))
            .optional()
            .map_err(unavailable("read counter"))
    }

    fn advance(&self, step: &mut dyn FnMut(Option<&str>) -> Result<String>) -> Result<String> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(unavailable("begin"))?;

        let current: Option<String> = tx
            .query_row(SELECT_CODE, [], |row| row.get(0))
            .optional()
            .map_err(unavailable("read counter"))?;

        // Dropping `tx` on any early return rolls the transaction back.
        let next = match step(current.as_deref()) {
            Ok(next) => next,
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %e, "counter advance aborted, rolling back");
                return Err(e);
            }
        };

        match current.as_deref() {
            None => {
                tx.execute(INSERT_CODE, params![next])
                    .map_err(unavailable("insert counter"))?;
            }
            Some(old) => {
                let changed = tx
                    .execute(UPDATE_CODE, params![next, old])
                    .map_err(unavailable("update counter"))?;
                if changed != 1 {
                    return Err(Error::StoreUnavailable(format!(
                        "counter row changed during transaction (expected {old})"
                    )));
                }
            }
        }

        tx.commit().map_err(unavailable("commit"))?;
        Ok(next)
    }
}
