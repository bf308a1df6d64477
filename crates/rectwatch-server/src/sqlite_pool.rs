//! Round-robin pool of read connections (WAL keeps them off the writer's lock).

use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rectwatch_core::{Error, Result};
use rusqlite::{Connection, OpenFlags};

/// Maximum number of read connections.
const MAX_POOL_SIZE: usize = 8;

/// A pool of SQLite connections that refuse writes.
pub(crate) struct ReadPool {
    connections: Vec<Mutex<Connection>>,
    next: AtomicUsize,
}

impl ReadPool {
    /// Opens `pool_size` query-only connections to the database at `path`.
    pub(crate) fn open(path: &Path, pool_size: usize, busy_timeout: Duration) -> Result<Self> {
        let size = pool_size.clamp(1, MAX_POOL_SIZE);
        let mut connections = Vec::with_capacity(size);
        for _ in 0..size {
            let conn = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(Error::storage)?;
            conn.busy_timeout(busy_timeout).map_err(Error::storage)?;
            conn.pragma_update(None, "query_only", true).map_err(Error::storage)?;
            connections.push(Mutex::new(conn));
        }
        Ok(Self {
            connections,
            next: AtomicUsize::new(0),
        })
    }

    /// Runs `f` with the next connection in round-robin order.
    pub(crate) fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.connections.len();
        let guard = self.connections[idx]
            .lock()
            .map_err(|e| Error::storage(format!("read pool lock poisoned: {e}")))?;
        f(&guard)
    }

    pub(crate) fn size(&self) -> usize {
        self.connections.len()
    }
}
