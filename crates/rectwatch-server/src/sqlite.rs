//! SQLite-backed rectangle store.
//!
//! One write connection behind a mutex plus a small pool of read
//! connections. The database runs in WAL mode so listing never waits
//! on a batch insert.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use rectwatch_core::config::StorageConfig;
use rectwatch_core::{Error, Rectangle, RectangleStore, Result, log_debug};
use rusqlite::{Connection, params};

#[path = "sqlite_pool.rs"]
mod sqlite_pool;

use sqlite_pool::ReadPool;

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS rectangle (
        rectangle_id INTEGER PRIMARY KEY AUTOINCREMENT,
        x INTEGER NOT NULL,
        y INTEGER NOT NULL,
        width INTEGER NOT NULL,
        height INTEGER NOT NULL,
        time TEXT
    );
";

const INSERT_RECTANGLE: &str =
    "INSERT INTO rectangle (x, y, width, height, time) VALUES (?1, ?2, ?3, ?4, ?5)";

const SELECT_RECTANGLES: &str =
    "SELECT x, y, width, height, time FROM rectangle ORDER BY rectangle_id";

/// Persists matched rectangles in a SQLite database file.
pub struct SqliteStore {
    writer: Mutex<Connection>,
    readers: ReadPool,
    path: PathBuf,
}

impl SqliteStore {
    /// Opens the database named by the storage config.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        let path = config
            .database_path()
            .ok_or_else(|| Error::storage("could not determine database path"))?;
        Self::open_at(&path, config)
    }

    /// Opens (creating if needed) the database at `path`.
    pub fn open_at(path: &Path, config: &StorageConfig) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let busy_timeout = Duration::from_millis(config.busy_timeout_ms);

        let writer = Connection::open(path).map_err(Error::storage)?;
        writer.busy_timeout(busy_timeout).map_err(Error::storage)?;
        writer
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
            .map_err(Error::storage)?;
        writer.pragma_update(None, "synchronous", "NORMAL").map_err(Error::storage)?;
        writer.execute_batch(CREATE_TABLE).map_err(Error::storage)?;

        let readers = ReadPool::open(path, config.read_pool_size, busy_timeout)?;
        log_debug!(
            "opened {} with {} read connections",
            path.display(),
            readers.size()
        );

        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            path: path.to_path_buf(),
        })
    }

    /// The database file backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RectangleStore for SqliteStore {
    fn store(&self, rectangles: &[Rectangle]) -> Result<()> {
        if rectangles.is_empty() {
            return Ok(());
        }
        let mut conn = self
            .writer
            .lock()
            .map_err(|e| Error::storage(format!("writer lock poisoned: {e}")))?;
        let tx = conn.transaction().map_err(Error::storage)?;
        {
            let mut stmt = tx.prepare_cached(INSERT_RECTANGLE).map_err(Error::storage)?;
            for (row, rect) in rectangles.iter().enumerate() {
                stmt.execute(params![
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    rect.observed_at
                ])
                .map_err(|e| Error::PartialWriteFailure {
                    row,
                    total: rectangles.len(),
                    message: e.to_string(),
                })?;
            }
        }
        // Dropping an uncommitted transaction rolls the whole batch back.
        tx.commit().map_err(Error::storage)
    }

    fn list_all(&self) -> Result<Vec<Rectangle>> {
        self.readers
            .with_conn(|conn| select_rectangles(conn).map_err(Error::storage))
    }
}

fn select_rectangles(conn: &Connection) -> rusqlite::Result<Vec<Rectangle>> {
    let mut stmt = conn.prepare_cached(SELECT_RECTANGLES)?;
    let rows = stmt.query_map([], |row| {
        Ok(Rectangle {
            x: row.get(0)?,
            y: row.get(1)?,
            width: row.get(2)?,
            height: row.get(3)?,
            observed_at: row.get(4)?,
        })
    })?;
    rows.collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open_at(&dir.path().join("rects.db"), &StorageConfig::default())
            .unwrap();
        (dir, store)
    }

    #[test]
    fn stores_and_lists_all_fields_verbatim() {
        // Arrange
        let (_dir, store) = open_temp();
        let batch = vec![
            Rectangle::new(5, 5, 10, 10).observed("03-09-2024 12:00:00"),
            Rectangle::new(-3, 7, 1, 2).observed("03-09-2024 12:00:01"),
        ];

        // Act
        store.store(&batch).unwrap();
        let rows = store.list_all().unwrap();

        // Assert
        assert_eq!(rows, batch);
    }

    #[test]
    fn lists_across_batches_in_insertion_order() {
        // Arrange
        let (_dir, store) = open_temp();

        // Act
        store.store(&[Rectangle::new(1, 0, 1, 1).observed("a")]).unwrap();
        store
            .store(&[
                Rectangle::new(2, 0, 1, 1).observed("b"),
                Rectangle::new(3, 0, 1, 1).observed("c"),
            ])
            .unwrap();

        // Assert
        let xs: Vec<i32> = store.list_all().unwrap().iter().map(|r| r.x).collect();
        assert_eq!(xs, vec![1, 2, 3]);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let (_dir, store) = open_temp();

        store.store(&[]).unwrap();

        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn failed_batch_stores_nothing() {
        // Arrange
        let (_dir, store) = open_temp();
        store
            .writer
            .lock()
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER reject_negative BEFORE INSERT ON rectangle
                 WHEN NEW.x < 0 BEGIN SELECT RAISE(ABORT, 'negative x'); END;",
            )
            .unwrap();
        let batch = vec![
            Rectangle::new(1, 1, 1, 1).observed("a"),
            Rectangle::new(-1, 1, 1, 1).observed("b"),
            Rectangle::new(2, 2, 1, 1).observed("c"),
        ];

        // Act
        let err = store.store(&batch).unwrap_err();

        // Assert
        match err {
            Error::PartialWriteFailure { row, total, .. } => {
                assert_eq!(row, 1);
                assert_eq!(total, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn rows_survive_reopen() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("rects.db");
        let config = StorageConfig::default();
        SqliteStore::open_at(&path, &config)
            .unwrap()
            .store(&[Rectangle::new(4, 4, 4, 4).observed("x")])
            .unwrap();

        // Act
        let reopened = SqliteStore::open_at(&path, &config).unwrap();

        // Assert
        assert_eq!(reopened.list_all().unwrap().len(), 1);
        assert_eq!(reopened.path(), path.as_path());
    }

    #[test]
    fn concurrent_writers_all_land() {
        // Arrange
        let (_dir, store) = open_temp();
        let store = std::sync::Arc::new(store);

        // Act
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store
                        .store(&[Rectangle::new(i, i, 1, 1).observed("t")])
                        .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        // Assert
        assert_eq!(store.list_all().unwrap().len(), 8);
    }
}
