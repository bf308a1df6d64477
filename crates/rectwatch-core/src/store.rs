use std::sync::Mutex;

use crate::Rectangle;
use crate::error::{Error, Result};

/// Persistence for matched rectangles.
///
/// Each platform crate (e.g. `rectwatch-server`) provides its own
/// implementation. Stores are shared across request threads, so they must
/// be safe to call concurrently.
pub trait RectangleStore: Send + Sync {
    /// Stores a batch as a whole: either every rectangle is persisted or
    /// none is and an error is returned.
    fn store(&self, rectangles: &[Rectangle]) -> Result<()>;

    /// Returns every stored rectangle in insertion order.
    fn list_all(&self) -> Result<Vec<Rectangle>>;
}

/// A store that keeps rectangles in memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Rectangle>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RectangleStore for MemoryStore {
    fn store(&self, rectangles: &[Rectangle]) -> Result<()> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|e| Error::storage(format!("memory store lock poisoned: {e}")))?;
        rows.extend_from_slice(rectangles);
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<Rectangle>> {
        let rows = self
            .rows
            .lock()
            .map_err(|e| Error::storage(format!("memory store lock poisoned: {e}")))?;
        Ok(rows.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_batches_in_insertion_order() {
        // Arrange
        let store = MemoryStore::new();
        let first = vec![Rectangle::new(1, 1, 1, 1).observed("a")];
        let second = vec![
            Rectangle::new(2, 2, 2, 2).observed("b"),
            Rectangle::new(3, 3, 3, 3).observed("c"),
        ];

        // Act
        store.store(&first).unwrap();
        store.store(&second).unwrap();
        let rows = store.list_all().unwrap();

        // Assert
        let xs: Vec<i32> = rows.iter().map(|r| r.x).collect();
        assert_eq!(xs, vec![1, 2, 3]);
        assert_eq!(rows[2].observed_at.as_deref(), Some("c"));
    }

    #[test]
    fn empty_store_lists_nothing() {
        assert!(MemoryStore::new().list_all().unwrap().is_empty());
    }
}
