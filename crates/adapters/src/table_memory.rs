//! In-memory table store for testing and dry runs

use async_trait::async_trait;
use product_classifier_domain::{DataError, Table, TableStore};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// In-memory table store keyed by path
pub struct InMemoryTableStore {
    tables: RwLock<HashMap<PathBuf, Table>>,
}

impl InMemoryTableStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Seed a table at `path`
    pub fn insert(&self, path: impl Into<PathBuf>, table: Table) {
        if let Ok(mut tables) = self.tables.write() {
            tables.insert(path.into(), table);
        }
    }

    /// Table stored at `path`, if any
    pub fn get(&self, path: impl AsRef<Path>) -> Option<Table> {
        self.tables
            .read()
            .ok()
            .and_then(|tables| tables.get(path.as_ref()).cloned())
    }
}

impl Default for InMemoryTableStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TableStore for InMemoryTableStore {
    async fn read_table(&self, path: &Path) -> Result<Table, DataError> {
        let tables = self.tables.read().map_err(|e| DataError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        tables.get(path).cloned().ok_or_else(|| DataError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such table"),
        })
    }

    async fn write_table(&self, path: &Path, table: &Table) -> Result<(), DataError> {
        let mut tables = self.tables.write().map_err(|e| DataError::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tables.insert(path.to_path_buf(), table.clone());
        Ok(())
    }
}
