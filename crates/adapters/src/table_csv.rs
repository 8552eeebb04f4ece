//! CSV-backed table store

use async_trait::async_trait;
use csv::{ReaderBuilder, WriterBuilder};
use product_classifier_domain::{DataError, Table, TableStore};
use std::fs::File;
use std::path::Path;
use tempfile::NamedTempFile;

/// Reads and writes tables as comma-separated files with a header row
pub struct CsvTableStore {
    delimiter: u8,
}

impl Default for CsvTableStore {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn parse_error(path: &Path, message: String) -> DataError {
        DataError::Parse {
            path: path.to_path_buf(),
            message,
        }
    }

    fn write_error(path: &Path, e: impl std::fmt::Display) -> DataError {
        DataError::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl TableStore for CsvTableStore {
    async fn read_table(&self, path: &Path) -> Result<Table, DataError> {
        let file = File::open(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| Self::parse_error(path, format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        if headers.is_empty() {
            return Err(Self::parse_error(path, "File has no header row".to_string()));
        }

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                Self::parse_error(path, format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;

            if record.len() > headers.len() {
                return Err(Self::parse_error(
                    path,
                    format!(
                        "Row {} has {} fields but the header has {}",
                        index + 1,
                        record.len(),
                        headers.len()
                    ),
                ));
            }

            rows.push(record.iter().map(str::to_string).collect());
        }

        tracing::debug!(
            path = %path.display(),
            columns = headers.len(),
            rows = rows.len(),
            "Read CSV table"
        );

        Ok(Table::new(headers, rows))
    }

    /// Writes to a sibling temp file, then renames it over `path`
    async fn write_table(&self, path: &Path, table: &Table) -> Result<(), DataError> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut staged = NamedTempFile::new_in(dir).map_err(|e| Self::write_error(path, e))?;

        {
            let mut writer = WriterBuilder::new()
                .delimiter(self.delimiter)
                .from_writer(staged.as_file_mut());

            writer
                .write_record(table.headers())
                .map_err(|e| Self::write_error(path, e))?;

            for row in table.rows() {
                writer
                    .write_record(row)
                    .map_err(|e| Self::write_error(path, e))?;
            }

            writer.flush().map_err(|e| Self::write_error(path, e))?;
        }

        staged
            .persist(path)
            .map_err(|e| Self::write_error(path, e.error))?;

        tracing::debug!(path = %path.display(), rows = table.len(), "Wrote CSV table");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_dir() -> TempDir {
        TempDir::new().unwrap()
    }

    #[tokio::test]
    async fn test_read_table() {
        let dir = setup_test_dir();
        let path = dir.path().join("products.csv");
        std::fs::write(
            &path,
            "product_id,description,price\n1,\"A phone, with a case\",10\n2,A shirt,5\n",
        )
        .unwrap();

        let table = CsvTableStore::new().read_table(&path).await.unwrap();

        assert_eq!(table.headers(), ["product_id", "description", "price"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 1), Some("A phone, with a case"));
    }

    #[tokio::test]
    async fn test_short_rows_are_padded() {
        let dir = setup_test_dir();
        let path = dir.path().join("products.csv");
        std::fs::write(&path, "product_id,description,price\n1,A phone\n").unwrap();

        let table = CsvTableStore::new().read_table(&path).await.unwrap();

        assert_eq!(table.rows()[0], vec!["1", "A phone", ""]);
    }

    #[tokio::test]
    async fn test_long_rows_are_rejected() {
        let dir = setup_test_dir();
        let path = dir.path().join("products.csv");
        std::fs::write(&path, "product_id,description\n1,A phone,extra\n").unwrap();

        let result = CsvTableStore::new().read_table(&path).await;

        assert!(matches!(result, Err(DataError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = setup_test_dir();
        let path = dir.path().join("missing.csv");

        let result = CsvTableStore::new().read_table(&path).await;

        match result {
            Err(DataError::Io { path: p, source }) => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_write_then_read_preserves_cells() {
        let dir = setup_test_dir();
        let path = dir.path().join("out.csv");
        let table = Table::new(
            vec!["product_id".to_string(), "description".to_string()],
            vec![vec!["1".to_string(), "Quote \" and, comma\nnewline".to_string()]],
        );

        let store = CsvTableStore::new();
        store.write_table(&path, &table).await.unwrap();
        let read_back = store.read_table(&path).await.unwrap();

        assert_eq!(read_back, table);
    }

    #[tokio::test]
    async fn test_write_overwrites_existing_file() {
        let dir = setup_test_dir();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "old,content\n1,2\n3,4\n").unwrap();

        let table = Table::new(vec!["a".to_string()], vec![vec!["x".to_string()]]);
        CsvTableStore::new().write_table(&path, &table).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nx\n");
    }

    #[tokio::test]
    async fn test_write_to_missing_directory() {
        let dir = setup_test_dir();
        let path = dir.path().join("nope").join("out.csv");
        let table = Table::new(vec!["a".to_string()], vec![]);

        let result = CsvTableStore::new().write_table(&path, &table).await;

        assert!(matches!(result, Err(DataError::Write { .. })));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_partial_file() {
        let dir = setup_test_dir();
        // A non-empty directory at the target path makes the final rename fail
        let path = dir.path().join("out.csv");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep.txt"), "keep").unwrap();
        let table = Table::new(vec!["a".to_string()], vec![vec!["x".to_string()]]);

        let result = CsvTableStore::new().write_table(&path, &table).await;

        assert!(matches!(result, Err(DataError::Write { .. })));
        assert!(path.is_dir());
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("out.csv")]);
    }

    #[tokio::test]
    async fn test_write_relative_path_in_current_dir() {
        let path = Path::new("target-relative-write-test.csv");
        let table = Table::new(vec!["a".to_string()], vec![vec!["x".to_string()]]);

        CsvTableStore::new().write_table(path, &table).await.unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        std::fs::remove_file(path).unwrap();

        assert_eq!(content, "a\nx\n");
    }

    #[tokio::test]
    async fn test_custom_delimiter() {
        let dir = setup_test_dir();
        let path = dir.path().join("categories.tsv");
        std::fs::write(&path, "category\tnotes\nToys\tfun\n").unwrap();

        let table = CsvTableStore::new()
            .with_delimiter(b'\t')
            .read_table(&path)
            .await
            .unwrap();

        assert_eq!(table.column("category"), Some(vec!["Toys"]));
    }
}
