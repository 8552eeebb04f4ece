//! Domain models and value objects

use std::path::PathBuf;

/// Ordered list of candidate categories
///
/// Uniqueness is not enforced and order only matters for how the list is
/// shown to the model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryList(Vec<String>);

impl CategoryList {
    pub fn new(categories: Vec<String>) -> Self {
        Self(categories)
    }

    /// Categories joined with `", "`, as substituted into the prompt
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for CategoryList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<String>> for CategoryList {
    fn from(categories: Vec<String>) -> Self {
        Self(categories)
    }
}

/// A header row plus string cells, as read from a delimited file
///
/// Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, padding or truncating rows to the header width
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column with the given name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// All cells of a column in row order
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Cell at `row`/`col`, if both are in range
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Make sure a column exists and every cell in it is empty
    ///
    /// A new column is appended after the existing ones. An existing column
    /// keeps its position and is cleared.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        match self.column_index(name) {
            Some(idx) => {
                for row in &mut self.rows {
                    row[idx].clear();
                }
                idx
            }
            None => {
                self.headers.push(name.to_string());
                for row in &mut self.rows {
                    row.push(String::new());
                }
                self.headers.len() - 1
            }
        }
    }

    /// Overwrite a single cell. Returns false when out of range.
    pub fn set(&mut self, row: usize, col: usize, value: impl Into<String>) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = value.into();
                true
            }
            None => false,
        }
    }
}

/// Outcome of a completed pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Number of product rows classified
    pub rows: usize,
    /// Number of candidate categories offered to the model
    pub categories: usize,
    /// Where the enriched table was written
    pub output_path: PathBuf,
}
