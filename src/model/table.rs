//! Table and Row data structures

use indexmap::{IndexMap, IndexSet};

/// One flattened record: column name to value, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: IndexMap<String, String>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. An existing value under the same name is overwritten.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Get a field value by column name
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Value for a column, empty when the row lacks it
    pub fn value_or_empty(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    /// Column names present in this row
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields in this row
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// Ordered rows plus the union of their columns in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: IndexSet<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a column ahead of any row carrying it.
    ///
    /// Used by layouts whose header is known up front, so columns keep their
    /// declared order even when early rows are sparse.
    pub fn declare_column(&mut self, name: impl Into<String>) {
        self.columns.insert(name.into());
    }

    /// Append a row, extending the column set with any unseen names
    pub fn push_row(&mut self, row: Row) {
        for column in row.columns() {
            if !self.columns.contains(column) {
                self.columns.insert(column.to_string());
            }
        }
        self.rows.push(row);
    }

    /// Column names in first-seen order
    pub fn columns(&self) -> impl ExactSizeIterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    /// All rows in order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty()
    }

    /// Rows as rectangular records in column order, absent fields empty
    pub fn records(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| self.columns.iter().map(|c| row.value_or_empty(c)).collect())
    }
}
