//! JSON output format

use std::io::Write;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::Result;
use crate::model::{Row, Table};

use super::TableWriter;

/// JSON output: an array with one object per row, keys in column order
pub struct JsonWriter {
    pretty: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializes rows as objects, filling absent columns with `""`
struct JsonRows<'a>(&'a Table);

struct JsonRow<'a> {
    table: &'a Table,
    row: &'a Row,
}

impl Serialize for JsonRows<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.row_count()))?;
        for row in self.0.rows() {
            seq.serialize_element(&JsonRow { table: self.0, row })?;
        }
        seq.end()
    }
}

impl Serialize for JsonRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.table.column_count()))?;
        for column in self.table.columns() {
            map.serialize_entry(column, self.row.value_or_empty(column))?;
        }
        map.end()
    }
}

impl TableWriter for JsonWriter {
    fn write(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        let rows = JsonRows(table);
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &rows)?;
        } else {
            serde_json::to_writer(&mut *writer, &rows)?;
        }
        writeln!(writer).map_err(serde_json::Error::io)?;

        Ok(())
    }
}
