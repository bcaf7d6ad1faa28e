//! Tabular flattening of tree documents
//!
//! Everything in here is a pure function of the input [`Document`]: no I/O,
//! no shared state, so documents can be flattened in any order or in
//! parallel. Shape problems are reported as [`StructureError`]s; a partial
//! table is never returned.
//!
//! [`StructureError`]: crate::error::StructureError

mod columns;
mod cyclists;
mod records;

use chrono::NaiveDate;

use crate::error::Result;
use crate::model::{Document, Table};

pub use columns::{flatten_columns, table_names};
pub use cyclists::{age_on, cyclist_roster, parse_birthdate, CYCLIST_TABLE, TEAM_TABLE};
pub use records::flatten_records;

/// Where the records of a document live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// Exporter tables: `Table/Column/Cell`, one table per output
    Columns { table: Option<String> },
    /// One element per record at `path` below the root
    Records { path: Option<String> },
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Columns { table: None }
    }
}

/// Post-processing applied on top of the plain layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Preset {
    #[default]
    None,
    /// Cyclists joined with their teams, plus age
    Cyclists,
}

/// Configured flattening of one document into one table
#[derive(Debug, Clone)]
pub struct Flattener {
    layout: Layout,
    preset: Preset,
    today: NaiveDate,
}

impl Flattener {
    /// Create a flattener; `today` is the reference date for computed ages
    pub fn new(layout: Layout, preset: Preset, today: NaiveDate) -> Self {
        Self {
            layout,
            preset,
            today,
        }
    }

    /// Flatten a document into a table
    pub fn flatten(&self, doc: &Document) -> Result<Table> {
        match self.preset {
            Preset::Cyclists => cyclist_roster(doc, self.today),
            Preset::None => match &self.layout {
                Layout::Columns { table } => flatten_columns(doc, table.as_deref()),
                Layout::Records { path } => flatten_records(doc, path.as_deref()),
            },
        }
    }
}
