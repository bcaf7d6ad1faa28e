//! cdbexport - batch conversion of game database exports to CSV
//!
//! Each input file is run through the external exporter, which writes an XML
//! dump. The dump is parsed into a tree, flattened into a table and written
//! out as CSV (or TSV, or JSON).

pub mod batch;
pub mod config;
pub mod error;
pub mod exporter;
pub mod flatten;
pub mod model;
pub mod output;
pub mod parser;

pub use batch::{BatchReport, BatchRunner};
pub use config::Config;
pub use error::{ConvertError, Result};
pub use flatten::Flattener;
pub use model::Table;
