//! Output formatting for flattened tables and batch progress

mod delimited;
mod json;
mod summary;

use std::io::Write;

use crate::config::OutputFormat;
use crate::error::Result;
use crate::model::Table;

pub use delimited::DelimitedWriter;
pub use json::JsonWriter;
pub use summary::SummaryWriter;

/// Trait for table serializers
pub trait TableWriter: Send + Sync {
    /// Serialize a table to a writer
    fn write(&self, table: &Table, writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating table writers
pub struct OutputFactory;

impl OutputFactory {
    /// Create a table writer based on format type
    pub fn create(format: OutputFormat) -> Box<dyn TableWriter> {
        match format {
            OutputFormat::Csv => Box::new(DelimitedWriter::csv()),
            OutputFormat::Tsv => Box::new(DelimitedWriter::tsv()),
            OutputFormat::Json => Box::new(JsonWriter::new()),
        }
    }
}

/// Serialize a table into a string
pub fn render_to_string(table: &Table, format: OutputFormat) -> Result<String> {
    let mut buffer = Vec::new();
    OutputFactory::create(format).write(table, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
