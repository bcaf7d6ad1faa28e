//! Error types for the conversion pipeline

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while converting a single input file
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    ExternalTool(#[from] ExternalToolError),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error("Malformed XML: {message}")]
    Xml { message: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON write failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn xml(message: impl Into<String>) -> Self {
        ConvertError::Xml {
            message: message.into(),
        }
    }
}

/// Failures of the external exporter executable
#[derive(Debug, Error)]
pub enum ExternalToolError {
    #[error("Failed to launch exporter {}: {source}", .program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Exporter exited with {status}{}", stderr_suffix(.stderr))]
    Failed { status: String, stderr: String },

    #[error("Exporter produced no output at {}", .path.display())]
    NoOutput { path: PathBuf },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

/// The tree does not have the expected record/field shape
#[derive(Debug, Error)]
pub enum StructureError {
    #[error("Unexpected nested element at {path}: expected a scalar field")]
    NestedField { path: String },

    #[error("Table with TableName='{name}' not found")]
    TableNotFound { name: String },

    #[error("Invalid NumRows '{value}' at {path}")]
    InvalidRowCount { path: String, value: String },

    #[error("Missing column '{column}' in table '{table}'")]
    MissingColumn { table: String, column: String },
}

impl StructureError {
    /// Node path of the offending element, where one exists
    pub fn path(&self) -> Option<&str> {
        match self {
            StructureError::NestedField { path } | StructureError::InvalidRowCount { path, .. } => {
                Some(path.as_str())
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
