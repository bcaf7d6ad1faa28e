//! Invocation of the external database exporter

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{ExternalToolError, Result};

/// Something that turns one database file into an XML export
pub trait Exporter: Send + Sync {
    /// Export `input` to XML at `output`
    fn export(&self, input: &Path, output: &Path) -> Result<()>;
}

/// Runs the exporter executable as
/// `<program> -input <input> -output <output> -ToXML`
#[derive(Debug, Clone)]
pub struct CommandExporter {
    program: PathBuf,
}

impl CommandExporter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Build the command line for one export.
    ///
    /// The exporter runs from its own directory, so it can find anything
    /// shipped next to it.
    pub fn command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-input")
            .arg(input)
            .arg("-output")
            .arg(output)
            .arg("-ToXML");
        if let Some(dir) = self.program.parent().filter(|d| !d.as_os_str().is_empty()) {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl Exporter for CommandExporter {
    fn export(&self, input: &Path, output: &Path) -> Result<()> {
        let mut cmd = self.command(input, output);
        debug!(command = ?cmd, "running exporter");

        let result = cmd.output().map_err(|source| ExternalToolError::Launch {
            program: self.program.clone(),
            source,
        })?;

        if !result.status.success() {
            return Err(ExternalToolError::Failed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            }
            .into());
        }

        if !output.is_file() {
            return Err(ExternalToolError::NoOutput {
                path: output.to_path_buf(),
            }
            .into());
        }

        debug!(output = %output.display(), "exporter finished");
        Ok(())
    }
}
