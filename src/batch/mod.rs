//! Batch driver: export, flatten and write every input file
//!
//! A failure on one file is recorded in its [`FileOutcome`] and never stops
//! the rest of the batch. Each file gets its own intermediate XML, deleted
//! once whether or not the conversion worked, and its output is written to a
//! temporary file that only replaces the target once complete.

mod artifact;
mod scan;

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ConvertError, Result};
use crate::exporter::Exporter;
use crate::flatten::{table_names, Flattener};
use crate::model::Table;
use crate::output::{OutputFactory, TableWriter};
use crate::parser::read_document;

pub use artifact::{ScratchDir, XmlArtifact};
pub use scan::find_inputs;

/// A successfully converted file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    pub output: PathBuf,
    pub rows: usize,
}

/// Result of converting one input file
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub result: std::result::Result<Converted, ConvertError>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a whole batch, in input order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

/// Converts input files with a given exporter
pub struct BatchRunner<E: Exporter> {
    exporter: E,
    flattener: Flattener,
    writer: Box<dyn TableWriter>,
    config: Config,
}

impl<E: Exporter> BatchRunner<E> {
    pub fn new(exporter: E, flattener: Flattener, config: Config) -> Self {
        let writer = OutputFactory::create(config.output_format);
        Self {
            exporter,
            flattener,
            writer,
            config,
        }
    }

    /// Convert all `inputs`, calling `on_outcome` for each in input order.
    ///
    /// In parallel mode the callbacks run once every file is done.
    pub fn run(
        &self,
        inputs: &[PathBuf],
        mut on_outcome: impl FnMut(&FileOutcome),
    ) -> Result<BatchReport> {
        let scratch = ScratchDir::create(self.config.work_dir.as_deref(), self.config.keep_xml)?;
        if self.config.keep_xml {
            info!(path = %scratch.path().display(), "intermediate XML kept");
        }

        let outcomes = if self.config.parallel {
            let outcomes: Vec<FileOutcome> = inputs
                .par_iter()
                .enumerate()
                .map(|(index, input)| self.convert_one(&scratch, index, input))
                .collect();
            outcomes.iter().for_each(&mut on_outcome);
            outcomes
        } else {
            inputs
                .iter()
                .enumerate()
                .map(|(index, input)| {
                    let outcome = self.convert_one(&scratch, index, input);
                    on_outcome(&outcome);
                    outcome
                })
                .collect()
        };

        Ok(BatchReport { outcomes })
    }

    fn convert_one(&self, scratch: &ScratchDir, index: usize, input: &Path) -> FileOutcome {
        let artifact = scratch.artifact_for(index, input);
        let converted = self.convert_file(input, artifact.path());

        let cleanup = artifact.remove();
        let result = match (converted, cleanup) {
            (Ok(c), Ok(())) => Ok(c),
            (Ok(c), Err(e)) => {
                // Output is already in place
                warn!(input = %input.display(), error = %e, "conversion succeeded but cleanup failed");
                Ok(c)
            }
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(cleanup_err)) => {
                warn!(input = %input.display(), error = %cleanup_err, "cleanup failed");
                Err(e)
            }
        };

        match &result {
            Ok(c) => info!(input = %input.display(), output = %c.output.display(), rows = c.rows, "converted"),
            Err(e) => warn!(input = %input.display(), error = %e, "skipped"),
        }

        FileOutcome {
            input: input.to_path_buf(),
            result,
        }
    }

    /// Export one input to `xml_path`, flatten it and write the output file
    pub fn convert_file(&self, input: &Path, xml_path: &Path) -> Result<Converted> {
        self.exporter.export(input, xml_path)?;

        let doc = read_document(xml_path)?;
        debug!(input = %input.display(), tables = ?table_names(&doc), "parsed export");

        let table = self.flattener.flatten(&doc)?;
        debug!(
            input = %input.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "flattened"
        );

        let output = self.config.output_path(input);
        self.write_output(&table, &output)?;

        Ok(Converted {
            output,
            rows: table.row_count(),
        })
    }

    /// Write through a temporary file in the output directory, so a failure
    /// never leaves a partial output behind
    fn write_output(&self, table: &Table, output: &Path) -> Result<()> {
        let dir = output.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::Builder::new()
            .prefix(".cdbexport-")
            .suffix(".part")
            .tempfile_in(dir)
            .map_err(|e| ConvertError::io(dir, e))?;

        {
            let mut buffered = BufWriter::new(tmp.as_file_mut());
            self.writer.write(table, &mut buffered)?;
            buffered.flush().map_err(|e| ConvertError::io(output, e))?;
        }

        tmp.persist(output)
            .map_err(|e| ConvertError::io(output, e.error))?;
        Ok(())
    }
}
