//! Per-file progress lines and the closing summary

use std::io::{self, IsTerminal};
use std::path::Path;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::batch::{BatchReport, FileOutcome};

/// Writes the user-facing progress report
pub struct SummaryWriter<W: WriteColor> {
    out: W,
}

impl SummaryWriter<StandardStream> {
    /// Report to stdout, coloured when it is a terminal
    pub fn stdout() -> Self {
        let choice = if io::stdout().is_terminal() {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self::new(StandardStream::stdout(choice))
    }
}

impl<W: WriteColor> SummaryWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn write_none_found(&mut self, dir: &Path, extension: &str) -> io::Result<()> {
        writeln!(self.out, "No .{} files found in {}.", extension, dir.display())
    }

    pub fn write_found(&mut self, count: usize, extension: &str) -> io::Result<()> {
        writeln!(self.out, "Found {} .{} file(s) to process...", count, extension)
    }

    /// One line per input file
    pub fn write_outcome(&mut self, outcome: &FileOutcome) -> io::Result<()> {
        write!(self.out, "Processing {}... ", file_name(&outcome.input))?;
        match &outcome.result {
            Ok(converted) => {
                self.write_mark("✓", Color::Green)?;
                writeln!(
                    self.out,
                    " Converted to {} ({} rows)",
                    file_name(&converted.output),
                    converted.rows
                )?;
            }
            Err(e) => {
                self.write_mark("✗", Color::Red)?;
                writeln!(self.out, " {}", e)?;
            }
        }
        self.out.flush()
    }

    pub fn write_complete(&mut self, report: &BatchReport) -> io::Result<()> {
        writeln!(
            self.out,
            "Processing complete! {} converted, {} failed.",
            report.succeeded(),
            report.failed()
        )
    }

    fn write_mark(&mut self, mark: &str, color: Color) -> io::Result<()> {
        self.out
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(self.out, "{}", mark)?;
        self.out.reset()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
