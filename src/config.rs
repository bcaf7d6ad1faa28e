//! Configuration handling for cdbexport

use std::path::{Path, PathBuf};

use crate::flatten::{Layout, Preset};

/// Default name of the external exporter executable
pub const DEFAULT_EXPORTER: &str = "Exporter.exe";

/// Default extension of the database files to convert
pub const DEFAULT_EXTENSION: &str = "cdb";

/// Output format for converted tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    /// File extension used for output files
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Configuration for a batch conversion
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory scanned for input files
    pub input_dir: PathBuf,
    /// Extension of input files, without the dot
    pub extension: String,
    /// Path to the exporter executable
    pub exporter: PathBuf,
    /// Where output files go; the input directory when unset
    pub output_dir: Option<PathBuf>,
    /// Parent of the scratch directory holding intermediate XML
    pub work_dir: Option<PathBuf>,
    /// Output format
    pub output_format: OutputFormat,
    /// How records are located in the XML
    pub layout: Layout,
    /// Post-processing preset
    pub preset: Preset,
    /// Keep intermediate XML files instead of deleting them
    pub keep_xml: bool,
    /// Convert files on the rayon thread pool
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            extension: DEFAULT_EXTENSION.to_string(),
            exporter: PathBuf::from(DEFAULT_EXPORTER),
            output_dir: None,
            work_dir: None,
            output_format: OutputFormat::default(),
            layout: Layout::default(),
            preset: Preset::default(),
            keep_xml: false,
            parallel: false,
        }
    }
}

impl Config {
    /// Create a new Config for an input directory
    pub fn new(input_dir: PathBuf) -> Self {
        Self {
            input_dir,
            ..Default::default()
        }
    }

    /// Set the exporter executable
    pub fn with_exporter(mut self, exporter: PathBuf) -> Self {
        self.exporter = exporter;
        self
    }

    /// Set the input file extension (a leading dot is ignored)
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = Some(dir);
        self
    }

    /// Set the scratch directory parent
    pub fn with_work_dir(mut self, dir: PathBuf) -> Self {
        self.work_dir = Some(dir);
        self
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the record layout
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the post-processing preset
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self
    }

    /// Keep intermediate XML files
    pub fn with_keep_xml(mut self, keep: bool) -> Self {
        self.keep_xml = keep;
        self
    }

    /// Enable parallel conversion
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Directory output files are written to
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.input_dir)
    }

    /// Output path for an input file: same base name, format extension
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let name = input.file_name().map(PathBuf::from).unwrap_or_default();
        self.output_dir()
            .join(name)
            .with_extension(self.output_format.extension())
    }

    /// The exporter to use when none was given: `Exporter.exe` in the input
    /// directory if present, otherwise looked up on `PATH`
    pub fn default_exporter_for(input_dir: &Path) -> PathBuf {
        let local = input_dir.join(DEFAULT_EXPORTER);
        if local.is_file() {
            local
        } else {
            PathBuf::from(DEFAULT_EXPORTER)
        }
    }
}
