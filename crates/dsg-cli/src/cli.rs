//! Command line arguments.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use dsg_cli::logging::{LogConfig, LogFormat};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "dsg",
    version,
    about = "Standardize surface ocean CO2 submissions into DSG trajectory files",
    long_about = "Standardize surface ocean CO2 submissions into DSG trajectory files.\n\n\
                  Reads a TOML manifest and a delimited data file, converts every column\n\
                  to its standard unit, checks the data, and writes a NetCDF DSG file.\n\
                  DSG files can be inspected, searched for crossovers and re-flagged."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include timestamps in log lines.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Allow raw data values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

impl Cli {
    /// Logging settings; `-v`/`-q` and `--log-level` switch off `RUST_LOG`.
    pub fn log_config(&self) -> LogConfig {
        let explicit = self.verbosity.is_present() || self.log_level.is_some();
        let with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        LogConfig {
            level_filter: self
                .log_level
                .map_or_else(|| self.verbosity.tracing_level_filter(), LevelFilter::from),
            use_env_filter: !explicit,
            with_timestamps: self.log_timestamps,
            with_ansi,
            format: self.log_format.into(),
            log_file: self.log_file.clone(),
            log_data: self.log_data,
            ..LogConfig::default()
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// List the known data types.
    Types(TypesArgs),

    /// Standardize and check a submission, then write its DSG file.
    Standardize(StandardizeArgs),

    /// Show the metadata and layout of a DSG file.
    Inspect(InspectArgs),

    /// Find crossovers between one DSG file and others.
    Crossover(CrossoverArgs),

    /// Set QC flags of the samples at the given locations.
    UpdateFlags(UpdateFlagsArgs),
}

#[derive(Parser)]
pub struct TypesArgs {
    /// Which registry to list.
    #[arg(long = "registry", value_enum, default_value = "user")]
    pub registry: RegistryArg,
}

#[derive(Parser)]
pub struct StandardizeArgs {
    /// Path to the submission manifest (TOML).
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// DSG file to write (default: <EXPOCODE>.nc next to the manifest).
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Check and report without writing the DSG file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Write every diagnostic to this JSON file.
    #[arg(long = "diagnostics", value_name = "FILE")]
    pub diagnostics: Option<PathBuf>,
}

#[derive(Parser)]
pub struct InspectArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct CrossoverArgs {
    /// The DSG file to compare against the others.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// DSG files to search.
    #[arg(value_name = "OTHER", required = true)]
    pub others: Vec<PathBuf>,

    /// Largest combined space-time distance, in km.
    #[arg(long = "max-distance", value_name = "KM")]
    pub max_distance: Option<f64>,

    /// Assumed drift of surface water, in km/day.
    #[arg(long = "seawater-speed", value_name = "KM_PER_DAY")]
    pub seawater_speed: Option<f64>,
}

#[derive(Parser)]
pub struct UpdateFlagsArgs {
    /// The DSG file to update in place.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Flag variable to set, e.g. WOCE_CO2_water.
    #[arg(long = "flag", value_name = "NAME")]
    pub flag: String,

    /// Flag value to set.
    #[arg(long = "value", value_name = "C")]
    pub value: char,

    /// Data variable whose value must also match, e.g. fCO2_recommended.
    #[arg(long = "data", value_name = "NAME")]
    pub data: Option<String>,

    /// Delimited file of locations with longitude, latitude and time
    /// (seconds since 1970) columns, and optional depth and value columns.
    #[arg(long = "locations", value_name = "FILE")]
    pub locations: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RegistryArg {
    User,
    Metadata,
    Data,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
