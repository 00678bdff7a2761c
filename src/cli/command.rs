use std::path::PathBuf;

use clap::{Args, Parser as ClapParser, Subcommand, ValueEnum};
use metademux::process::resolve::PathStyle;
use metademux::structs::dialect::Dialect;
use metademux::utils::record_buffer::MAX_RECORD_LEN;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nmetademux ",
    env!("METADEMUX_VERSION"),
    "\nbuilt ",
    env!("BUILD_TIMESTAMP"),
);

#[derive(Debug, ClapParser)]
#[command(
    name         = env!("CARGO_PKG_NAME"),
    version      = env!("CARGO_PKG_VERSION"),
    long_version = LONG_VERSION,
    author       = env!("CARGO_PKG_AUTHORS"),
    about        = "Extract media references from M3U, PLS, ASX, HTML and B4S playlists",
    long_about   = None,
)]
pub struct Cli {
    /// Set the log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub loglevel: LogLevel,

    /// Treat warnings as fatal errors (fail on the first over-length record).
    #[arg(long, global = true)]
    pub strict: bool,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Show a progress spinner while reading.
    #[arg(long, global = true)]
    pub progress: bool,

    /// Choose an operation to perform.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write every media reference found in the playlist.
    Extract(ExtractArgs),

    /// Print the detected playlist dialect
    Detect(DetectArgs),
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Input playlist (use "-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Path conventions for resolving relative references.
    #[arg(long, value_enum, default_value_t = PathStyleArg::native())]
    pub path_style: PathStyleArg,

    /// Longest record kept, in bytes. Longer records are skipped.
    #[arg(long, value_name = "BYTES", default_value_t = MAX_RECORD_LEN, value_parser = parse_record_len)]
    pub max_record_len: usize,

    /// Position of the item being expanded; the first entry gets START + 1.
    #[arg(long, value_name = "START", default_value_t = 0)]
    pub start: usize,

    /// Output format for the extracted entries.
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,

    /// Write entries to this file instead of stdout.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DetectArgs {
    /// Input playlist (use "-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Options shared by every command that reads a playlist.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Force a dialect instead of detecting it.
    #[arg(long, value_parser = parse_dialect)]
    pub dialect: Option<Dialect>,

    /// Location of the playlist, used for detection and resolution.
    /// Defaults to the input path.
    #[arg(long, value_name = "LOCATION")]
    pub location: Option<String>,
}

fn parse_dialect(name: &str) -> Result<Dialect, String> {
    name.parse::<Dialect>().map_err(|_| {
        let names = Dialect::ALL.map(Dialect::name).join(", ");
        format!("unknown dialect '{name}' (expected one of: {names})")
    })
}

fn parse_record_len(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("record length must be at least 1".to_string()),
        Ok(len) => Ok(len),
        Err(e) => Err(e.to_string()),
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Disable logging output.
    Off,
    /// No output except errors.
    Error,
    /// Show warnings and errors.
    Warn,
    /// Show info, warnings and errors (default).
    Info,
    /// Show debug, info, warnings and errors.
    Debug,
    /// Show all log messages including trace.
    Trace,
}

impl LogLevel {
    /// Convert LogLevel to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Colorized human-readable text.
    Plain,
    /// Structured JSON per log record.
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum OutputFormat {
    /// One location per line.
    Plain,
    /// A YAML sequence of position/location pairs.
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum PathStyleArg {
    /// Forward slashes, leading "/" is absolute.
    Posix,
    /// Backslashes or slashes, drive letters.
    Windows,
}

impl PathStyleArg {
    pub fn native() -> Self {
        match PathStyle::native() {
            PathStyle::Posix => PathStyleArg::Posix,
            PathStyle::Windows => PathStyleArg::Windows,
        }
    }
}

impl From<PathStyleArg> for PathStyle {
    fn from(arg: PathStyleArg) -> Self {
        match arg {
            PathStyleArg::Posix => PathStyle::Posix,
            PathStyleArg::Windows => PathStyle::Windows,
        }
    }
}
