//! Command-line surface of `dhadc`.

use clap::{Parser, ValueEnum};

/// Arguments accepted by `dhadc`.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Source file to compile.
    #[arg(index = 1)]
    pub file: std::path::PathBuf,

    /// Where to write the assembly; defaults to the source path with its
    /// extension replaced by `s`.
    #[arg(short, long)]
    pub output: Option<std::path::PathBuf>,

    /// Print the parsed AST as JSON before compiling.
    #[arg(long)]
    pub dump_ast: bool,

    /// How much the compiler reports while it runs.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    pub verbosity: LogLevel,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }
}

/// The three levels the compiler distinguishes: fatal diagnostics only,
/// progress reporting, or everything.
#[derive(ValueEnum, Clone, Copy, Default, Debug)]
pub enum LogLevel {
    /// Only fatal diagnostics.
    #[default]
    Error,

    /// Also report which files are read and written.
    Info,

    /// Everything, including internal chatter.
    Debug,
}

impl From<LogLevel> for log::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        }
    }
}
