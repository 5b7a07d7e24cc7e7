use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{AppError, Result};

/// Export highlights and reading progress from Moon+ Reader files.
#[derive(Parser, Debug, Clone)]
#[command(name = "moonreader-rs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file.
    #[arg(short, long, env = "MOONREADER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Export every book found in a directory as JSON (default if no command given).
    Export {
        /// Directory holding .an and .po files.
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// File to write the JSON to (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of parallel workers.
        #[arg(short, long)]
        workers: Option<usize>,

        /// Only export the first N books.
        #[arg(long)]
        book_count: Option<usize>,

        /// Pretty-print the JSON.
        #[arg(long)]
        pretty: bool,
    },

    /// Decode a single notes (.an) file.
    Notes {
        /// Notes file.
        file: PathBuf,

        /// Book type override (pdf, fb2, epub); guessed from the file name otherwise.
        #[arg(short, long)]
        book_type: Option<BookType>,
    },

    /// Decode a single statistics (.po) file.
    Stats {
        /// Statistics file.
        file: PathBuf,
    },

    /// Re-encode a notes file in canonical form.
    Rewrite {
        /// Notes file to read.
        file: PathBuf,

        /// Destination (defaults to overwriting the input).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compress the output with zlib.
        #[arg(long)]
        compress: bool,
    },

    /// Create a default config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

/// Main configuration from TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Scan configuration.
    #[serde(default)]
    pub scan: ScanConfig,

    /// Output configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Scan configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Number of parallel workers reading and decoding books.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Maximum number of books to export (all if unset).
    #[serde(default)]
    pub book_count: Option<usize>,

    /// Follow symbolic links while scanning.
    #[serde(default)]
    pub follow_links: bool,

    /// Log and skip books that fail to decode instead of aborting.
    #[serde(default = "default_skip_failed")]
    pub skip_failed: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            book_count: None,
            follow_links: false,
            skip_failed: default_skip_failed(),
        }
    }
}

fn default_workers() -> usize {
    8
}

fn default_skip_failed() -> bool {
    true
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    #[serde(default)]
    pub pretty: bool,

    /// Compress rewritten notes files.
    #[serde(default)]
    pub compress_notes: bool,
}

impl Config {
    /// Load configuration from file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config file: {}", e)))?;

        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config file: {}", e)))?;

        if config.scan.workers == 0 {
            return Err(AppError::Config("scan.workers must be at least 1".into()));
        }

        Ok(config)
    }

    /// Find config file in default locations.
    pub fn find_config_file() -> Option<PathBuf> {
        let candidates = [
            PathBuf::from("moonreader-rs.toml"),
            dirs::config_dir()
                .map(|p| p.join("moonreader-rs").join("config.toml"))
                .unwrap_or_default(),
        ];

        candidates.into_iter().find(|p| p.is_file())
    }

    /// Generate default config file content.
    pub fn generate_default() -> String {
        r#"# moonreader-rs configuration

[scan]
# Parallel workers reading and decoding books
workers = 8
# Only export the first N books
# book_count = 50
follow_links = false
# Log and skip books that fail to decode instead of aborting
skip_failed = true

[output]
pretty = false
# zlib-compress rewritten .an files
compress_notes = false
"#
        .to_string()
    }
}

/// Book types the reader encodes in its file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookType {
    /// EPUB book.
    Epub,
    /// FictionBook.
    Fb2,
    /// PDF document.
    Pdf,
    /// Plain text.
    Txt,
    /// Mobipocket.
    Mobi,
    /// Archive whose real type could not be determined from the name.
    Zip,
}

impl BookType {
    /// Try to detect type from a book file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "epub" => Some(BookType::Epub),
            "fb2" => Some(BookType::Fb2),
            "pdf" => Some(BookType::Pdf),
            "txt" => Some(BookType::Txt),
            "mobi" => Some(BookType::Mobi),
            "zip" => Some(BookType::Zip),
            _ => None,
        }
    }

    /// Extension used in reader file names.
    pub fn extension(&self) -> &'static str {
        match self {
            BookType::Epub => "epub",
            BookType::Fb2 => "fb2",
            BookType::Pdf => "pdf",
            BookType::Txt => "txt",
            BookType::Mobi => "mobi",
            BookType::Zip => "zip",
        }
    }
}

impl fmt::Display for BookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for BookType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s).ok_or_else(|| AppError::UnsupportedBookType(s.to_string()))
    }
}
