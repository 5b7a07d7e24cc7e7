//! moonreader-rs: highlights and reading progress from Moon+ Reader files.
//!
//! The reader keeps two files per book in its cache directory: a notes file
//! (`.an`) and a statistics file (`.po`), either plain or zlib-compressed.
//! This crate decodes both into typed values and writes notes back.
//!
//! # Features
//!
//! - Transparent zlib detection and decompression
//! - PDF notes (tag-delimited records)
//! - FB2/EPUB notes (line-positional records, deletion tombstones)
//! - Progress records
//! - Directory scanning with a bounded worker pool
//! - JSON export

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Configuration and CLI.
pub mod config;
/// Error types.
pub mod error;
/// Note and statistics codecs.
pub mod formats;
/// Book, note and statistics models, file discovery.
pub mod library;
/// Raw byte handling.
pub mod stream;

#[cfg(test)]
mod tests;

pub use config::{BookType, Cli, Command, Config};
pub use error::{AppError, Result};
pub use formats::{
    NoteFormat, decode_notes, decode_statistics, encode_notes, encode_statistics,
};
pub use library::{Book, Note, NoteStyle, Scanner, Statistics};
