pub mod color;
mod fb2;
mod pdf;
pub mod stats;
pub mod timestamp;

pub use fb2::{DELETED_MARKER, NOTE_SPLITTER};
pub use pdf::{NOTE_END, NOTE_START};

use crate::config::BookType;
use crate::error::{AppError, Result};
use crate::library::note::Note;
use crate::library::stats::Statistics;
use crate::stream;

/// Note file encodings, one per family of book types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteFormat {
    /// Tag-delimited records used for PDF books.
    Pdf,
    /// Line-positional records used for FB2 and EPUB books.
    Fb2,
}

impl NoteFormat {
    /// Pick the codec for a book type.
    pub fn for_book_type(book_type: BookType) -> Result<Self> {
        match book_type {
            BookType::Pdf => Ok(NoteFormat::Pdf),
            BookType::Fb2 | BookType::Epub => Ok(NoteFormat::Fb2),
            other => Err(AppError::UnsupportedBookType(other.to_string())),
        }
    }

    /// Decode normalized note text.
    pub fn decode(&self, text: &str) -> Result<Vec<Note>> {
        match self {
            NoteFormat::Pdf => pdf::decode(text),
            NoteFormat::Fb2 => fb2::decode(text),
        }
    }

    /// Encode notes as text. Fails on notes the format cannot represent.
    pub fn encode(&self, notes: &[Note]) -> Result<String> {
        match self {
            NoteFormat::Pdf => pdf::encode(notes),
            NoteFormat::Fb2 => fb2::encode(notes),
        }
    }
}

/// Decode the raw contents of a `.an` file.
pub fn decode_notes(data: &[u8], book_type: BookType) -> Result<Vec<Note>> {
    let format = NoteFormat::for_book_type(book_type)?;
    let text = stream::normalize(data)?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let notes = format.decode(&text)?;
    tracing::debug!(book_type = %book_type, notes = notes.len(), "Decoded notes");
    Ok(notes)
}

/// Encode notes as the contents of a `.an` file.
pub fn encode_notes(notes: &[Note], book_type: BookType, compress: bool) -> Result<Vec<u8>> {
    let format = NoteFormat::for_book_type(book_type)?;
    stream::denormalize(&format.encode(notes)?, compress)
}

/// Decode the raw contents of a `.po` file. Empty files mean no progress.
pub fn decode_statistics(data: &[u8]) -> Result<Statistics> {
    let text = stream::normalize(data)?;
    if text.trim().is_empty() {
        return Ok(Statistics::empty());
    }
    stats::decode(&text)
}

/// Encode statistics as the contents of a `.po` file.
pub fn encode_statistics(stats: &Statistics, compress: bool) -> Result<Vec<u8>> {
    stream::denormalize(&stats::encode(stats), compress)
}
