//! Book aggregate assembled from a notes/statistics file pair.

use crate::config::BookType;
use crate::error::Result;
use crate::library::note::Note;
use crate::library::stats::Statistics;
use serde::Serialize;
use uuid::Uuid;

/// A book as seen by the reader: title, progress and notes.
#[derive(Debug, Clone, Serialize)]
pub struct Book {
    /// Deterministic identifier derived from the title.
    pub id: String,

    /// Title taken from the file name.
    pub title: String,

    /// Book type from the file name, if it could be determined.
    pub book_type: Option<BookType>,

    /// Reading progress.
    #[serde(flatten)]
    pub stats: Statistics,

    /// Notes in file order.
    pub notes: Vec<Note>,
}

impl Book {
    /// Create a book with no progress and no notes.
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();

        // Same title always maps to the same id across exports
        let id = Uuid::new_v5(&Uuid::NAMESPACE_URL, title.as_bytes()).to_string();

        Self {
            id,
            title,
            book_type: None,
            stats: Statistics::empty(),
            notes: Vec::new(),
        }
    }

    /// Set the book type.
    pub fn with_book_type(mut self, book_type: Option<BookType>) -> Self {
        self.book_type = book_type;
        self
    }

    /// Set the progress snapshot.
    pub fn with_stats(mut self, stats: Statistics) -> Self {
        self.stats = stats;
        self
    }

    /// Set the notes.
    pub fn with_notes(mut self, notes: Vec<Note>) -> Self {
        self.notes = notes;
        self
    }

    /// Notes that were not deleted in the reader.
    pub fn live_notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter().filter(|n| !n.is_deleted())
    }

    /// Total pages known to the reader.
    pub fn pages(&self) -> u64 {
        self.stats.pages()
    }

    /// Percent read.
    pub fn percentage(&self) -> f64 {
        self.stats.percentage()
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} notes", self.title, self.notes.len())
    }
}

/// Export document: `{"books": [...]}`.
#[derive(Debug, Serialize)]
pub struct Export<'a> {
    /// Books in scan order.
    pub books: &'a [Book],
}

impl<'a> Export<'a> {
    /// Wrap books for export.
    pub fn new(books: &'a [Book]) -> Self {
        Self { books }
    }

    /// Serialize as JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
