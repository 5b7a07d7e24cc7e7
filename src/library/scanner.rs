//! Directory scanning and parallel decoding.

use crate::config::{BookType, ScanConfig};
use crate::error::{AppError, Result};
use crate::formats;
use crate::library::book::Book;
use crate::library::files::{self, BookFiles};
use crate::library::note::Note;
use crate::library::stats::Statistics;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Cooperative cancellation shared between a scan and its caller.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create an uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; books not yet started are skipped.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome for one book.
#[derive(Debug)]
pub struct ScanEntry {
    /// Files the book was read from.
    pub files: BookFiles,
    /// Decoded book or the error that stopped it.
    pub result: Result<Book>,
}

/// Reads every book in a reader cache directory.
pub struct Scanner {
    config: ScanConfig,
    cancel: CancelToken,
}

impl Scanner {
    /// Create a scanner.
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Token that cancels this scanner's work.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// List reader files directly inside a directory, sorted by name.
    pub fn find_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(AppError::InvalidPath(format!(
                "not a directory: {}",
                dir.display()
            )));
        }

        let files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.config.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!(error = %err, "Skipping unreadable entry");
                    None
                }
            })
            .filter(|e| e.file_type().is_file() || e.path().is_file())
            .map(|e| e.into_path())
            .filter(|p| files::is_reader_file(p))
            .collect();

        tracing::info!(dir = %dir.display(), files = files.len(), "Found reader files");
        Ok(files)
    }

    /// Scan a directory and decode each book on the worker pool.
    pub fn scan(&self, dir: &Path) -> Result<Vec<ScanEntry>> {
        let mut pairs = files::pair_book_files(self.find_files(dir)?);
        if let Some(limit) = self.config.book_count {
            pairs.truncate(limit);
        }
        self.read_all(pairs)
    }

    /// Decode the given books in parallel, preserving their order.
    pub fn read_all(&self, pairs: Vec<BookFiles>) -> Result<Vec<ScanEntry>> {
        let total = pairs.len();
        let workers = self.config.workers.max(1);
        tracing::info!(books = total, workers = workers, "Reading books");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build worker pool: {}", e)))?;

        let processed = AtomicUsize::new(0);
        let start = std::time::Instant::now();

        let entries = pool.install(|| {
            pairs
                .into_par_iter()
                .map(|files| {
                    let result = if self.cancel.is_cancelled() {
                        Err(AppError::Cancelled(describe(&files)))
                    } else {
                        read_book(&files)
                    };

                    if let Err(e) = &result {
                        tracing::debug!(book = %describe(&files), error = %e, "Book failed");
                    }

                    let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                    if done.is_multiple_of(100) || done == total {
                        tracing::info!("Processing... {}/{}", done, total);
                    }

                    ScanEntry { files, result }
                })
                .collect::<Vec<_>>()
        });

        tracing::info!(books = total, elapsed = ?start.elapsed(), "Scan complete");
        Ok(entries)
    }
}

fn describe(files: &BookFiles) -> String {
    files
        .primary()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

/// Read and decode one book's files.
///
/// Notes the crate has no codec for are dropped with a warning when the book
/// also has statistics; a lone notes file of that kind is an error.
pub fn read_book(files: &BookFiles) -> Result<Book> {
    let primary = files
        .primary()
        .ok_or_else(|| AppError::InvalidPath("book has no files".into()))?;
    let title = files::title_from_file_name(primary);

    // Statistics alone do not need a known book type
    let book_type = match files::book_type_from_file_name(primary) {
        Ok(book_type) => Some(book_type),
        Err(e) if files.notes.is_some() && files.stats.is_none() => return Err(e),
        Err(_) => None,
    };

    let stats = match &files.stats {
        Some(path) => formats::decode_statistics(&std::fs::read(path)?)?,
        None => Statistics::empty(),
    };

    let notes = match (&files.notes, book_type) {
        (Some(path), Some(book_type)) => match read_notes(path, book_type) {
            Err(AppError::UnsupportedBookType(kind)) if files.stats.is_some() => {
                tracing::warn!(
                    path = %path.display(),
                    book_type = %kind,
                    "Notes not readable, keeping statistics"
                );
                Vec::new()
            }
            result => result?,
        },
        (Some(path), None) => {
            tracing::warn!(path = %path.display(), "Unknown book type, keeping statistics");
            Vec::new()
        }
        _ => Vec::new(),
    };

    Ok(Book::new(title)
        .with_book_type(book_type)
        .with_stats(stats)
        .with_notes(notes))
}

fn read_notes(path: &Path, book_type: BookType) -> Result<Vec<Note>> {
    let data = std::fs::read(path)?;
    formats::decode_notes(&data, book_type)
}
