//! Reader file names: `<title>.<booktype>[.zip].an` and `.po`.

use crate::config::BookType;
use crate::error::{AppError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Extension of notes files.
pub const NOTE_EXTENSION: &str = "an";
/// Extension of statistics files.
pub const STAT_EXTENSION: &str = "po";

/// The notes and statistics files of one book. At least one is set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookFiles {
    /// `.an` file.
    pub notes: Option<PathBuf>,
    /// `.po` file.
    pub stats: Option<PathBuf>,
}

impl BookFiles {
    /// Whichever file is present, preferring the notes file.
    pub fn primary(&self) -> Option<&Path> {
        self.notes.as_deref().or(self.stats.as_deref())
    }
}

/// Check if a path names a notes or statistics file.
pub fn is_reader_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(NOTE_EXTENSION | STAT_EXTENSION)
    )
}

/// File name without directory and without the `.an`/`.po` suffix.
fn base_name(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    Some(
        name.strip_suffix(".an")
            .or_else(|| name.strip_suffix(".po"))
            .unwrap_or(name),
    )
}

/// Book type encoded in a reader file name.
///
/// `book.fb2.zip.an` is `fb2`; `book.zip.an` is `zip` because the real type
/// is unknown.
pub fn book_type_from_file_name(path: &Path) -> Result<BookType> {
    let name = base_name(path)
        .ok_or_else(|| AppError::InvalidPath(format!("no file name: {}", path.display())))?;

    let (stem, ext) = name
        .rsplit_once('.')
        .filter(|(stem, _)| !stem.is_empty())
        .ok_or_else(|| AppError::InvalidPath(format!("no book type in {:?}", name)))?;

    if ext.eq_ignore_ascii_case("zip") {
        let inner = stem
            .rsplit_once('.')
            .filter(|(s, _)| !s.is_empty())
            .and_then(|(_, inner)| BookType::from_extension(inner));
        return Ok(match inner {
            Some(BookType::Zip) | None => BookType::Zip,
            Some(book_type) => book_type,
        });
    }

    BookType::from_extension(ext).ok_or_else(|| AppError::UnsupportedBookType(ext.to_string()))
}

/// Book title from a reader file name.
pub fn title_from_file_name(path: &Path) -> String {
    let Some(mut name) = base_name(path) else {
        return String::new();
    };

    if let Some((stem, ext)) = name.rsplit_once('.')
        && ext.eq_ignore_ascii_case("zip")
        && !stem.is_empty()
    {
        name = stem;
    }

    if let Some((stem, ext)) = name.rsplit_once('.')
        && !stem.is_empty()
        && BookType::from_extension(ext).is_some()
    {
        name = stem;
    }

    name.to_string()
}

/// Group notes and statistics files of the same book, in first-seen order.
/// Paths of other kinds are ignored.
pub fn pair_book_files<I>(paths: I) -> Vec<BookFiles>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut pairs: Vec<BookFiles> = Vec::new();
    let mut index: HashMap<PathBuf, usize> = HashMap::new();

    for path in paths {
        let is_notes = match path.extension().and_then(|e| e.to_str()) {
            Some(NOTE_EXTENSION) => true,
            Some(STAT_EXTENSION) => false,
            _ => continue,
        };

        let key = path.with_extension("");
        let slot = *index.entry(key).or_insert_with(|| {
            pairs.push(BookFiles::default());
            pairs.len() - 1
        });

        let entry = &mut pairs[slot];
        let target = if is_notes {
            &mut entry.notes
        } else {
            &mut entry.stats
        };
        if target.is_some() {
            tracing::debug!(path = %path.display(), "Duplicate reader file ignored");
            continue;
        }
        *target = Some(path);
    }

    pairs
}
