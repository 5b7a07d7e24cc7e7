//! Notes for FB2 and EPUB books.
//!
//! The file is line oriented: three header lines, then one 16-line record
//! per note, records separated by a line holding a single `#`.

use crate::error::{AppError, Result};
use crate::formats::color::Color;
use crate::formats::timestamp;
use crate::library::note::{Note, NoteStyle};

/// Line separating two records.
pub const NOTE_SPLITTER: &str = "#";
/// Replaces the last modifier bit of a removed note.
pub const DELETED_MARKER: &str = "*DELETED*";

const HEADER_LINES: usize = 3;
const RECORD_LINES: usize = 16;
const HEADER: [&str; HEADER_LINES] = ["0", "indent:false", "trim:false"];

/// Named fields of a record, in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    NoteId,
    Title,
    BookPath,
    BookPathLower,
    LastChapter,
    LastSplit,
    LastPosition,
    HighlightLength,
    Color,
    Timestamp,
    Spacing,
    ManualNote,
    Text,
    Modifier,
}

/// `(field, first line, line count)`. Spacing and manual note share line 11.
const SCHEMA: [(Field, usize, usize); 14] = [
    (Field::NoteId, 0, 1),
    (Field::Title, 1, 1),
    (Field::BookPath, 2, 1),
    (Field::BookPathLower, 3, 1),
    (Field::LastChapter, 4, 1),
    (Field::LastSplit, 5, 1),
    (Field::LastPosition, 6, 1),
    (Field::HighlightLength, 7, 1),
    (Field::Color, 8, 1),
    (Field::Timestamp, 9, 1),
    (Field::Spacing, 10, 2),
    (Field::ManualNote, 11, 1),
    (Field::Text, 12, 1),
    (Field::Modifier, 13, 3),
];

/// A field's lines; single-line fields collapse to a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldValue<'a> {
    Scalar(&'a str),
    Sequence(&'a [&'a str]),
}

impl Field {
    fn span(self) -> (usize, usize) {
        let (_, start, len) = SCHEMA[self as usize];
        (start, len)
    }
}

/// One record's lines addressed through the schema.
struct Record<'a> {
    lines: &'a [&'a str],
}

impl<'a> Record<'a> {
    fn new(lines: &'a [&'a str]) -> Result<Self> {
        if lines.len() < RECORD_LINES {
            return Err(AppError::MalformedNoteRecord(format!(
                "FB2 note has {} lines, expected {}",
                lines.len(),
                RECORD_LINES
            )));
        }
        Ok(Self { lines })
    }

    fn get(&self, field: Field) -> FieldValue<'a> {
        let (start, len) = field.span();
        let lines = &self.lines[start..start + len];
        match lines {
            [single] => FieldValue::Scalar(*single),
            _ => FieldValue::Sequence(lines),
        }
    }

    fn scalar(&self, field: Field) -> &'a str {
        match self.get(field) {
            FieldValue::Scalar(value) => value,
            FieldValue::Sequence(lines) => lines.first().copied().unwrap_or_default(),
        }
    }

    fn sequence(&self, field: Field) -> &'a [&'a str] {
        let (start, len) = field.span();
        &self.lines[start..start + len]
    }
}

/// Decode every note in the text. A header-only file has no notes.
pub fn decode(text: &str) -> Result<Vec<Note>> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < HEADER_LINES {
        return Err(AppError::MalformedNoteRecord(format!(
            "FB2 notes need a {}-line header, got {} lines",
            HEADER_LINES,
            lines.len()
        )));
    }

    let chunks = note_chunks(&lines[HEADER_LINES..]);
    tracing::debug!(notes = chunks.len(), "Found FB2 note chunks");

    chunks.into_iter().map(decode_note).collect()
}

/// Encode notes with a default header.
///
/// Fails if a note's text or annotation would read back as a splitter line.
pub fn encode(notes: &[Note]) -> Result<String> {
    let mut out = String::new();
    for line in HEADER {
        out.push_str(line);
        out.push('\n');
    }

    for (i, note) in notes.iter().enumerate() {
        out.push_str(NOTE_SPLITTER);
        out.push('\n');
        for line in encode_note(i + 1, note)? {
            out.push_str(&line);
            out.push('\n');
        }
    }

    Ok(out)
}

/// Group lines between splitters. Blank stretches are not records.
fn note_chunks<'a>(lines: &'a [&'a str]) -> Vec<&'a [&'a str]> {
    lines
        .split(|line| *line == NOTE_SPLITTER)
        .filter(|chunk| chunk.iter().any(|line| !line.trim().is_empty()))
        .collect()
}

/// Read the three modifier lines as a base-2 number. The deletion marker
/// counts as 0.
fn modifier_from_bits(bits: &[&str]) -> Result<(u8, bool)> {
    let deleted = bits.last() == Some(&DELETED_MARKER);
    let mut value = 0u8;

    for (i, bit) in bits.iter().enumerate() {
        let digit = match *bit {
            "0" => 0,
            "1" => 1,
            DELETED_MARKER if i == bits.len() - 1 => 0,
            other => {
                return Err(AppError::MalformedNoteRecord(format!(
                    "bad modifier bit {:?}",
                    other
                )));
            }
        };
        value = (value << 1) | digit;
    }

    Ok((value, deleted))
}

fn bits_from_modifier(modifier: u8, deleted: bool) -> [String; 3] {
    let formatted = format!("{:03b}", modifier & 0b111);
    let mut bits: [String; 3] = ["0".into(), "0".into(), "0".into()];
    for (slot, bit) in bits.iter_mut().zip(formatted.chars()) {
        *slot = bit.to_string();
    }
    if deleted {
        bits[2] = DELETED_MARKER.to_string();
    }
    bits
}

fn decode_note(lines: &[&str]) -> Result<Note> {
    let record = Record::new(lines)?;

    tracing::trace!(note_id = record.scalar(Field::NoteId), "Decoding FB2 note");

    let (modifier, deleted) = modifier_from_bits(record.sequence(Field::Modifier))?;
    let style = if deleted {
        NoteStyle::Deleted
    } else {
        NoteStyle::from_code(modifier).unwrap_or(NoteStyle::Selected)
    };

    let created = timestamp::parse_millis(record.scalar(Field::Timestamp))?;
    let color = Color::parse(record.scalar(Field::Color))?;

    Ok(Note::new(record.scalar(Field::Text), created)
        .with_color(color)
        .with_manual_note(record.scalar(Field::ManualNote))
        .with_style(style)
        .with_modifier(modifier))
}

fn encode_note(note_id: usize, note: &Note) -> Result<Vec<String>> {
    let mut lines = vec![String::new(); RECORD_LINES];
    let text = single_line(note.text());

    for (field, start, len) in SCHEMA {
        let values: Vec<String> = match field {
            Field::NoteId => vec![note_id.to_string()],
            Field::Title | Field::BookPath | Field::BookPathLower => vec![String::new()],
            Field::LastChapter | Field::LastSplit | Field::LastPosition => vec!["0".into()],
            Field::HighlightLength => vec![text.chars().count().to_string()],
            Field::Color => vec![note.color().to_string()],
            Field::Timestamp => vec![timestamp::to_millis(&note.created())],
            Field::Spacing => vec![String::new(); len],
            Field::ManualNote => vec![single_line(note.manual_note())],
            Field::Text => vec![text.clone()],
            Field::Modifier => bits_from_modifier(note.modifier(), note.is_deleted()).to_vec(),
        };
        for (slot, value) in lines[start..start + len].iter_mut().zip(values) {
            if value == NOTE_SPLITTER {
                return Err(AppError::MalformedNoteRecord(format!(
                    "FB2 note {} has a {:?} line in field {:?}",
                    note_id, NOTE_SPLITTER, field
                )));
            }
            *slot = value;
        }
    }

    Ok(lines)
}

/// Records are line based, so embedded breaks become spaces.
fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}
