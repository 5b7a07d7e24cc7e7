//! Notes for PDF books.
//!
//! Each note is wrapped in `#A*#` ... `#A@#` and its fields are separated by
//! `#A<n>#` tags. Anything before the first note (the book id) is ignored.

use crate::error::{AppError, Result};
use crate::formats::color::Color;
use crate::formats::timestamp;
use crate::library::note::{Note, NoteStyle};
use regex::Regex;
use std::sync::LazyLock;

/// Opens a note.
pub const NOTE_START: &str = "#A*#";
/// Closes a note.
pub const NOTE_END: &str = "#A@#";

static FIELD_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#A[0-9@*]#").expect("field tag pattern is valid"));

// Token positions after splitting a note on field tags.
const PAGE: usize = 1;
const TIMESTAMP: usize = 2;
const COLOR: usize = 5;
const STYLE: usize = 6;
const MANUAL_NOTE: usize = 7;
const TEXT: usize = 8;
const MIN_TOKENS: usize = TEXT + 1;

/// Decode every note in the text.
pub fn decode(text: &str) -> Result<Vec<Note>> {
    let chunks = note_chunks(text);
    tracing::debug!(notes = chunks.len(), "Found PDF note chunks");

    chunks.into_iter().map(decode_note).collect()
}

/// Encode notes, prefixed by a placeholder book id. Deleted notes are left out.
///
/// Fails if a note's text or annotation would read back as a field tag.
pub fn encode(notes: &[Note]) -> Result<String> {
    let mut out = String::from("0");
    for note in notes {
        if let Some(text) = encode_note(note)? {
            out.push_str(&text);
        }
    }
    Ok(out)
}

/// Split text into raw note chunks, markers included.
fn note_chunks(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = text;

    while let (Some(start), Some(end)) = (rest.find(NOTE_START), rest.find(NOTE_END)) {
        let stop = end + NOTE_END.len();
        // An end marker that precedes the start belongs to no note
        if start <= end {
            chunks.push(&rest[start..stop]);
        }
        rest = &rest[stop..];
    }

    chunks
}

fn decode_note(chunk: &str) -> Result<Note> {
    let tokens: Vec<&str> = FIELD_TAG_RE.split(chunk).collect();
    if tokens.len() < MIN_TOKENS {
        return Err(AppError::MalformedNoteRecord(format!(
            "PDF note has {} fields, expected at least {}",
            tokens.len(),
            MIN_TOKENS
        )));
    }

    tracing::trace!(page = tokens[PAGE], "Decoding PDF note");

    let style = style_from_code(tokens[STYLE])?;
    let created = timestamp::parse_millis(tokens[TIMESTAMP])?;
    let color = Color::parse(tokens[COLOR])?;

    Ok(Note::new(tokens[TEXT], created)
        .with_style(style)
        .with_color(color)
        .with_manual_note(tokens[MANUAL_NOTE]))
}

fn style_from_code(code: &str) -> Result<NoteStyle> {
    let mut digits = code.chars();
    match (digits.next(), digits.next()) {
        (Some(c), None) => c
            .to_digit(10)
            .and_then(|d| NoteStyle::from_code(d as u8))
            .ok_or_else(|| AppError::UnknownStyleCode(code.to_string())),
        _ => Err(AppError::UnknownStyleCode(code.to_string())),
    }
}

/// A field is always written between two tags, each contributing a `#` next
/// to it, so a tag can only appear if the padded value contains one.
fn check_field(name: &str, value: &str) -> Result<()> {
    if FIELD_TAG_RE.is_match(&format!("#{}#", value)) {
        return Err(AppError::MalformedNoteRecord(format!(
            "PDF note {} {:?} contains a field tag",
            name, value
        )));
    }
    Ok(())
}

fn encode_note(note: &Note) -> Result<Option<String>> {
    let Some(style) = note.style().code() else {
        tracing::debug!(text = note.text(), "Skipping deleted note");
        return Ok(None);
    };

    check_field("text", note.text())?;
    check_field("annotation", note.manual_note())?;

    // Page and the two reserved fields are not tracked and go out as 0
    let fields = [
        "0".to_string(),
        timestamp::to_millis(&note.created()),
        "0".to_string(),
        "0".to_string(),
        note.color().to_string(),
        style.to_string(),
        note.manual_note().to_string(),
        note.text().to_string(),
    ];

    let mut out = String::from(NOTE_START);
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push_str(&format!("#A{}#", i));
        }
        out.push_str(field);
    }
    out.push_str(NOTE_END);

    Ok(Some(out))
}
