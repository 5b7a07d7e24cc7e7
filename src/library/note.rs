//! Highlight and annotation model.

use crate::formats::color::Color;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// How the reader marks a passage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteStyle {
    /// Background highlight.
    Selected,
    /// Strike-through.
    CrossedOut,
    /// Straight underline.
    StraightUnderline,
    /// Wavy underline.
    WavyUnderline,
    /// Tombstone left behind when a note is removed.
    Deleted,
}

impl NoteStyle {
    /// Numeric code used by both note formats. `Deleted` has none.
    pub fn code(&self) -> Option<u8> {
        match self {
            NoteStyle::Selected => Some(0),
            NoteStyle::StraightUnderline => Some(1),
            NoteStyle::CrossedOut => Some(2),
            NoteStyle::WavyUnderline => Some(3),
            NoteStyle::Deleted => None,
        }
    }

    /// Inverse of [`NoteStyle::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(NoteStyle::Selected),
            1 => Some(NoteStyle::StraightUnderline),
            2 => Some(NoteStyle::CrossedOut),
            3 => Some(NoteStyle::WavyUnderline),
            _ => None,
        }
    }
}

/// One highlighted passage or manual annotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    text: String,
    created: DateTime<Utc>,
    style: NoteStyle,
    color: Color,
    #[serde(rename = "note")]
    manual_note: String,
    #[serde(skip)]
    modifier: u8,
}

impl Note {
    /// Create a highlight with the reader's defaults: selected, cyan.
    pub fn new(text: impl Into<String>, created: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            created,
            style: NoteStyle::Selected,
            color: Color::DEFAULT,
            manual_note: String::new(),
            modifier: 0,
        }
    }

    /// Set the style; the raw modifier follows unless the note is deleted.
    pub fn with_style(mut self, style: NoteStyle) -> Self {
        if let Some(code) = style.code() {
            self.modifier = code;
        }
        self.style = style;
        self
    }

    /// Set the colour.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Attach a free-text annotation.
    pub fn with_manual_note(mut self, note: impl Into<String>) -> Self {
        self.manual_note = note.into();
        self
    }

    /// Set the raw 3-bit modifier without touching the style.
    pub fn with_modifier(mut self, modifier: u8) -> Self {
        self.modifier = modifier & 0b111;
        self
    }

    /// Highlighted passage.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Creation time, second precision.
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Visual style or tombstone.
    pub fn style(&self) -> NoteStyle {
        self.style
    }

    /// Highlight colour.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Annotation typed by the reader, empty if none.
    pub fn manual_note(&self) -> &str {
        &self.manual_note
    }

    /// Raw modifier bits as stored by the reader (0-7).
    pub fn modifier(&self) -> u8 {
        self.modifier
    }

    /// Whether the note was removed in the reader.
    pub fn is_deleted(&self) -> bool {
        self.style == NoteStyle::Deleted
    }

    /// Whether this is an annotation without a highlighted passage.
    pub fn is_manual_only(&self) -> bool {
        self.text.is_empty() && !self.manual_note.is_empty()
    }

    /// Colour as `#RRGGBB`.
    pub fn rgb_hex(&self) -> String {
        self.color.rgb_hex()
    }
}
