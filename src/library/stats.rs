//! Reading progress model.

use serde::Serialize;

/// Progress snapshot stored in a `.po` file.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Statistics {
    timestamp: u64,
    pages: u64,
    percentage: f64,
}

impl Statistics {
    /// Create a snapshot. Negative or non-finite percentages are clamped to 0.
    pub fn new(timestamp: u64, pages: u64, percentage: f64) -> Self {
        let percentage = if percentage.is_finite() && percentage > 0.0 {
            percentage
        } else {
            0.0
        };

        Self {
            timestamp,
            pages,
            percentage,
        }
    }

    /// "No progress recorded".
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when neither pages nor percentage were recorded.
    pub fn is_empty(&self) -> bool {
        self.pages == 0 && self.percentage == 0.0
    }

    /// Raw epoch digits of the shelf entry.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Total pages known to the reader.
    pub fn pages(&self) -> u64 {
        self.pages
    }

    /// Percent read (0-100, not a ratio).
    pub fn percentage(&self) -> f64 {
        self.percentage
    }
}
