//! `.po` progress records: `<timestamp>*<pages>[@n][#n]:<percentage>%`.

use crate::error::{AppError, Result};
use crate::library::stats::Statistics;
use regex::Regex;
use std::sync::LazyLock;

/// The `@` and `#` groups are reader-internal counters and are not kept.
static STATISTICS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<timestamp>\d+)\*(?P<pages>\d+)(?:@\d+)?(?:#\d+)?:(?P<percentage>\d+(?:\.\d+)?)%")
        .expect("statistics pattern is valid")
});

/// Parse a progress record.
pub fn decode(text: &str) -> Result<Statistics> {
    let caps = STATISTICS_RE
        .captures(text)
        .ok_or_else(|| AppError::MalformedStatistics(format!("unrecognised record {:?}", text)))?;

    let timestamp = caps["timestamp"]
        .parse::<u64>()
        .map_err(|e| AppError::MalformedStatistics(format!("timestamp: {}", e)))?;
    let pages = caps["pages"]
        .parse::<u64>()
        .map_err(|e| AppError::MalformedStatistics(format!("pages: {}", e)))?;
    let percentage = caps["percentage"]
        .parse::<f64>()
        .map_err(|e| AppError::MalformedStatistics(format!("percentage: {}", e)))?;

    Ok(Statistics::new(timestamp, pages, percentage))
}

/// Write the canonical form, without the optional counter groups.
pub fn encode(stats: &Statistics) -> String {
    format!(
        "{}*{}:{}%",
        stats.timestamp(),
        stats.pages(),
        stats.percentage()
    )
}
