use std::fmt::Write as _;

use crate::error::SinkError;

pub(super) fn write_line(output: &mut String, line: &str) -> Result<(), SinkError> {
    writeln!(output, "{}", line).map_err(|err| SinkError::WriteLine { source: err })
}

/// Rounds to four decimal places; non-finite values become zero.
pub(crate) fn round4(value: f64) -> f64 {
    if value.is_finite() {
        (value * 10_000.0).round() / 10_000.0
    } else {
        0.0
    }
}

pub(super) fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", round4(ratio) * 100.0)
}
