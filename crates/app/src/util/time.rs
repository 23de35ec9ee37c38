use aitrace_core::TIMESTAMP_FORMAT;
use chrono::NaiveDateTime;

use crate::error::{AppError, Result};

/// Parses `yyyy-MM-dd HH:mm:ss` with an optional fraction of up to six digits.
pub fn parse_trace_timestamp(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    if let Some((_, fraction)) = value.split_once('.')
        && fraction.len() > 6
    {
        return Err(AppError::InvalidInput(format!(
            "invalid timestamp {value}: at most six fractional digits"
        )));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .map_err(|err| AppError::InvalidInput(format!("invalid timestamp {value}: {err}")))
}

pub fn format_trace_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}
