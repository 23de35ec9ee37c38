use chrono::NaiveDateTime;
use serde::Serialize;

/// Wire format for trace timestamps; the fractional part is optional on input.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceSpan {
    pub trace_id: String,
    pub start_time: NaiveDateTime,
    pub last_update_time: NaiveDateTime,
}

impl TraceSpan {
    pub fn duration_ms(&self) -> i64 {
        (self.last_update_time - self.start_time).num_milliseconds()
    }
}
