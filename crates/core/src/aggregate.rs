use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Running per-project statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProjectAggregate {
    pub total_cost: Decimal,
    pub average_duration_ms: i64,
    pub trace_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub total_cost: Decimal,
    pub average_duration_ms: i64,
    pub trace_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn aggregate(&self) -> ProjectAggregate {
        ProjectAggregate {
            total_cost: self.total_cost,
            average_duration_ms: self.average_duration_ms,
            trace_count: self.trace_count,
        }
    }
}

pub fn apply_cost_delta(total_cost: Decimal, delta: Decimal) -> Decimal {
    total_cost + delta
}

/// `old_avg + (new_duration - prior_contribution) / trace_count`, truncated.
///
/// `prior_contribution` is the trace's previous duration when it was already counted, and
/// `old_avg` itself for a trace seen for the first time. `trace_count` includes the trace.
pub fn next_average_duration(
    old_avg: i64,
    prior_contribution: i64,
    new_duration: i64,
    trace_count: u64,
) -> i64 {
    if trace_count == 0 {
        return old_avg;
    }
    let count = i64::try_from(trace_count).unwrap_or(i64::MAX);
    old_avg.saturating_add(new_duration.saturating_sub(prior_contribution) / count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_delta_avoids_double_counting() {
        let total = Decimal::ZERO;
        let total = apply_cost_delta(total, Decimal::new(5, 3) - Decimal::ZERO);
        assert_eq!(total, Decimal::new(5, 3));
        let total = apply_cost_delta(total, Decimal::new(8, 3) - Decimal::new(5, 3));
        assert_eq!(total, Decimal::new(8, 3));
    }

    #[test]
    fn running_average_over_new_and_relogged_traces() {
        // first trace, count 1
        let avg = next_average_duration(0, 0, 5_000, 1);
        assert_eq!(avg, 5_000);
        // second trace is new: prior contribution is the old average
        let avg = next_average_duration(avg, avg, 7_000, 2);
        assert_eq!(avg, 6_000);
        // first trace extended, count unchanged
        let avg = next_average_duration(avg, 5_000, 9_000, 2);
        assert_eq!(avg, 8_000);
    }

    #[test]
    fn average_uses_truncating_division() {
        assert_eq!(next_average_duration(1_000, 1_000, 1_002, 3), 1_000);
        assert_eq!(next_average_duration(1_000, 1_000, 998, 3), 1_000);
        assert_eq!(next_average_duration(1_000, 1_000, 994, 3), 998);
    }

    #[test]
    fn zero_count_keeps_average() {
        assert_eq!(next_average_duration(4_200, 0, 9_000, 0), 4_200);
    }
}
