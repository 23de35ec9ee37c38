#![allow(dead_code)]

use std::path::PathBuf;

use aitrace_core::{ModelPricing, PriceCatalog, PriceTier, Provider, TraceSpan, UsageSnapshot};
use aitrace_db::Db;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use tempfile::TempDir;

pub struct TestDb {
    pub _dir: TempDir,
    pub db: Db,
    pub path: PathBuf,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("test.sqlite");
    let mut db = Db::open(&path).expect("open db");
    db.migrate().expect("migrate db");
    TestDb {
        _dir: dir,
        db,
        path,
    }
}

/// One model at 1 USD per million tokens in and out.
pub fn flat_catalog() -> PriceCatalog {
    PriceCatalog::from_models(vec![ModelPricing::new(
        Provider::OpenAi,
        "gpt-test",
        vec![PriceTier {
            max_context_tokens: None,
            input_price: Decimal::ONE,
            cached_input_price: None,
            output_price: Decimal::ONE,
            thinking_output_price: None,
        }],
    )])
    .expect("catalog")
}

pub fn prompt_usage(tokens: u64) -> UsageSnapshot {
    UsageSnapshot {
        prompt_tokens: Some(tokens),
        completion_tokens: Some(0),
        ..UsageSnapshot::default()
    }
}

pub fn span(trace_id: &str, duration_ms: i64) -> TraceSpan {
    let start = NaiveDate::from_ymd_opt(2025, 3, 1)
        .and_then(|date| date.and_hms_micro_opt(9, 30, 0, 125_000))
        .expect("start");
    TraceSpan {
        trace_id: trace_id.to_string(),
        start_time: start,
        last_update_time: start + Duration::milliseconds(duration_ms),
    }
}
