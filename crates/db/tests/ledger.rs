mod support;

use std::time::Duration;

use aitrace_core::{CostSource, Provider, StepLog};
use aitrace_db::{Db, DbError};
use rusqlite::Connection;
use rust_decimal::Decimal;
use support::{flat_catalog, prompt_usage, setup_db, span};

#[test]
fn relogged_step_moves_project_total_by_delta() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    let catalog = flat_catalog();
    let project = db.get_or_create_project("agent").expect("project");

    let first = prompt_usage(5_000);
    let step = StepLog {
        step_id: "step-1",
        description: Some("plan"),
        provider: Some(Provider::OpenAi),
        model: Some("gpt-test"),
        usage: Some(&first),
    };
    let logged = db.log_step_cost(&catalog, project.id, &step).expect("first log");
    assert_eq!(logged.project_id, project.id);
    assert_eq!(logged.outcome.project_total_cost, Decimal::new(5, 3));

    let second = prompt_usage(8_000);
    let step = StepLog {
        description: None,
        usage: Some(&second),
        ..step
    };
    let logged = db.log_step_cost(&catalog, project.id, &step).expect("second log");
    assert_eq!(logged.outcome.update.previous_cost, Decimal::new(5, 3));

    let stored = db.get_project(project.id).expect("load").expect("project");
    assert_eq!(stored.total_cost, Decimal::new(8, 3));

    let record = db.get_step_cost("step-1").expect("load").expect("record");
    assert_eq!(record.cost, Decimal::new(8, 3));
    assert_eq!(record.description.as_deref(), Some("plan"));
}

#[test]
fn unpriced_relog_keeps_stored_cost() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    let catalog = flat_catalog();
    let project = db.get_or_create_project("agent").expect("project");

    let usage = prompt_usage(5_000);
    let step = StepLog {
        step_id: "step-1",
        provider: Some(Provider::OpenAi),
        model: Some("gpt-test"),
        usage: Some(&usage),
        ..StepLog::default()
    };
    db.log_step_cost(&catalog, project.id, &step).expect("priced");

    let unknown = StepLog {
        model: Some("not-in-catalog"),
        ..step
    };
    let logged = db
        .log_step_cost(&catalog, project.id, &unknown)
        .expect("unpriced");
    assert_eq!(logged.outcome.quote.source, CostSource::Unpriced);
    assert_eq!(logged.outcome.update.record.cost, Decimal::new(5, 3));
    assert_eq!(logged.outcome.project_total_cost, Decimal::new(5, 3));
}

#[test]
fn step_relogged_under_other_project_stays_with_owner() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    let catalog = flat_catalog();
    let owner = db.get_or_create_project("owner").expect("owner");
    let other = db.get_or_create_project("other").expect("other");

    let first = prompt_usage(2_000);
    let step = StepLog {
        step_id: "shared",
        provider: Some(Provider::OpenAi),
        model: Some("gpt-test"),
        usage: Some(&first),
        ..StepLog::default()
    };
    db.log_step_cost(&catalog, owner.id, &step).expect("owner log");

    let second = prompt_usage(3_000);
    let step = StepLog {
        usage: Some(&second),
        ..step
    };
    let logged = db.log_step_cost(&catalog, other.id, &step).expect("other log");
    assert_eq!(logged.project_id, owner.id);

    let owner = db.get_project(owner.id).expect("load").expect("owner");
    let other = db.get_project(other.id).expect("load").expect("other");
    assert_eq!(owner.total_cost, Decimal::new(3, 3));
    assert_eq!(other.total_cost, Decimal::ZERO);
}

#[test]
fn trace_average_tracks_new_and_extended_traces() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    let project = db.get_or_create_project("agent").expect("project");

    let logged = db.log_trace(project.id, &span("t1", 5_000)).expect("t1");
    assert!(logged.outcome.new_trace);
    assert_eq!(logged.outcome.average_duration_ms, 5_000);

    let logged = db.log_trace(project.id, &span("t2", 7_000)).expect("t2");
    assert_eq!(logged.outcome.trace_count, 2);
    assert_eq!(logged.outcome.average_duration_ms, 6_000);

    let logged = db.log_trace(project.id, &span("t1", 9_000)).expect("t1 again");
    assert!(!logged.outcome.new_trace);
    assert_eq!(logged.outcome.previous_duration_ms, Some(5_000));
    assert_eq!(logged.outcome.trace_count, 2);
    assert_eq!(logged.outcome.average_duration_ms, 8_000);

    let stored = db.get_project(project.id).expect("load").expect("project");
    assert_eq!(stored.average_duration_ms, 8_000);
    assert_eq!(stored.trace_count, 2);
    assert_eq!(db.trace_count_for_project(project.id).expect("count"), 2);

    let trace = db.get_trace("t1").expect("load").expect("trace");
    assert_eq!(trace.duration_ms(), 9_000);
}

#[test]
fn unknown_project_is_reported() {
    let mut test_db = setup_db();
    let err = test_db
        .db
        .log_trace(42, &span("t1", 1_000))
        .expect_err("missing project");
    assert!(matches!(err, DbError::MissingProject(42)));
}

#[test]
fn locked_database_surfaces_as_conflict() {
    let test_db = setup_db();
    let project = test_db.db.get_or_create_project("agent").expect("project");

    let holder = Connection::open(&test_db.path).expect("open holder");
    holder.execute_batch("BEGIN IMMEDIATE;").expect("hold write lock");

    let mut contender =
        Db::open_with_busy_timeout(&test_db.path, Duration::from_millis(0)).expect("open");
    let err = contender
        .log_trace(project.id, &span("t1", 1_000))
        .expect_err("write lock held");
    assert!(err.is_conflict());

    holder.execute_batch("ROLLBACK;").expect("release");
    contender
        .log_trace(project.id, &span("t1", 1_000))
        .expect("retry succeeds");
}
