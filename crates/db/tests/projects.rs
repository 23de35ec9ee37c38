mod support;

use aitrace_core::{Provider, StepLog};
use rust_decimal::Decimal;
use support::{flat_catalog, prompt_usage, setup_db};

#[test]
fn get_or_create_project_reuses_existing_name() {
    let test_db = setup_db();
    let first = test_db.db.get_or_create_project("agent").expect("create");
    let second = test_db.db.get_or_create_project("agent").expect("reuse");
    assert_eq!(first.id, second.id);
    assert_eq!(first.total_cost, Decimal::ZERO);
    assert_eq!(first.average_duration_ms, 0);
    assert_eq!(first.trace_count, 0);
}

#[test]
fn list_projects_orders_by_name() {
    let test_db = setup_db();
    test_db.db.get_or_create_project("zeta").expect("zeta");
    test_db.db.get_or_create_project("alpha").expect("alpha");
    let names: Vec<String> = test_db
        .db
        .list_projects()
        .expect("list")
        .into_iter()
        .map(|project| project.name)
        .collect();
    assert_eq!(names, vec!["alpha".to_string(), "zeta".to_string()]);
}

#[test]
fn missing_project_lookup_is_none() {
    let test_db = setup_db();
    assert!(test_db.db.get_project_by_name("nope").expect("load").is_none());
    assert!(test_db.db.get_project(99).expect("load").is_none());
}

#[test]
fn step_costs_for_ids_skips_unknown_steps() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    let catalog = flat_catalog();
    let project = db.get_or_create_project("agent").expect("project");
    for (step_id, tokens) in [("a", 1_000), ("b", 2_000)] {
        let usage = prompt_usage(tokens);
        let step = StepLog {
            step_id,
            provider: Some(Provider::OpenAi),
            model: Some("gpt-test"),
            usage: Some(&usage),
            ..StepLog::default()
        };
        db.log_step_cost(&catalog, project.id, &step).expect("log");
    }

    let records = db.step_costs_for_ids(&["b", "missing", "a"]).expect("load");
    let costs: Vec<(String, Decimal)> = records
        .into_iter()
        .map(|record| (record.step_id, record.cost))
        .collect();
    assert_eq!(
        costs,
        vec![
            ("b".to_string(), Decimal::new(2, 3)),
            ("a".to_string(), Decimal::new(1, 3)),
        ]
    );

    let project = db.get_project(project.id).expect("load").expect("project");
    assert_eq!(project.total_cost, Decimal::new(3, 3));
}
