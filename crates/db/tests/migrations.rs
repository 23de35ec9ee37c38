mod support;

use rusqlite::Connection;
use support::setup_db;

fn table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .expect("prepare");
    stmt.query_map([], |row| row.get(0))
        .expect("query")
        .collect::<Result<Vec<String>, _>>()
        .expect("collect")
}

#[test]
fn migrate_creates_ledger_tables() {
    let test_db = setup_db();
    let conn = Connection::open(&test_db.path).expect("open conn");
    let tables = table_names(&conn);
    for table in ["project", "step_cost", "trace"] {
        assert!(tables.iter().any(|name| name == table), "missing {table}");
    }
}

#[test]
fn migrate_is_idempotent_and_keeps_data() {
    let mut test_db = setup_db();
    let project = test_db.db.get_or_create_project("agent").expect("project");
    test_db.db.migrate().expect("second migrate");
    let reloaded = test_db
        .db
        .get_project_by_name("agent")
        .expect("load")
        .expect("project");
    assert_eq!(reloaded.id, project.id);
}
