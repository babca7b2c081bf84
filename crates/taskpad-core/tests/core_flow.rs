use std::ffi::OsString;
use std::fs;
use std::path::Path;

use chrono::{Local, TimeZone};
use serde_json::Value;
use taskpad_core::datastore::{FileStore, STORE_FILE_NAME};
use taskpad_shared::storage::KeyValueStore;
use taskpad_shared::{Priority, Session, TaskDraft, Toggle, View};
use tempfile::tempdir;

fn run_cli(data: &Path, rc: &Path, args: &[&str]) {
    let mut argv: Vec<OsString> = vec![
        "taskpad".into(),
        "--data".into(),
        data.as_os_str().to_os_string(),
        "--taskpadrc".into(),
        rc.as_os_str().to_os_string(),
        "rc.celebrate=off".into(),
        "rc.color=off".into(),
    ];
    argv.extend(args.iter().map(OsString::from));
    taskpad_core::run(argv).expect("command should succeed");
}

#[test]
fn session_state_persists_in_store_file() {
    let temp = tempdir().expect("tempdir");
    let now = Local.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();

    let store = FileStore::open(temp.path()).expect("open store");
    let mut session = Session::open(store);
    let id = session
        .add_task(
            TaskDraft::new("Buy milk")
                .priority(Priority::Low)
                .deadline("2026-10-19T18:00"),
        )
        .expect("add")
        .expect("non-blank text");
    assert_eq!(session.toggle_task(id, now).expect("toggle"), Toggle::Completed);

    let raw = fs::read_to_string(temp.path().join(STORE_FILE_NAME)).expect("read store");
    let entries: Value = serde_json::from_str(&raw).expect("store is json");
    assert_eq!(entries["points"], "10");
    assert_eq!(entries["streak"], "1");
    assert_eq!(entries["lastCompletedDate"], "Mon Oct 19 2026");

    let tasks: Value = serde_json::from_str(entries["tasks"].as_str().expect("tasks string"))
        .expect("tasks json");
    assert_eq!(tasks[0]["text"], "Buy milk");
    assert_eq!(tasks[0]["priority"], "low");
    assert_eq!(tasks[0]["deadline"], "2026-10-19T18:00");
    assert_eq!(tasks[0]["completed"], true);

    let mut reopened = Session::open(FileStore::open(temp.path()).expect("reopen"));
    assert_eq!(reopened.tasks().len(), 1);
    assert_eq!(reopened.gamification().points, 10);
    reopened.set_view(View::Completed);
    assert_eq!(reopened.frame(now).rows().len(), 1);
}

#[test]
fn legacy_records_without_ids_load() {
    let temp = tempdir().expect("tempdir");
    let tasks = r#"[{"text":"Old task","priority":"high","deadline":"","completed":false}]"#;
    let seeded = serde_json::json!({ "tasks": tasks, "points": "20", "streak": "2" });
    fs::write(temp.path().join(STORE_FILE_NAME), seeded.to_string()).expect("seed");

    let session = Session::open(FileStore::open(temp.path()).expect("open store"));
    assert_eq!(session.tasks()[0].text, "Old task");
    assert_eq!(session.tasks()[0].priority, Priority::High);
    assert_eq!(session.tasks()[0].deadline, None);
    assert_eq!(session.gamification().streak, 2);
    assert_eq!(session.gamification().last_completed_date, None);
}

#[test]
fn commands_add_complete_and_delete() {
    let temp = tempdir().expect("tempdir");
    let data = temp.path().join("data");
    let rc = temp.path().join("taskpadrc");
    fs::write(&rc, "default.view = all\n").expect("write rc");

    run_cli(&data, &rc, &["add", "Buy", "milk", "--priority", "low"]);
    run_cli(&data, &rc, &["add", "Walk", "dog", "--due", "2020-01-01"]);
    run_cli(&data, &rc, &["done", "1"]);
    run_cli(&data, &rc, &["list", "completed", "--search", "MILK"]);
    run_cli(&data, &rc, &["dashboard"]);
    run_cli(&data, &rc, &["stats"]);
    run_cli(&data, &rc, &["watch", "--once", "rc.notify=off"]);

    let store = FileStore::open(&data).expect("open store");
    assert_eq!(store.get_item("points").expect("get").as_deref(), Some("10"));

    let walk_dog = Session::open(FileStore::open(&data).expect("open store")).tasks()[1].id;
    run_cli(&data, &rc, &["delete", &walk_dog.to_string()]);

    let session = Session::open(FileStore::open(&data).expect("open store"));
    assert_eq!(session.tasks().len(), 1);
    assert_eq!(session.tasks()[0].text, "Buy milk");
    assert!(session.tasks()[0].completed);
}

#[test]
fn bad_reference_is_an_error() {
    let temp = tempdir().expect("tempdir");
    let rc = temp.path().join("taskpadrc");
    fs::write(&rc, "").expect("write rc");

    let argv: Vec<OsString> = ["taskpad", "--data"]
        .iter()
        .map(OsString::from)
        .chain([temp.path().as_os_str().to_os_string()])
        .chain(["--taskpadrc".into(), rc.as_os_str().to_os_string(), "done".into(), "4".into()])
        .collect();
    assert!(taskpad_core::run(argv).is_err());
}
