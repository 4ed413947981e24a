//! Integration tests for `RemindersService` driven entirely through JSON.
//!
//! Uses the in-memory store so every test starts from a known state.

use std::sync::Arc;

use remkit::RemindersService;
use remkit::model::{Reminder, ReminderList};
use remkit::mutation::{AllowAll, SandboxPolicy};
use remkit::query::QueryLimits;
use remkit::store::MockReminderStore;
use serde_json::{Value, json};

fn lists() -> Vec<ReminderList> {
    vec![
        ReminderList {
            id: "L-home".to_owned(),
            name: "Home".to_owned(),
            is_default: true,
        },
        ReminderList {
            id: "L-work".to_owned(),
            name: "Work".to_owned(),
            is_default: false,
        },
    ]
}

fn service_with(reminders: Vec<Reminder>) -> RemindersService {
    RemindersService::new(
        Arc::new(MockReminderStore::new(lists(), reminders)),
        Arc::new(AllowAll),
        QueryLimits::default(),
    )
}

fn service() -> RemindersService {
    service_with(vec![])
}

fn titles(items: &Value) -> Vec<&str> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap())
        .collect()
}

#[test]
fn create_without_list_lands_in_default_list_incomplete() {
    let svc = service();
    let created = svc.create_many(vec![json!({"title": "Buy milk"})]).unwrap();
    let item = &created.as_array().unwrap()[0];
    assert_eq!(item["listName"], "Home");
    assert_eq!(item["isCompleted"], false);
}

#[test]
fn batch_create_reports_the_invalid_index() {
    let svc = service();
    let out = svc
        .create_many(vec![
            json!({"title": "one"}),
            json!({"title": "two"}),
            json!({"title": "bad", "dueDate": "someday"}),
            json!({"title": "four"}),
        ])
        .unwrap();
    assert_eq!(out["created"].as_array().unwrap().len(), 3);
    assert_eq!(out["failed"].as_array().unwrap().len(), 1);
    assert_eq!(out["failed"][0]["index"], 2);
    assert_eq!(out["failed"][0]["code"], "PARSE_ERROR");
    assert!(out["failed"][0]["error"].as_str().unwrap().contains("someday"));
}

#[test]
fn relative_alarm_offset_survives_round_trip() {
    let svc = service();
    let created = svc
        .create_many(vec![json!({
            "title": "Meeting",
            "dueDate": "2026-06-01T10:00:00+02:00",
            "alarms": [{"type": "relative", "offset": 3600}]
        })])
        .unwrap();
    assert_eq!(
        created[0]["alarms"],
        json!([{"type": "relative", "offset": 3600}])
    );
}

#[test]
fn dates_always_carry_a_numeric_offset() {
    let svc = service();
    for input in [
        "2026-06-01T10:00:00Z",
        "2026-06-01T10:00:00.250Z",
        "2026-06-01T10:00:00+05:30",
        "2026-06-01T10:00",
        "2026-06-01",
    ] {
        let created = svc
            .create_many(vec![json!({"title": input, "dueDate": input})])
            .unwrap();
        let due = created[0]["dueDate"].as_str().unwrap();
        assert!(!due.ends_with('Z'), "{input} rendered as {due}");
        let offset = &due[due.len() - 6..];
        assert!(
            offset.starts_with('+') || offset.starts_with('-'),
            "{input} rendered as {due}"
        );
    }
}

#[test]
fn update_omit_clear_and_set() {
    let svc = service();
    let created = svc
        .create_many(vec![json!({
            "title": "Water plants",
            "notes": "balcony",
            "dueDate": "2026-07-01",
            "url": "https://plants.example/care",
            "alarms": [{"type": "absolute", "date": "2026-06-30T18:00:00+00:00"}],
            "recurrence": {"frequency": "weekly", "interval": 2, "daysOfWeek": ["saturday"]}
        })])
        .unwrap();
    let id = created[0]["id"].clone();

    let omitted = svc.update_many(vec![json!({"id": id, "title": "Water all plants"})]).unwrap();
    assert_eq!(omitted[0]["title"], "Water all plants");
    assert_eq!(omitted[0]["notes"], "balcony");
    assert_eq!(omitted[0]["recurrence"]["interval"], 2);

    let cleared = svc
        .update_many(vec![json!({
            "id": id,
            "notes": null,
            "dueDate": null,
            "url": null,
            "alarms": null,
            "recurrence": null
        })])
        .unwrap();
    assert_eq!(cleared[0]["notes"], Value::Null);
    assert_eq!(cleared[0]["dueDate"], Value::Null);
    assert_eq!(cleared[0]["dueDateIncludesTime"], false);
    assert_eq!(cleared[0]["url"], Value::Null);
    assert_eq!(cleared[0]["alarms"], json!([]));
    assert_eq!(cleared[0]["recurrence"], Value::Null);

    let set = svc
        .update_many(vec![json!({
            "id": id,
            "notes": "indoor too",
            "priority": "high",
            "dueDate": "2026-07-02T08:30:00-04:00"
        })])
        .unwrap();
    assert_eq!(set[0]["notes"], "indoor too");
    assert_eq!(set[0]["priority"], "high");
    assert_eq!(set[0]["dueDate"], "2026-07-02T08:30:00-04:00");
    assert_eq!(set[0]["dueDateIncludesTime"], true);
}

#[test]
fn update_batch_reports_failures_by_id() {
    let svc = service();
    let created = svc.create_many(vec![json!({"title": "ok"})]).unwrap();
    let out = svc
        .update_many(vec![
            json!({"id": created[0]["id"], "priority": "low"}),
            json!({"id": "missing", "priority": "low"}),
            json!({"priority": "low"}),
        ])
        .unwrap();
    assert_eq!(out["updated"].as_array().unwrap().len(), 1);
    assert_eq!(out["failed"][0]["id"], "missing");
    assert_eq!(out["failed"][1]["id"], Value::Null);
    assert_eq!(out["failed"][1]["code"], "VALIDATION_ERROR");
}

#[test]
fn output_detail_presets() {
    let svc = service();
    svc.create_many(vec![json!({"title": "Pack bags", "notes": "passport"})])
        .unwrap();

    let minimal = svc.query(json!({"outputDetail": "minimal"})).unwrap();
    assert!(minimal[0].get("notes").is_none());
    assert!(minimal[0].get("priority").is_none());

    let compact = svc.query(json!({})).unwrap();
    assert_eq!(compact[0]["notes"], "passport");
    assert!(compact[0].get("listName").is_none());
    assert!(compact[0].get("dueDate").is_none());

    let full = svc.query(json!({"outputDetail": "full"})).unwrap();
    for key in [
        "id",
        "title",
        "notes",
        "listId",
        "listName",
        "isCompleted",
        "priority",
        "dueDate",
        "dueDateIncludesTime",
        "completionDate",
        "creationDate",
        "lastModifiedDate",
        "url",
        "alarms",
        "recurrence",
    ] {
        assert!(full[0].get(key).is_some(), "full output missing {key}");
    }
    assert_eq!(full[0]["dueDate"], Value::Null);
}

#[test]
fn sorting_by_priority_and_due_date() {
    let svc = service();
    svc.create_many(vec![
        json!({"title": "none"}),
        json!({"title": "low", "priority": "low", "dueDate": "2026-05-03"}),
        json!({"title": "high", "priority": "high", "dueDate": "2026-05-02"}),
        json!({"title": "medium", "priority": "medium", "dueDate": "2026-05-01"}),
    ])
    .unwrap();

    let by_priority = svc.query(json!({"sortBy": "priority"})).unwrap();
    assert_eq!(titles(&by_priority), vec!["high", "medium", "low", "none"]);

    let by_due = svc.query(json!({"sortBy": "dueDate"})).unwrap();
    assert_eq!(titles(&by_due), vec!["medium", "high", "low", "none"]);
}

#[test]
fn date_range_excludes_undated_incomplete_reminders() {
    let svc = service();
    svc.create_many(vec![
        json!({"title": "dated", "dueDate": "2026-05-10T09:00:00+00:00"}),
        json!({"title": "undated"}),
    ])
    .unwrap();
    let out = svc
        .query(json!({"dateFrom": "2026-05-01", "dateTo": "2026-05-31"}))
        .unwrap();
    assert_eq!(titles(&out), vec!["dated"]);
}

#[test]
fn selectors_exclusive_across_the_service() {
    let svc = service();
    for list in [json!({"id": "L-work"}), json!({"name": "work"}), json!({"all": true})] {
        assert!(svc.query(json!({"list": list})).is_ok());
    }
    for list in [
        json!({"id": "L-work", "name": "Work"}),
        json!({"name": "Work", "all": true}),
        json!({"id": "L-work", "all": true}),
    ] {
        let err = svc.query(json!({"list": list})).unwrap_err();
        assert_eq!(err.code(), "AMBIGUOUS_SELECTOR");
    }
    let out = svc
        .create_many(vec![json!({"title": "x", "list": {"all": true}})])
        .unwrap();
    assert_eq!(out["failed"][0]["code"], "INVALID_SELECTOR");
}

#[test]
fn projection_over_all_lists() {
    let svc = service();
    svc.create_many(vec![
        json!({"title": "home chore"}),
        json!({"title": "work task", "list": {"name": "Work"}, "priority": "high"}),
    ])
    .unwrap();
    let out = svc
        .query(json!({
            "list": {"all": true},
            "query": "map(select(.priority == \"high\")) | map(.listName)"
        }))
        .unwrap();
    assert_eq!(out, json!(["Work"]));

    let err = svc
        .query(json!({"query": "map(select(.priority =="}))
        .unwrap_err();
    assert_eq!(err.code(), "PARSE_ERROR");
}

#[test]
fn completed_reminders_are_hidden_by_default() {
    let svc = service();
    let created = svc
        .create_many(vec![json!({"title": "done", "completed": true}), json!({"title": "todo"})])
        .unwrap();
    assert_eq!(created.as_array().unwrap().len(), 2);

    assert_eq!(titles(&svc.query(json!({})).unwrap()), vec!["todo"]);
    assert_eq!(
        titles(&svc.query(json!({"status": "completed"})).unwrap()),
        vec!["done"]
    );
    let all = svc.query(json!({"status": "all"})).unwrap();
    assert_eq!(all.as_array().unwrap().len(), 2);
    assert!(all[0].get("isCompleted").is_some());
}

#[test]
fn sandbox_policy_limits_every_write() {
    let svc = RemindersService::new(
        Arc::new(MockReminderStore::new(lists(), vec![])),
        Arc::new(SandboxPolicy::new(["Work"])),
        QueryLimits::default(),
    );
    let out = svc
        .create_many(vec![
            json!({"title": "allowed", "list": {"name": "Work"}}),
            json!({"title": "blocked"}),
        ])
        .unwrap();
    assert_eq!(out["created"].as_array().unwrap().len(), 1);
    assert_eq!(out["failed"][0]["code"], "POLICY_VIOLATION");

    let id = out["created"][0]["id"].as_str().unwrap().to_owned();
    let moved = svc
        .update_many(vec![json!({"id": id, "list": {"name": "Home"}})])
        .unwrap();
    assert_eq!(moved["failed"][0]["code"], "POLICY_VIOLATION");

    let deleted = svc.delete_many(vec![id.clone()]).unwrap();
    assert_eq!(deleted, json!({"deleted": [id], "failed": []}));
}

#[test]
fn limit_is_capped() {
    let svc = RemindersService::new(
        Arc::new(MockReminderStore::new(lists(), vec![])),
        Arc::new(AllowAll),
        QueryLimits {
            default_limit: 2,
            max_limit: 3,
        },
    );
    let items = (0..5).map(|i| json!({"title": format!("t{i}")})).collect();
    svc.create_many(items).unwrap();
    assert_eq!(svc.query(json!({})).unwrap().as_array().unwrap().len(), 2);
    assert_eq!(
        svc.query(json!({"limit": 100})).unwrap().as_array().unwrap().len(),
        3
    );
}

#[test]
fn non_ascii_list_names_match_without_case() {
    let svc = RemindersService::new(
        Arc::new(MockReminderStore::new(lists(), vec![])),
        Arc::new(SandboxPolicy::new(["éphémères"])),
        QueryLimits::default(),
    );
    svc.create_list("Éphémères").unwrap();
    assert_eq!(
        svc.create_list("ÉPHÉMÈRES").unwrap_err().code(),
        "VALIDATION_ERROR"
    );

    let created = svc
        .create_many(vec![json!({"title": "fleurs", "list": {"name": "éphémères"}})])
        .unwrap();
    assert_eq!(created[0]["listName"], "Éphémères");

    let found = svc
        .query(json!({"list": {"name": "ÉPHÉMÈRES"}, "outputDetail": "minimal"}))
        .unwrap();
    assert_eq!(titles(&found), vec!["fleurs"]);
}

#[test]
fn unbounded_projection_stops_at_the_limit() {
    let svc = service();
    svc.create_many(vec![json!({"title": "only"})]).unwrap();
    let out = svc
        .query(json!({"query": "range(1000000000)", "limit": 5}))
        .unwrap();
    assert_eq!(out, json!([0, 1, 2, 3, 4]));
}
