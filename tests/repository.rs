use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroUsize;
use std::thread::sleep;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use interop_results::domain::test_run::{NewTestCase, NewTestRun, ResultsFilter};
use interop_results::domain::types::{Cpid, DurationSeconds, TestRunId};
use interop_results::filters::{LIST_PARAMS, parse_filters};
use interop_results::models::config::DEFAULT_INPUT_DATE_FORMAT;
use interop_results::models::test_run::NewTestRun as DbNewTestRun;
use interop_results::pagination::paginate;
use interop_results::repository::{
    DieselRepository, TestRunListQuery, TestRunReader, TestRunWriter,
};
use interop_results::schema::test_runs;

mod common;

fn new_run(cpid: &str, cases: &[&str]) -> NewTestRun {
    NewTestRun::new(
        Cpid::new(cpid).unwrap(),
        DurationSeconds::new(30).unwrap(),
        cases
            .iter()
            .map(|name| NewTestCase::new(*name, None))
            .collect(),
        None,
    )
}

/// Inserts a run row with a fixed creation time.
fn insert_at(test_db: &common::TestDb, id: &str, created_at: NaiveDateTime) {
    let mut conn = test_db.pool().get().unwrap();
    diesel::insert_into(test_runs::table)
        .values(&DbNewTestRun {
            id: id.to_string(),
            cpid: "cloud",
            duration_seconds: 1,
            created_at,
        })
        .execute(&mut conn)
        .unwrap();
}

fn at(day: u32, hour: u32, min: u32, sec: u32, nano: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, day)
        .and_then(|d| d.and_hms_nano_opt(hour, min, sec, nano))
        .unwrap()
}

/// Stores runs with a short pause so creation times are distinct.
fn store_all(repo: &DieselRepository, runs: &[NewTestRun]) -> Vec<TestRunId> {
    runs.iter()
        .map(|run| {
            let id = repo.create_test_run(run).unwrap();
            sleep(Duration::from_millis(5));
            id
        })
        .collect()
}

#[test]
fn test_create_and_fetch_test_run() {
    let test_db = common::TestDb::new("test_create_and_fetch_test_run.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    let metadata = BTreeMap::from([("region".to_string(), "eu-west".to_string())]);
    let submitted = NewTestRun::new(
        Cpid::new("abc123").unwrap(),
        DurationSeconds::new(5).unwrap(),
        vec![
            NewTestCase::new("tempest.api.test_b", Some("uid-b".to_string())),
            NewTestCase::new("tempest.api.test_a", None),
        ],
        Some(metadata),
    )
    .with_public_key("ssh-rsa AAAA");

    let id = repo.create_test_run(&submitted).unwrap();

    let run = repo.get_test_run(&id).unwrap().unwrap();
    assert_eq!(run.id, id);
    assert_eq!(run.cpid.as_str(), "abc123");
    assert_eq!(run.duration_seconds.get(), 5);
    assert_eq!(run.metadata.len(), 2);
    assert_eq!(run.metadata["public_key"], "ssh-rsa AAAA");
    assert!(run.created_at <= Utc::now().naive_utc());

    let names = repo.list_test_case_names(&id).unwrap();
    assert_eq!(names, vec!["tempest.api.test_b", "tempest.api.test_a"]);
}

#[test]
fn test_unknown_run_is_absent() {
    let test_db = common::TestDb::new("test_unknown_run_is_absent.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    let id = TestRunId::new();
    assert!(repo.get_test_run(&id).unwrap().is_none());
    assert!(repo.list_test_case_names(&id).unwrap().is_empty());
}

#[test]
fn test_list_orders_newest_first_and_paginates() {
    let test_db = common::TestDb::new("test_list_orders_newest_first_and_paginates.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    let runs: Vec<NewTestRun> = (0..5)
        .map(|i| new_run(&format!("cloud-{i}"), &["tempest.api.test_one"]))
        .collect();
    let ids = store_all(&repo, &runs);

    let filter = ResultsFilter::new();
    let total = repo.count_test_runs(&filter).unwrap();
    assert_eq!(total, 5);

    let per_page = NonZeroUsize::new(2).unwrap();
    let first = repo
        .list_test_runs(TestRunListQuery::new(filter.clone()).paginate(paginate(
            total,
            None,
            per_page,
        )))
        .unwrap();
    let last = repo
        .list_test_runs(TestRunListQuery::new(filter.clone()).paginate(paginate(
            total,
            Some(3),
            per_page,
        )))
        .unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first[0].id, ids[4]);
    assert_eq!(first[1].id, ids[3]);
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].id, ids[0]);

    let all = repo.list_test_runs(TestRunListQuery::new(filter)).unwrap();
    assert!(
        all.windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at)
    );
}

#[test]
fn test_filters_by_cpid_and_date_range() {
    let test_db = common::TestDb::new("test_filters_by_cpid_and_date_range.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    let before = store_all(&repo, &[new_run("alpha", &["t1"]), new_run("beta", &["t1"])]);
    let window_start = Utc::now().naive_utc();
    sleep(Duration::from_millis(5));
    let inside = store_all(&repo, &[new_run("alpha", &["t2"]), new_run("beta", &["t2"])]);
    let window_end = Utc::now().naive_utc();
    sleep(Duration::from_millis(5));
    store_all(&repo, &[new_run("alpha", &["t3"])]);

    let alpha = ResultsFilter::new().cpid("alpha");
    assert_eq!(repo.count_test_runs(&alpha).unwrap(), 3);
    let alpha_runs = repo.list_test_runs(TestRunListQuery::new(alpha)).unwrap();
    assert!(alpha_runs.iter().all(|run| run.cpid.as_str() == "alpha"));

    let window = ResultsFilter::new()
        .start_date(window_start)
        .end_date(window_end);
    assert_eq!(repo.count_test_runs(&window).unwrap(), 2);
    let window_ids: Vec<TestRunId> = repo
        .list_test_runs(TestRunListQuery::new(window))
        .unwrap()
        .into_iter()
        .map(|run| run.id)
        .collect();
    assert_eq!(window_ids, vec![inside[1], inside[0]]);
    assert!(!window_ids.contains(&before[0]));

    let nothing = ResultsFilter::new().cpid("gamma");
    assert_eq!(repo.count_test_runs(&nothing).unwrap(), 0);
}

#[test]
fn test_equal_creation_times_are_ordered_by_id_descending() {
    let test_db = common::TestDb::new("test_equal_creation_times_are_ordered_by_id_descending.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    let ids = [
        "11111111-1111-4111-8111-111111111111",
        "ffffffff-ffff-4fff-bfff-ffffffffffff",
        "88888888-8888-4888-8888-888888888888",
    ];
    for id in ids {
        insert_at(&test_db, id, at(1, 0, 0, 0, 0));
    }

    let per_page = NonZeroUsize::new(2).unwrap();
    let listed: Vec<String> = [None, Some(2)]
        .into_iter()
        .flat_map(|requested| {
            let page = paginate(3, requested, per_page);
            repo.list_test_runs(TestRunListQuery::new(ResultsFilter::new()).paginate(page))
                .unwrap()
        })
        .map(|run| run.id.to_string())
        .collect();

    assert_eq!(listed, vec![ids[1], ids[2], ids[0]]);
}

#[test]
fn test_bare_date_range_includes_the_whole_day() {
    let test_db = common::TestDb::new("test_bare_date_range_includes_the_whole_day.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    insert_at(&test_db, "11111111-1111-4111-8111-111111111111", at(2, 0, 0, 0, 0));
    insert_at(
        &test_db,
        "22222222-2222-4222-8222-222222222222",
        at(2, 23, 59, 59, 999_999_500),
    );
    insert_at(&test_db, "33333333-3333-4333-8333-333333333333", at(3, 0, 0, 0, 0));

    let raw = HashMap::from([
        ("start_date".to_string(), "2025-03-02".to_string()),
        ("end_date".to_string(), "2025-03-02".to_string()),
    ]);
    let filter = parse_filters(&raw, LIST_PARAMS, DEFAULT_INPUT_DATE_FORMAT).unwrap();

    assert_eq!(repo.count_test_runs(&filter).unwrap(), 2);
}
