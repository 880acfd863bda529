//! Integration tests for the load-once table.

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use gridstate_lib::column::Column;
use gridstate_lib::error::AsyncOutcome;
use gridstate_lib::error::FetchError;
use gridstate_lib::load_once::LoadOnceTable;
use gridstate_lib::load_once::RecordFetcher;
use gridstate_lib::model::Row;
use gridstate_lib::model::Value;
use gridstate_lib::pipeline::SortSpec;
use gridstate_lib::table::FilterConfig;
use gridstate_lib::table::PaginationConfig;
use gridstate_lib::table::TableConfig;

const DEPARTMENTS: [&str; 12] = [
    "Engineering",
    "Sales",
    "Marketing",
    "Sales",
    "engineering",
    "Support",
    "Finance",
    "Sales",
    "Marketing",
    "Support",
    "Finance",
    "Platform Eng",
];

/// Serves the staff list. Each download stamps its rows with the call number.
#[derive(Clone, Default)]
struct Staff {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl Staff {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordFetcher for Staff {
    async fn fetch_all(&self) -> AsyncOutcome<Vec<Row>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(Duration::from_millis(50)).await;

        if self.fail {
            return Err(FetchError::remote("staff directory offline"));
        }

        Ok(DEPARTMENTS
            .iter()
            .enumerate()
            .map(|(i, dept)| {
                Row::new()
                    .set("id", i as i64 + 1)
                    .set("dept", *dept)
                    .set("download", call as i64)
            })
            .collect())
    }
}

fn config() -> TableConfig {
    TableConfig::new(vec![Column::new("id", "ID"), Column::new("dept", "Department")])
        .pagination(PaginationConfig::with_page_size(5))
        .filtering(FilterConfig::columns(["dept"]))
}

fn ids(rows: &[Row]) -> Vec<i64> {
    rows.iter()
        .filter_map(|row| match row.get("id") {
            Some(Value::Int(id)) => Some(*id),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_mount_downloads_once() {
    let staff = Staff::default();
    let table = LoadOnceTable::new(config(), staff.clone()).unwrap();

    let ticket = table.mount().unwrap();
    assert!(table.loading());
    ticket.wait().await;

    assert!(!table.loading());
    assert_eq!(ids(&table.page_data()), vec![1, 2, 3, 4, 5]);
    assert_eq!(table.pagination().map(|p| p.total), Some(12));

    table.set_page(3);
    table.set_sort(Some(SortSpec::desc("dept")));
    table.set_search_query("sales");
    table.set_page_size(2);
    table.reset();
    assert!(table.mount().is_none());

    assert_eq!(staff.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_local_search_after_load() {
    let table = LoadOnceTable::new(config(), Staff::default()).unwrap();
    table.mount().unwrap().wait().await;

    table.set_search_query("eng");

    assert_eq!(ids(&table.page_data()), vec![1, 5, 12]);
    let pagination = table.pagination().unwrap();
    assert_eq!(pagination.total, 3);
    assert_eq!(pagination.page_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_refetch_downloads_again() {
    let staff = Staff::default();
    let table = LoadOnceTable::new(config(), staff.clone()).unwrap();
    table.mount().unwrap().wait().await;
    table.set_page(2);

    let ticket = table.refetch();
    assert!(table.is_refetching());
    assert!(!table.loading());
    ticket.wait().await;

    assert!(!table.is_refetching());
    assert_eq!(staff.calls(), 2);
    let rows = table.page_data();
    assert_eq!(ids(&rows), vec![6, 7, 8, 9, 10]);
    assert_eq!(rows[0].get("download"), Some(&Value::Int(2)));
}

#[tokio::test(start_paused = true)]
async fn test_only_latest_download_applies() {
    let staff = Staff::default();
    let table = LoadOnceTable::new(config(), staff.clone()).unwrap();

    let first = table.mount().unwrap();
    let second = table.refetch();
    first.wait().await;
    second.wait().await;

    let snapshot = table.snapshot();
    assert!(!snapshot.loading);
    assert!(!snapshot.is_refetching);
    assert_eq!(snapshot.page_data[0].get("download"), Some(&Value::Int(2)));
}

#[tokio::test(start_paused = true)]
async fn test_failed_download_sets_error() {
    let staff = Staff {
        fail: true,
        ..Staff::default()
    };
    let table = LoadOnceTable::new(config(), staff).unwrap();
    table.mount().unwrap().wait().await;

    let snapshot = table.snapshot();
    assert!(snapshot.page_data.is_empty());
    assert!(!snapshot.loading);
    assert_eq!(
        snapshot.error,
        Some(FetchError::remote("staff directory offline"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_closure_fetcher() {
    let table = LoadOnceTable::new(config(), || async {
        Ok::<_, FetchError>(vec![Row::new().set("id", 1).set("dept", "Sales")])
    })
    .unwrap();

    let _ = table.mount();
    table.wait_idle().await;

    assert_eq!(table.with_table(|t| t.raw_data().len()), 1);
    assert!(table.error().is_none());
}
