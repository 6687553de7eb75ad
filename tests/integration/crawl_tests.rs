//! Integration tests for the harvester
//!
//! These tests use wiremock to serve a small fake catalogue and run the full
//! crawl, normalize and load cycle end-to-end against a temporary database.

use catalogue_harvester::catalogue::{DimensionRow, ManufacturerFact};
use catalogue_harvester::config::{
    Config, CrawlerConfig, FailurePolicy, OutputConfig, SelectorConfig, UserAgentConfig,
};
use catalogue_harvester::crawler::{run_harvest, Container, Harvester};
use catalogue_harvester::output::BatchStatus;
use catalogue_harvester::storage::{
    CatalogueEntry, CatalogueStore, SqliteStorage, StorageError, StorageResult, Table,
};
use catalogue_harvester::CatalogueError;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock catalogue root
fn create_test_config(server: &MockServer, db_path: &Path, on_failure: FailurePolicy) -> Config {
    Config {
        crawler: CrawlerConfig {
            base_url: format!("{}/catalogue/", server.uri()),
            request_timeout: 5,
            connect_timeout: 2,
            on_failure,
            manufacturers: vec![],
        },
        user_agent: UserAgentConfig::default(),
        output: OutputConfig {
            database_path: db_path.display().to_string(),
            atomic_batches: false,
        },
        selectors: SelectorConfig::default(),
    }
}

fn container(class: &str, labels: &[&str]) -> String {
    let links: String = labels
        .iter()
        .map(|label| format!(r##"<li><a href="#">{}</a></li>"##, label))
        .collect();
    format!(
        r#"<html><body><div class="c_container {}"><ul>{}</ul></div></body></html>"#,
        class, links
    )
}

fn parts_page(links: &str) -> String {
    format!(
        r#"<html><body><div class="c_container allparts"><ul>{}</ul></div></body></html>"#,
        links
    )
}

async fn mount_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, page: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Mounts a catalogue with three manufacturers:
///
/// - JCB: one category, a model with direct parts and a model with a subsection
/// - Volvo: one category whose only model page has no containers
/// - Atlas: one category, one model, one part
async fn mount_catalogue(server: &MockServer) {
    mount_page(
        server,
        "/catalogue/",
        container("allmakes", &["JCB", "Volvo", "Atlas"]),
    )
    .await;

    mount_page(server, "/catalogue/JCB", container("allcategories", &["Excavators"])).await;
    mount_page(
        server,
        "/catalogue/JCB/Excavators",
        container("allmodels", &["JS130", "JS200"]),
    )
    .await;
    mount_page(
        server,
        "/catalogue/JCB/Excavators/JS130",
        parts_page(
            r##"<li><a href="#">P1- <span>Filter</span></a></li>
                <li><a href="#">P2</a></li>"##,
        ),
    )
    .await;
    mount_page(
        server,
        "/catalogue/JCB/Excavators/JS200",
        container("modelSections", &["Engine"]),
    )
    .await;
    mount_page(
        server,
        "/catalogue/JCB/Excavators/JS200/Engine",
        parts_page(r##"<li><a href="#">E1 <span>Engine Part</span></a></li>"##),
    )
    .await;

    mount_page(server, "/catalogue/Volvo", container("allcategories", &["Loaders"])).await;
    mount_page(server, "/catalogue/Volvo/Loaders", container("allmodels", &["L90"])).await;
    mount_page(
        server,
        "/catalogue/Volvo/Loaders/L90",
        "<html><body><p>Nothing listed</p></body></html>".to_string(),
    )
    .await;

    mount_page(server, "/catalogue/Atlas", container("allcategories", &["Cranes"])).await;
    mount_page(server, "/catalogue/Atlas/Cranes", container("allmodels", &["AC25"])).await;
    mount_page(
        server,
        "/catalogue/Atlas/Cranes/AC25",
        parts_page(r##"<li><a href="#">A-100- <span>Hydraulics</span></a></li>"##),
    )
    .await;
}

#[tokio::test]
async fn test_full_harvest() {
    let mock_server = MockServer::start().await;
    mount_catalogue(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("catalogue.db");
    let config = create_test_config(&mock_server, &db_path, FailurePolicy::SkipManufacturer);

    let report = run_harvest(&config).await.expect("Harvest failed");

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.loaded().count(), 3);
    assert_eq!(report.failed().count(), 0);
    assert_eq!(report.parts_loaded(), 4);

    let storage = SqliteStorage::new(&db_path).expect("Failed to open DB");
    assert_eq!(storage.count_rows(Table::Manufacturer).unwrap(), 4);
    assert_eq!(
        storage.manufacturers().unwrap(),
        vec!["Atlas".to_string(), "JCB".to_string()]
    );
}

#[tokio::test]
async fn test_harvested_rows_join_back_to_their_values() {
    let mock_server = MockServer::start().await;
    mount_catalogue(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("catalogue.db");
    let mut config = create_test_config(&mock_server, &db_path, FailurePolicy::SkipManufacturer);
    config.crawler.manufacturers = vec!["JCB".to_string()];

    run_harvest(&config).await.expect("Harvest failed");

    let storage = SqliteStorage::new(&db_path).expect("Failed to open DB");
    let entries = storage.query_parts("JCB", 0, 10).unwrap();
    let rows: Vec<(&str, &str, &str, &str)> = entries
        .iter()
        .map(|e| {
            assert_eq!(e.manufacturer, "JCB");
            assert_eq!(e.category, "Excavators");
            (
                e.model.as_str(),
                e.part.as_str(),
                e.part_category.as_str(),
                e.category.as_str(),
            )
        })
        .collect();

    // Subsection rows carry the model they were found under, not "Engine"
    assert_eq!(
        rows,
        vec![
            ("JS130", "P1", "Filter", "Excavators"),
            ("JS130", "P2", "Unknown", "Excavators"),
            ("JS200", "E1", "Engine Part", "Excavators"),
        ]
    );

    assert_eq!(storage.count_rows(Table::Model).unwrap(), 2);
    assert_eq!(storage.count_rows(Table::Category).unwrap(), 1);
    assert_eq!(storage.count_rows(Table::PartCategory).unwrap(), 3);

    let page = storage.query_parts("JCB", 1, 1).unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].part, "P2");
}

#[tokio::test]
async fn test_model_without_containers_yields_no_rows() {
    let mock_server = MockServer::start().await;
    mount_catalogue(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("catalogue.db");
    let mut config = create_test_config(&mock_server, &db_path, FailurePolicy::AbortRun);
    config.crawler.manufacturers = vec!["Volvo".to_string(), "Atlas".to_string()];

    let report = run_harvest(&config).await.expect("Harvest failed");

    assert_eq!(report.loaded().count(), 2);
    assert_eq!(report.parts_loaded(), 1);

    let storage = SqliteStorage::new(&db_path).expect("Failed to open DB");
    assert!(storage.query_parts("Volvo", 0, 10).unwrap().is_empty());

    let atlas = storage.query_parts("Atlas", 0, 10).unwrap();
    assert_eq!(atlas.len(), 1);
    assert_eq!(atlas[0].part, "A-100");
    assert_eq!(atlas[0].part_category, "Hydraulics");
}

#[tokio::test]
async fn test_fetch_failure_aborts_whole_run_under_abort_policy() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "/catalogue/Volvo", 500).await;
    mount_catalogue(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("catalogue.db");
    let config = create_test_config(&mock_server, &db_path, FailurePolicy::AbortRun);

    let result = run_harvest(&config).await;
    match result {
        Err(CatalogueError::Fetch { url, reason }) => {
            assert!(url.ends_with("/catalogue/Volvo"), "unexpected url {}", url);
            assert_eq!(reason, "HTTP 500");
        }
        other => panic!("Expected fetch error, got {:?}", other.map(|r| r.outcomes)),
    }

    // JCB was loaded before the failure; Atlas was never reached
    let storage = SqliteStorage::new(&db_path).expect("Failed to open DB");
    assert_eq!(storage.manufacturers().unwrap(), vec!["JCB".to_string()]);
    assert_eq!(storage.count_rows(Table::Manufacturer).unwrap(), 3);
}

#[tokio::test]
async fn test_fetch_failure_isolated_per_manufacturer_under_skip_policy() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "/catalogue/Volvo", 500).await;
    mount_catalogue(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("catalogue.db");
    let config = create_test_config(&mock_server, &db_path, FailurePolicy::SkipManufacturer);

    let report = run_harvest(&config).await.expect("Harvest failed");

    let failed: Vec<&str> = report.failed().map(|o| o.manufacturer.as_str()).collect();
    assert_eq!(failed, vec!["Volvo"]);
    assert_eq!(report.loaded().count(), 2);

    let storage = SqliteStorage::new(&db_path).expect("Failed to open DB");
    assert_eq!(
        storage.manufacturers().unwrap(),
        vec!["Atlas".to_string(), "JCB".to_string()]
    );
}

#[tokio::test]
async fn test_root_failure_always_ends_run() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "/catalogue/", 503).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("catalogue.db");
    let config = create_test_config(&mock_server, &db_path, FailurePolicy::SkipManufacturer);

    let result = run_harvest(&config).await;
    assert!(matches!(result, Err(CatalogueError::Fetch { .. })));
}

#[tokio::test]
async fn test_missing_required_container() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/catalogue/",
        "<html><body><p>Maintenance</p></body></html>".to_string(),
    )
    .await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("catalogue.db");
    let config = create_test_config(&mock_server, &db_path, FailurePolicy::SkipManufacturer);

    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    match harvester.list_manufacturers().await {
        Err(CatalogueError::MissingContainer { container, .. }) => {
            assert_eq!(container, Container::Makes);
        }
        other => panic!("Expected missing container, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_category_container_fails_manufacturer() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/catalogue/Volvo",
        "<html><body></body></html>".to_string(),
    )
    .await;
    mount_catalogue(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("catalogue.db");
    let config = create_test_config(&mock_server, &db_path, FailurePolicy::SkipManufacturer);

    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let result = harvester.harvest_manufacturer("Volvo").await;
    assert!(matches!(
        result,
        Err(CatalogueError::MissingContainer {
            container: Container::Categories,
            ..
        })
    ));
}

#[tokio::test]
async fn test_atomic_batches() {
    let mock_server = MockServer::start().await;
    mount_catalogue(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("catalogue.db");
    let mut config = create_test_config(&mock_server, &db_path, FailurePolicy::SkipManufacturer);
    config.output.atomic_batches = true;

    let report = run_harvest(&config).await.expect("Harvest failed");
    assert_eq!(report.parts_loaded(), 4);

    let storage = SqliteStorage::new(&db_path).expect("Failed to open DB");
    assert_eq!(storage.count_rows(Table::Manufacturer).unwrap(), 4);
    assert_eq!(storage.count_rows(Table::Model).unwrap(), 3);
}

#[tokio::test]
async fn test_rerun_appends_without_dedup() {
    let mock_server = MockServer::start().await;
    mount_catalogue(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("catalogue.db");
    let mut config = create_test_config(&mock_server, &db_path, FailurePolicy::SkipManufacturer);
    config.crawler.manufacturers = vec!["Atlas".to_string()];

    run_harvest(&config).await.expect("First harvest failed");
    run_harvest(&config).await.expect("Second harvest failed");

    let storage = SqliteStorage::new(&db_path).expect("Failed to open DB");
    assert_eq!(storage.count_rows(Table::Manufacturer).unwrap(), 2);
    assert_eq!(storage.count_rows(Table::Category).unwrap(), 2);
}

/// Mounts a catalogue whose first manufacturer fails deep in its subtree:
///
/// - A: model M1 has subsections S1 (no parts) and S2 (one part), model M2
///   answers 500
/// - B: one category, one model, one part
/// - C: model M1 with the same two subsections as A's, nothing failing
async fn mount_sectioned_catalogue(server: &MockServer) {
    mount_page(server, "/catalogue/", container("allmakes", &["A", "B", "C"])).await;

    for manufacturer in ["A", "C"] {
        let root = format!("/catalogue/{}", manufacturer);
        mount_page(server, &root, container("allcategories", &["Cat"])).await;
        mount_page(
            server,
            &format!("{}/Cat/M1", root),
            container("modelSections", &["S1", "S2"]),
        )
        .await;
        mount_page(
            server,
            &format!("{}/Cat/M1/S1", root),
            "<html><body><p>Coming soon</p></body></html>".to_string(),
        )
        .await;
        mount_page(
            server,
            &format!("{}/Cat/M1/S2", root),
            parts_page(r##"<li><a href="#">S2-PART <span>Seal</span></a></li>"##),
        )
        .await;
    }

    mount_page(server, "/catalogue/A/Cat", container("allmodels", &["M1", "M2"])).await;
    mount_status(server, "/catalogue/A/Cat/M2", 500).await;
    mount_page(server, "/catalogue/C/Cat", container("allmodels", &["M1"])).await;

    mount_page(server, "/catalogue/B", container("allcategories", &["Cat2"])).await;
    mount_page(server, "/catalogue/B/Cat2", container("allmodels", &["N1"])).await;
    mount_page(
        server,
        "/catalogue/B/Cat2/N1",
        parts_page(r##"<li><a href="#">B-1</a></li>"##),
    )
    .await;
}

#[tokio::test]
async fn test_subsection_without_parts_yields_no_rows() {
    let mock_server = MockServer::start().await;
    mount_sectioned_catalogue(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("catalogue.db");
    let config = create_test_config(&mock_server, &db_path, FailurePolicy::AbortRun);

    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let rows = harvester
        .harvest_manufacturer("C")
        .await
        .expect("Harvest of C failed");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].model, "M1");
    assert_eq!(rows[0].part, "S2-PART");
    assert_eq!(rows[0].part_category.as_deref(), Some("Seal"));
}

#[tokio::test]
async fn test_deep_failure_discards_rows_already_harvested() {
    let mock_server = MockServer::start().await;
    mount_sectioned_catalogue(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("catalogue.db");
    let mut config = create_test_config(&mock_server, &db_path, FailurePolicy::SkipManufacturer);
    config.crawler.manufacturers = vec!["A".to_string(), "B".to_string()];

    let report = run_harvest(&config).await.expect("Harvest failed");

    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.outcomes[0].manufacturer, "A");
    match &report.outcomes[0].status {
        BatchStatus::Failed(error) => {
            assert!(error.contains("/catalogue/A/Cat/M2"), "unexpected error {}", error);
            assert!(error.contains("HTTP 500"), "unexpected error {}", error);
        }
        other => panic!("Expected A to fail, got {:?}", other),
    }
    assert!(report.outcomes[1].is_loaded());

    // The S2 part found under A before M2 failed is never written
    let storage = SqliteStorage::new(&db_path).expect("Failed to open DB");
    assert_eq!(storage.manufacturers().unwrap(), vec!["B".to_string()]);
    assert_eq!(storage.count_rows(Table::Manufacturer).unwrap(), 1);
    assert!(storage.query_parts("A", 0, 10).unwrap().is_empty());
}

/// Store that fails every part-category append and delegates the rest
struct FailingPartCategoryStore {
    inner: SqliteStorage,
}

impl CatalogueStore for FailingPartCategoryStore {
    fn append_dimension(&mut self, table: Table, rows: &[DimensionRow]) -> StorageResult<usize> {
        if table == Table::PartCategory {
            return Err(StorageError::Sqlite(rusqlite::Error::InvalidQuery));
        }
        self.inner.append_dimension(table, rows)
    }

    fn append_facts(&mut self, rows: &[ManufacturerFact]) -> StorageResult<usize> {
        self.inner.append_facts(rows)
    }

    fn count_rows(&self, table: Table) -> StorageResult<u64> {
        self.inner.count_rows(table)
    }

    fn manufacturers(&self) -> StorageResult<Vec<String>> {
        self.inner.manufacturers()
    }

    fn query_parts(
        &self,
        manufacturer: &str,
        skip: u32,
        limit: u32,
    ) -> StorageResult<Vec<CatalogueEntry>> {
        self.inner.query_parts(manufacturer, skip, limit)
    }
}

#[tokio::test]
async fn test_storage_failure_is_reported_per_manufacturer() {
    let mock_server = MockServer::start().await;
    mount_catalogue(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("catalogue.db");
    let mut config = create_test_config(&mock_server, &db_path, FailurePolicy::SkipManufacturer);
    config.crawler.manufacturers = vec!["JCB".to_string()];

    let mut store = FailingPartCategoryStore {
        inner: SqliteStorage::new(&db_path).expect("Failed to open DB"),
    };
    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let report = harvester.run(&mut store).await.expect("Harvest failed");

    assert_eq!(report.outcomes.len(), 1);
    match &report.outcomes[0].status {
        BatchStatus::Failed(error) => {
            assert!(error.starts_with("Storage error"), "unexpected error {}", error)
        }
        other => panic!("Expected JCB to fail, got {:?}", other),
    }

    // Tables appended before the failing one stay in place
    assert_eq!(store.count_rows(Table::Manufacturer).unwrap(), 3);
    assert_eq!(store.count_rows(Table::PartCategory).unwrap(), 0);
}

#[tokio::test]
async fn test_storage_failure_aborts_whole_run_under_abort_policy() {
    let mock_server = MockServer::start().await;
    mount_catalogue(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("catalogue.db");
    let config = create_test_config(&mock_server, &db_path, FailurePolicy::AbortRun);

    let mut store = FailingPartCategoryStore {
        inner: SqliteStorage::new(&db_path).expect("Failed to open DB"),
    };
    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let result = harvester.run(&mut store).await;

    assert!(matches!(result, Err(CatalogueError::Storage(_))));
    assert_eq!(store.manufacturers().unwrap(), vec!["JCB".to_string()]);
}
