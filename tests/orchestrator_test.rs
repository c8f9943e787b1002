mod common;

use common::{instant_harvest_config, urls, FakeLauncher};
use geo_media_scraper::downloader::MANIFEST_FILE;
use geo_media_scraper::retry::RetryPolicy;
use geo_media_scraper::{ChunkedDownloader, DownloadConfig, Harvester, Orchestrator, ScraperError};
use std::time::Duration;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn orchestrator(launcher: &FakeLauncher) -> Orchestrator<FakeLauncher> {
    let config = DownloadConfig {
        chunk_size: 100,
        cooldown: Duration::ZERO,
        request_timeout: Duration::from_secs(5),
        retry: RetryPolicy::new(3, Duration::ZERO, Duration::ZERO),
    };
    Orchestrator::new(
        Harvester::new(launcher.clone(), instant_harvest_config()),
        ChunkedDownloader::new(config).unwrap(),
    )
}

fn served_urls(server: &MockServer, n: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!("{}/media/{}.jpg", server.uri(), i))
        .collect()
}

#[tokio::test]
async fn test_dry_run_stalled_country() {
    let page = urls("it", 3);
    let launcher = FakeLauncher::new(vec![page.clone(), page]);
    let root = tempfile::tempdir().unwrap();

    let report = orchestrator(&launcher)
        .run(&["IT"], 5, root.path(), true)
        .await
        .unwrap();

    let entry = report.get("IT").unwrap();
    assert_eq!(entry.harvest.len(), 3);
    assert!(entry.harvest.stalled());
    assert!(entry.downloads.is_none());
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_dry_run_satisfied_country() {
    let launcher = FakeLauncher::new(vec![urls("us", 15)]);
    let root = tempfile::tempdir().unwrap();

    let report = orchestrator(&launcher)
        .run(&["US"], 10, root.path(), true)
        .await
        .unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(report.get("US").unwrap().harvest.len(), 10);
}

#[tokio::test]
async fn test_dry_run_matches_real_harvest_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpg".to_vec()))
        .mount(&server)
        .await;

    let launcher = FakeLauncher::new(vec![served_urls(&server, 4)]);
    let dry_root = tempfile::tempdir().unwrap();
    let dry = orchestrator(&launcher)
        .run(&["FR"], 4, dry_root.path(), true)
        .await
        .unwrap();

    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(std::fs::read_dir(dry_root.path()).unwrap().count(), 0);

    let real_root = tempfile::tempdir().unwrap();
    let real = orchestrator(&launcher)
        .run(&["FR"], 4, real_root.path(), false)
        .await
        .unwrap();

    let real_entry = real.get("FR").unwrap();
    assert_eq!(dry.get("FR").unwrap().harvest.urls(), real_entry.harvest.urls());
    assert_eq!(real_entry.downloads.as_ref().unwrap().successful_downloads, 4);
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_countries_processed_in_order_into_their_folders() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpg".to_vec()))
        .mount(&server)
        .await;

    let launcher = FakeLauncher::new(vec![served_urls(&server, 2)]);
    let root = tempfile::tempdir().unwrap();
    let report = orchestrator(&launcher)
        .run(&["US", "it"], 2, root.path(), false)
        .await
        .unwrap();

    let codes: Vec<_> = report
        .entries()
        .iter()
        .map(|e| e.harvest.country().code.clone())
        .collect();
    assert_eq!(codes, vec!["US", "IT"]);

    for code in ["US", "IT"] {
        let folder = root.path().join(code);
        assert!(folder.join(MANIFEST_FILE).exists());
        assert!(folder.join("0.jpg").exists());
        assert!(folder.join("1.jpg").exists());
    }
    assert_eq!(launcher.launches(), 2);
}

#[tokio::test]
async fn test_unknown_country_aborts_before_any_browser() {
    let launcher = FakeLauncher::new(vec![urls("x", 3)]);
    let root = tempfile::tempdir().unwrap();

    let err = orchestrator(&launcher)
        .run(&["IT", "XX"], 3, root.path(), true)
        .await
        .unwrap_err();

    assert!(matches!(err, ScraperError::LookupError(ref code) if code == "XX"));
    assert_eq!(launcher.launches(), 0);
}

#[tokio::test]
async fn test_browser_failure_is_fatal() {
    let launcher = FakeLauncher::failing_navigation();
    let root = tempfile::tempdir().unwrap();

    let result = orchestrator(&launcher)
        .run(&["IT"], 3, root.path(), false)
        .await;

    assert!(matches!(result, Err(ScraperError::BrowserError(_))));
    assert_eq!(launcher.closes(), 1);
}
