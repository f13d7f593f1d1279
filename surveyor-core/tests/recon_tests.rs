// Tests for batched recon execution.

use std::sync::{Arc, Mutex};

use surveyor_core::recon::{ReconOptions, execute_recon, summary_line};
use surveyor_scanner::{ReconResult, ScanConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn options(targets: Vec<String>, workers: usize) -> ReconOptions {
    ReconOptions {
        targets,
        workers,
        config: ScanConfig {
            timeout_secs: 5,
            probe_delay_ms: 0,
            ..ScanConfig::default()
        },
        show_progress_bars: false,
        deadline_secs: None,
    }
}

async fn mock_site() -> MockServer {
    let server = MockServer::start().await;
    let base = server.uri();
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(
            format!("User-agent: *\nSitemap: {}/sitemap.xml\n", base).into_bytes(),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(
            format!(
                "<urlset><url><loc>{0}/a</loc></url><url><loc>{0}/b</loc></url></urlset>",
                base
            )
            .into_bytes(),
        ))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn every_target_produces_a_result() {
    let server = mock_site().await;
    let targets = vec![server.uri(), server.uri(), server.uri()];

    let results = execute_recon(options(targets, 2), None).await.unwrap();

    assert_eq!(results.len(), 3);
    for result in &results {
        assert!(result.robots_fetched);
        assert_eq!(result.discovered_urls.len(), 2);
    }
}

#[tokio::test]
async fn one_dead_target_does_not_abort_siblings() {
    let server = mock_site().await;
    // Port 1 refuses connections; the last entry is not even normalizable.
    let targets = vec![
        server.uri(),
        "http://127.0.0.1:1".to_string(),
        "not a valid url".to_string(),
    ];

    let results = execute_recon(options(targets, 3), None).await.unwrap();

    assert_eq!(results.len(), 3);
    assert!(results[0].robots_fetched);
    assert!(!results[1].robots_fetched);
    assert!(results[1].error.is_some());
    assert!(!results[2].robots_fetched);
    assert!(results[2].error.as_deref().unwrap().contains("invalid target"));
}

#[tokio::test]
async fn progress_callback_fires_once_per_target() {
    let server = mock_site().await;
    let targets = vec![server.uri(), server.uri()];

    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let callback = Arc::new(move |line: String| {
        seen_clone.lock().unwrap().push(line);
    });

    execute_recon(options(targets, 1), Some(callback))
        .await
        .unwrap();

    let lines = seen.lock().unwrap();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("[1/2]"));
    assert!(lines[1].starts_with("[2/2]"));
}

#[tokio::test]
async fn empty_target_list_is_a_configuration_error() {
    let err = execute_recon(options(Vec::new(), 4), None).await.unwrap_err();
    assert!(err.contains("No targets"));
}

#[tokio::test]
async fn deadline_converts_slow_targets_into_failed_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(std::time::Duration::from_secs(5))
                .set_body_bytes(b"User-agent: *\n".to_vec()),
        )
        .mount(&server)
        .await;

    let mut opts = options(vec![server.uri()], 1);
    opts.deadline_secs = Some(1);

    let results = execute_recon(opts, None).await.unwrap();

    assert_eq!(results.len(), 1);
    assert!(!results[0].robots_fetched);
    assert!(results[0].error.as_deref().unwrap().contains("deadline"));
}

#[test]
fn summary_line_for_success_and_failure() {
    let ok = ReconResult {
        target: "example.com".to_string(),
        base_url: "https://example.com/".to_string(),
        robots_fetched: true,
        robots: None,
        sitemaps: Vec::new(),
        discovered_urls: vec!["https://example.com/a".to_string()],
        sitemap_fetches: 1,
        limit_reached: false,
        probes: Vec::new(),
        error: None,
    };
    assert_eq!(summary_line(&ok), "example.com: robots OK, sitemaps=0, urls=1");

    let failed = ReconResult::failed("dead.example", "network error: refused");
    assert_eq!(
        summary_line(&failed),
        "dead.example: FAILED -> network error: refused"
    );
}
