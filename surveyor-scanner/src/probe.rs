use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, warn};
use url::Url;

use crate::error::Result;
use crate::fetch::Fetcher;

/// Well-known discovery paths probed when the caller supplies no
/// candidate list of its own.
pub const DEFAULT_PROBE_PATHS: &[&str] = &[
    "/sitemap.xml",
    "/.well-known/security.txt",
    "/humans.txt",
    "/favicon.ico",
    "/admin/",
    "/login",
    "/api/",
    "/.env",
    "/.git/HEAD",
    "/server-status",
];

/// One candidate path and what its existence check returned.
///
/// `status: None` means the check itself failed (timeout, connection
/// error, DNS); the candidate is still accounted for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub path: String,
    pub url: String,
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// Bounded-concurrency existence checks over a candidate path list.
pub struct PathProber {
    fetcher: Fetcher,
    concurrency: usize,
    delay_ms: u64,
}

impl PathProber {
    pub fn new(fetcher: Fetcher, concurrency: usize, delay_ms: u64) -> Self {
        Self {
            fetcher,
            concurrency: concurrency.max(1),
            delay_ms,
        }
    }

    /// HEAD-check every candidate resolved against `base`.
    ///
    /// Fixed worker pool: the candidate list is chunked across at most
    /// `concurrency` spawned workers, each worker pausing a small random
    /// interval between its requests. Returns exactly one ProbeResult
    /// per candidate, in input order.
    pub async fn probe(&self, base: &Url, candidates: &[String]) -> Result<Vec<ProbeResult>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let targets: Vec<(usize, String, Option<Url>)> = candidates
            .iter()
            .enumerate()
            .map(|(idx, path)| (idx, path.clone(), base.join(path).ok()))
            .collect();

        debug!(
            "probing {} candidates with {} workers",
            targets.len(),
            self.concurrency
        );

        let results: Arc<Mutex<Vec<(usize, ProbeResult)>>> =
            Arc::new(Mutex::new(Vec::with_capacity(targets.len())));
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let per_worker = targets.len().div_ceil(self.concurrency);

        let mut tasks = Vec::new();
        for chunk in targets.chunks(per_worker) {
            let chunk = chunk.to_vec();
            let fetcher = self.fetcher.clone();
            let results = results.clone();
            let semaphore = semaphore.clone();
            let delay_ms = self.delay_ms;

            tasks.push(tokio::spawn(async move {
                for (idx, path, resolved) in chunk {
                    let _permit = semaphore.acquire().await.expect("semaphore closed");

                    if delay_ms > 0 {
                        let jitter = {
                            let mut rng = rand::thread_rng();
                            rng.gen_range(0..=delay_ms)
                        };
                        tokio::time::sleep(Duration::from_millis(jitter)).await;
                    }

                    let result = match resolved {
                        Some(url) => match fetcher.head(url.as_str()).await {
                            Ok((status, content_type)) => ProbeResult {
                                path,
                                url: url.to_string(),
                                status: Some(status),
                                content_type,
                            },
                            Err(e) => {
                                debug!("probe failed for {}: {}", url, e);
                                ProbeResult {
                                    path,
                                    url: url.to_string(),
                                    status: None,
                                    content_type: None,
                                }
                            }
                        },
                        None => {
                            warn!("unresolvable probe candidate {:?}", path);
                            ProbeResult {
                                url: path.clone(),
                                path,
                                status: None,
                                content_type: None,
                            }
                        }
                    };

                    results.lock().await.push((idx, result));
                }
            }));
        }

        for task in futures::future::join_all(tasks).await {
            task?;
        }

        let mut collected = results.lock().await.clone();
        collected.sort_by_key(|(idx, _)| *idx);
        Ok(collected.into_iter().map(|(_, result)| result).collect())
    }
}

/// Pure post-filter: probes whose status is 2xx, 3xx or 4xx. Network
/// failures and 5xx are noise for surface discovery.
pub fn interesting(results: &[ProbeResult]) -> Vec<&ProbeResult> {
    results
        .iter()
        .filter(|r| matches!(r.status, Some(code) if (200..500).contains(&code)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_prober(concurrency: usize) -> PathProber {
        let fetcher = Fetcher::new(&ScanConfig {
            timeout_secs: 5,
            ..ScanConfig::default()
        })
        .unwrap();
        // No politeness delay in tests.
        PathProber::new(fetcher, concurrency, 0)
    }

    #[tokio::test]
    async fn every_candidate_is_accounted_for() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/present"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        // Everything else 404s via wiremock's default.

        let base = Url::parse(&server.uri()).unwrap();
        let candidates: Vec<String> = vec![
            "/present".into(),
            "/absent-one".into(),
            "/absent-two".into(),
            "/absent-three".into(),
        ];

        let results = test_prober(3).probe(&base, &candidates).await.unwrap();

        assert_eq!(results.len(), candidates.len());
        for (result, candidate) in results.iter().zip(&candidates) {
            assert_eq!(&result.path, candidate);
        }
        assert_eq!(results[0].status, Some(200));
        assert_eq!(results[1].status, Some(404));
    }

    #[tokio::test]
    async fn network_failures_yield_null_status_results() {
        // Nothing listens on port 1; every check fails at the transport.
        let base = Url::parse("http://127.0.0.1:1/").unwrap();
        let candidates: Vec<String> = vec!["/a".into(), "/b".into(), "/c".into()];

        let results = test_prober(2).probe(&base, &candidates).await.unwrap();

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.status.is_none()));
        assert_eq!(results[2].path, "/c");
    }

    #[tokio::test]
    async fn results_come_back_in_input_order() {
        let server = MockServer::start().await;
        for (at, status, delay_ms) in [("/slow", 200u16, 50u64), ("/fast", 204, 0)] {
            Mock::given(method("HEAD"))
                .and(path(at))
                .respond_with(
                    ResponseTemplate::new(status)
                        .set_delay(Duration::from_millis(delay_ms)),
                )
                .mount(&server)
                .await;
        }

        let base = Url::parse(&server.uri()).unwrap();
        let candidates: Vec<String> = vec!["/slow".into(), "/fast".into()];
        let results = test_prober(2).probe(&base, &candidates).await.unwrap();

        assert_eq!(results[0].path, "/slow");
        assert_eq!(results[0].status, Some(200));
        assert_eq!(results[1].path, "/fast");
        assert_eq!(results[1].status, Some(204));
    }

    #[tokio::test]
    async fn more_candidates_than_workers_still_completes() {
        let server = MockServer::start().await;
        let base = Url::parse(&server.uri()).unwrap();
        let candidates: Vec<String> = (0..25).map(|i| format!("/path{}", i)).collect();

        let results = test_prober(4).probe(&base, &candidates).await.unwrap();

        assert_eq!(results.len(), 25);
    }

    #[tokio::test]
    async fn empty_candidate_list_is_a_noop() {
        let base = Url::parse("https://example.com/").unwrap();
        let results = test_prober(4).probe(&base, &[]).await.unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn interesting_keeps_2xx_3xx_4xx_only() {
        let make = |status: Option<u16>| ProbeResult {
            path: "/p".into(),
            url: "https://e/p".into(),
            status,
            content_type: None,
        };
        let results = vec![
            make(Some(200)),
            make(Some(301)),
            make(Some(403)),
            make(Some(500)),
            make(None),
        ];

        let kept = interesting(&results);
        let statuses: Vec<Option<u16>> = kept.iter().map(|r| r.status).collect();
        assert_eq!(statuses, vec![Some(200), Some(301), Some(403)]);
    }
}
