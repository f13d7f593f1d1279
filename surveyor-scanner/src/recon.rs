use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ScanConfig;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::probe::{PathProber, ProbeResult};
use crate::robots::RobotsDirectives;
use crate::sitemap::{ResolveLimits, SitemapOutcome, SitemapResolver};
use crate::target::Target;

/// Well-known sitemap locations tried in deep mode.
const COMMON_SITEMAP_PATHS: &[&str] = &["sitemap.xml", "sitemap_index.xml"];

/// Aggregate record for one target run. Handed to report renderers as a
/// read-only value once the run completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconResult {
    pub target: String,
    pub base_url: String,
    pub robots_fetched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robots: Option<RobotsDirectives>,
    pub sitemaps: Vec<SitemapOutcome>,
    pub discovered_urls: Vec<String>,
    pub sitemap_fetches: usize,
    pub limit_reached: bool,
    pub probes: Vec<ProbeResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReconResult {
    fn new(target: &str, base_url: String) -> Self {
        Self {
            target: target.trim().to_string(),
            base_url,
            robots_fetched: false,
            robots: None,
            sitemaps: Vec::new(),
            discovered_urls: Vec::new(),
            sitemap_fetches: 0,
            limit_reached: false,
            probes: Vec::new(),
            error: None,
        }
    }

    /// Placeholder record for a run that never got past configuration.
    pub fn failed(target: &str, error: impl Into<String>) -> Self {
        let mut result = Self::new(target, String::new());
        result.error = Some(error.into());
        result
    }
}

/// Sequences Fetcher -> Robots Parser -> Sitemap Resolver -> Path Prober
/// for a single target. Each engine owns its HTTP client; nothing is
/// shared across targets.
pub struct ReconEngine {
    config: ScanConfig,
    fetcher: Fetcher,
}

impl ReconEngine {
    pub fn new(config: ScanConfig) -> Result<Self> {
        let fetcher = Fetcher::new(&config)?;
        Ok(Self { config, fetcher })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Run the full pipeline for one target.
    ///
    /// A robots.txt failure is recorded and the downstream stages are
    /// skipped, but a valid partial result is still returned. Only an
    /// unnormalizable target errors.
    pub async fn run(&self, raw_target: &str) -> Result<ReconResult> {
        let target = Target::normalize(raw_target)?;
        let mut result = ReconResult::new(raw_target, target.base().to_string());

        let robots_url = match target.join("robots.txt") {
            Some(url) => url,
            None => {
                result.error = Some("cannot resolve robots.txt location".to_string());
                return Ok(result);
            }
        };

        let robots = match self.fetcher.fetch_text(robots_url.as_str()).await {
            Ok(document) => {
                info!(
                    "fetched robots.txt for {} ({} bytes)",
                    target,
                    document.body.len()
                );
                let parsed = RobotsDirectives::parse(&document.body);
                result.robots_fetched = true;
                result.robots = Some(parsed.clone());
                parsed
            }
            Err(e) => {
                warn!("robots.txt fetch failed for {}: {}", target, e);
                result.error = Some(e.to_string());
                return Ok(result);
            }
        };

        let seeds = self.sitemap_seeds(&target, &robots);
        if !seeds.is_empty() {
            let limits = ResolveLimits {
                max_depth: self.config.max_depth,
                max_sitemap_fetches: self.config.max_sitemap_fetches,
                max_leaf_urls: self.config.max_leaf_urls,
            };
            let resolver = SitemapResolver::new(&self.fetcher, limits);
            let resolution = resolver.resolve(&seeds).await;

            info!(
                "{}: {} leaf URLs from {} sitemap fetches",
                target, resolution.leaf_urls.len(), resolution.fetch_count
            );
            result.sitemaps = resolution.outcomes;
            result.discovered_urls = resolution.leaf_urls;
            result.sitemap_fetches = resolution.fetch_count;
            result.limit_reached = resolution.limit_reached;
        }

        let mut candidates = self.config.probe_candidates.clone();
        if self.config.check_urls > 0 {
            // Liveness sample over what the sitemaps turned up. Absolute
            // URLs pass through Url::join untouched.
            candidates.extend(
                result
                    .discovered_urls
                    .iter()
                    .take(self.config.check_urls)
                    .cloned(),
            );
        }
        if !candidates.is_empty() {
            let prober = PathProber::new(
                self.fetcher.clone(),
                self.config.probe_concurrency,
                self.config.probe_delay_ms,
            );
            match prober.probe(target.base(), &candidates).await {
                Ok(probes) => result.probes = probes,
                Err(e) => {
                    warn!("probing failed for {}: {}", target, e);
                    result.error.get_or_insert_with(|| e.to_string());
                }
            }
        }

        Ok(result)
    }

    /// Declared sitemaps always seed resolution; the well-known guesses
    /// join them only when deep mode is on.
    fn sitemap_seeds(&self, target: &Target, robots: &RobotsDirectives) -> Vec<String> {
        let mut seeds: Vec<String> = robots
            .sitemaps
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if self.config.deep_mode {
            for path in COMMON_SITEMAP_PATHS {
                if let Some(url) = target.join(path) {
                    let url = url.to_string();
                    if !seeds.contains(&url) {
                        seeds.push(url);
                    }
                }
            }
        }

        seeds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config() -> ScanConfig {
        ScanConfig {
            timeout_secs: 5,
            probe_delay_ms: 0,
            ..ScanConfig::default()
        }
    }

    async fn mount(server: &MockServer, at: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.as_bytes().to_vec()))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn end_to_end_robots_to_leaf_urls() {
        let server = MockServer::start().await;
        let base = server.uri();

        mount(
            &server,
            "/robots.txt",
            &format!("User-agent: *\nSitemap: {}/sitemap_index.xml\n", base),
        )
        .await;
        mount(
            &server,
            "/sitemap_index.xml",
            &format!(
                "<sitemapindex>\
                 <sitemap><loc>{0}/sitemap1.xml</loc></sitemap>\
                 <sitemap><loc>{0}/sitemap2.xml</loc></sitemap>\
                 </sitemapindex>",
                base
            ),
        )
        .await;
        mount(
            &server,
            "/sitemap1.xml",
            &format!(
                "<urlset><url><loc>{0}/p1</loc></url><url><loc>{0}/p2</loc></url>\
                 <url><loc>{0}/p3</loc></url></urlset>",
                base
            ),
        )
        .await;
        mount(
            &server,
            "/sitemap2.xml",
            &format!(
                "<urlset><url><loc>{0}/p3</loc></url><url><loc>{0}/p4</loc></url>\
                 <url><loc>{0}/p5</loc></url></urlset>",
                base
            ),
        )
        .await;

        let engine = ReconEngine::new(config()).unwrap();
        let result = engine.run(&base).await.unwrap();

        assert!(result.robots_fetched);
        assert_eq!(result.sitemap_fetches, 3);
        // p3 appears in both leaf sitemaps and is deduplicated.
        assert_eq!(result.discovered_urls.len(), 5);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn robots_failure_yields_partial_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let engine = ReconEngine::new(config()).unwrap();
        let result = engine.run(&server.uri()).await.unwrap();

        assert!(!result.robots_fetched);
        assert!(result.error.as_deref().unwrap().contains("403"));
        assert!(result.discovered_urls.is_empty());
        assert!(result.probes.is_empty());
    }

    #[tokio::test]
    async fn deep_mode_tries_well_known_locations() {
        let server = MockServer::start().await;
        let base = server.uri();

        // robots.txt declares nothing; only the guessed location exists.
        mount(&server, "/robots.txt", "User-agent: *\n").await;
        mount(
            &server,
            "/sitemap.xml",
            &format!("<urlset><url><loc>{}/guessed</loc></url></urlset>", base),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/sitemap_index.xml"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let deep = ScanConfig {
            deep_mode: true,
            ..config()
        };
        let engine = ReconEngine::new(deep).unwrap();
        let result = engine.run(&base).await.unwrap();

        assert_eq!(result.discovered_urls, vec![format!("{}/guessed", base)]);

        // Without deep mode the guesses are never crawled.
        let engine = ReconEngine::new(config()).unwrap();
        let result = engine.run(&base).await.unwrap();
        assert!(result.discovered_urls.is_empty());
        assert_eq!(result.sitemap_fetches, 0);
    }

    #[tokio::test]
    async fn probe_candidates_are_checked_after_discovery() {
        let server = MockServer::start().await;
        let base = server.uri();

        mount(&server, "/robots.txt", "User-agent: *\n").await;
        Mock::given(method("HEAD"))
            .and(path("/admin/"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let with_probe = ScanConfig {
            probe_candidates: vec!["/admin/".to_string(), "/backup.zip".to_string()],
            ..config()
        };
        let engine = ReconEngine::new(with_probe).unwrap();
        let result = engine.run(&base).await.unwrap();

        assert_eq!(result.probes.len(), 2);
        assert_eq!(result.probes[0].path, "/admin/");
        assert_eq!(result.probes[0].status, Some(200));
        assert_eq!(result.probes[1].status, Some(404));
    }

    #[tokio::test]
    async fn check_urls_samples_discovered_leaves() {
        let server = MockServer::start().await;
        let base = server.uri();

        mount(
            &server,
            "/robots.txt",
            &format!("Sitemap: {}/sitemap.xml\n", base),
        )
        .await;
        mount(
            &server,
            "/sitemap.xml",
            &format!(
                "<urlset><url><loc>{0}/p1</loc></url><url><loc>{0}/p2</loc></url>\
                 <url><loc>{0}/p3</loc></url></urlset>",
                base
            ),
        )
        .await;
        for at in ["/p1", "/p2"] {
            Mock::given(method("HEAD"))
                .and(path(at))
                .respond_with(ResponseTemplate::new(200))
                .mount(&server)
                .await;
        }

        let sampling = ScanConfig {
            check_urls: 2,
            ..config()
        };
        let engine = ReconEngine::new(sampling).unwrap();
        let result = engine.run(&base).await.unwrap();

        assert_eq!(result.probes.len(), 2);
        assert!(result.probes.iter().all(|p| p.status == Some(200)));
    }

    #[tokio::test]
    async fn invalid_target_is_an_error() {
        let engine = ReconEngine::new(config()).unwrap();
        assert!(engine.run("not a valid url").await.is_err());
    }
}
