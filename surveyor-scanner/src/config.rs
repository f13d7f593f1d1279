use reqwest::Proxy;

/// Engine configuration for one recon run.
///
/// The proxy is carried as an opaque transport handle; the engine attaches
/// it to its HTTP client verbatim and embeds no selection policy.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Sitemap recursion ceiling.
    pub max_depth: usize,
    /// Total sitemap documents fetched per target.
    pub max_sitemap_fetches: usize,
    /// Total leaf URLs collected per target.
    pub max_leaf_urls: usize,
    /// Crawl well-known sitemap locations in addition to declared ones.
    pub deep_mode: bool,
    pub probe_concurrency: usize,
    /// Paths probed under the target base. Empty disables probing.
    pub probe_candidates: Vec<String>,
    /// Upper bound of the per-request politeness jitter.
    pub probe_delay_ms: u64,
    /// HEAD-check the first N discovered leaf URLs. 0 disables.
    pub check_urls: usize,
    pub proxy: Option<Proxy>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: format!(
                "Surveyor/{} (+https://github.com/vexsec/surveyor)",
                env!("CARGO_PKG_VERSION")
            ),
            max_depth: 5,
            max_sitemap_fetches: 200,
            max_leaf_urls: 50_000,
            deep_mode: false,
            probe_concurrency: 10,
            probe_candidates: Vec::new(),
            probe_delay_ms: 250,
            check_urls: 0,
            proxy: None,
        }
    }
}
