use std::collections::{HashSet, VecDeque};

use indexmap::IndexSet;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::fetch::Fetcher;

/// Outcome of one attempted sitemap document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapOutcome {
    pub url: String,
    pub depth: usize,
    pub fetched: bool,
    /// Leaf URLs contributed by this document, or child sitemaps
    /// referenced when the document is an index.
    pub urls_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of resolving a set of seed sitemaps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resolution {
    /// Deduplicated leaf URLs in discovery order.
    pub leaf_urls: Vec<String>,
    pub outcomes: Vec<SitemapOutcome>,
    pub fetch_count: usize,
    /// A ceiling terminated expansion. Normal termination, not an error.
    pub limit_reached: bool,
}

/// Ceilings bounding one resolution against an adversarial server
/// generating a very deep or very wide sitemap graph.
#[derive(Debug, Clone, Copy)]
pub struct ResolveLimits {
    pub max_depth: usize,
    pub max_sitemap_fetches: usize,
    pub max_leaf_urls: usize,
}

impl Default for ResolveLimits {
    fn default() -> Self {
        Self {
            max_depth: 5,
            max_sitemap_fetches: 200,
            max_leaf_urls: 50_000,
        }
    }
}

enum DocumentKind {
    /// `<sitemapindex>` root: every entry points at another sitemap.
    Index,
    /// `<urlset>` root (or loose `<loc>` entries): entries are leaves.
    UrlSet,
    /// Unparseable body, salvaged by the line scan.
    LineScan,
}

/// Recursive sitemap expansion with an explicit worklist and a
/// visited-set cycle guard.
pub struct SitemapResolver<'a> {
    fetcher: &'a Fetcher,
    limits: ResolveLimits,
}

impl<'a> SitemapResolver<'a> {
    pub fn new(fetcher: &'a Fetcher, limits: ResolveLimits) -> Self {
        Self { fetcher, limits }
    }

    /// Expand seed sitemap URLs into a deduplicated set of leaf URLs.
    ///
    /// A sitemap URL is never fetched twice, even when referenced from
    /// several parents, and expansion stops quietly when any ceiling is
    /// hit. Partial results are the design.
    pub async fn resolve(&self, seeds: &[String]) -> Resolution {
        let mut visited: HashSet<String> = HashSet::new();
        let mut leaves: IndexSet<String> = IndexSet::new();
        let mut outcomes: Vec<SitemapOutcome> = Vec::new();
        let mut queue: VecDeque<(String, usize)> = seeds
            .iter()
            .map(|seed| (seed.trim().to_string(), 0))
            .filter(|(seed, _)| !seed.is_empty())
            .collect();

        let mut fetch_count = 0usize;
        let mut limit_reached = false;

        while let Some((sitemap_url, depth)) = queue.pop_front() {
            if visited.contains(&sitemap_url) {
                continue;
            }
            if depth > self.limits.max_depth {
                debug!("depth ceiling hit at {} (depth {})", sitemap_url, depth);
                limit_reached = true;
                continue;
            }
            if fetch_count >= self.limits.max_sitemap_fetches {
                limit_reached = true;
                break;
            }
            if leaves.len() >= self.limits.max_leaf_urls {
                limit_reached = true;
                break;
            }

            visited.insert(sitemap_url.clone());
            fetch_count += 1;

            let document = match self.fetcher.fetch_text(&sitemap_url).await {
                Ok(document) => document,
                Err(e) => {
                    warn!("sitemap fetch failed for {}: {}", sitemap_url, e);
                    outcomes.push(SitemapOutcome {
                        url: sitemap_url,
                        depth,
                        fetched: false,
                        urls_count: 0,
                        error: Some(e.to_string()),
                    });
                    continue;
                }
            };

            let (kind, entries) = classify_and_extract(&document.body);
            let mut contributed = 0usize;

            match kind {
                DocumentKind::Index => {
                    for entry in entries {
                        if !visited.contains(&entry) {
                            queue.push_back((entry, depth + 1));
                            contributed += 1;
                        }
                    }
                }
                DocumentKind::UrlSet | DocumentKind::LineScan => {
                    for entry in entries {
                        // Real-world urlsets sometimes nest further
                        // sitemaps without an index root. Those entries
                        // go back on the worklist; the visited guard
                        // keeps this loop-free.
                        if looks_like_sitemap(&entry) {
                            if !visited.contains(&entry) {
                                queue.push_back((entry, depth + 1));
                            }
                            continue;
                        }
                        if visited.contains(&entry) {
                            continue;
                        }
                        if leaves.len() >= self.limits.max_leaf_urls {
                            limit_reached = true;
                            break;
                        }
                        if leaves.insert(entry) {
                            contributed += 1;
                        }
                    }
                }
            }

            debug!(
                "resolved {} at depth {} -> {} entries",
                sitemap_url, depth, contributed
            );
            outcomes.push(SitemapOutcome {
                url: sitemap_url,
                depth,
                fetched: true,
                urls_count: contributed,
                error: None,
            });

            if limit_reached {
                break;
            }
        }

        Resolution {
            leaf_urls: leaves.into_iter().collect(),
            outcomes,
            fetch_count,
            limit_reached,
        }
    }
}

/// Classify a sitemap body and pull out its entries.
///
/// `<loc>` values are extracted by pattern, which handles both document
/// shapes and tolerates namespace prefixes and sloppy markup. A body
/// with no usable entries and no recognizable root falls back to a
/// line-oriented scan for bare absolute URLs.
fn classify_and_extract(body: &str) -> (DocumentKind, Vec<String>) {
    let loc_re = Regex::new(r"<loc>\s*([^<]+)\s*</loc>").unwrap();
    let entries: Vec<String> = loc_re
        .captures_iter(body)
        .map(|cap| cap[1].trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect();

    let lowered = body.to_lowercase();
    if lowered.contains("<sitemapindex") {
        (DocumentKind::Index, entries)
    } else if !entries.is_empty() {
        (DocumentKind::UrlSet, entries)
    } else {
        (DocumentKind::LineScan, line_scan(body))
    }
}

/// Salvage pass for non-conformant plaintext "sitemaps": any line that is
/// itself an absolute http(s) URL is treated as a leaf.
fn line_scan(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| line.starts_with("http://") || line.starts_with("https://"))
        .map(str::to_string)
        .collect()
}

/// Heuristic for urlset entries that are really further sitemaps.
fn looks_like_sitemap(url: &str) -> bool {
    let lowered = url.to_ascii_lowercase();
    lowered.ends_with(".xml") || lowered.ends_with(".xml.gz") || lowered.contains("sitemap")
}
