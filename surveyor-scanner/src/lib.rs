pub mod config;
pub mod error;
pub mod fetch;
pub mod probe;
pub mod recon;
pub mod robots;
pub mod sitemap;
pub mod target;

pub use config::ScanConfig;
pub use error::{FetchError, ReconError, Result};
pub use fetch::{Document, Fetcher};
pub use probe::{PathProber, ProbeResult, interesting};
pub use recon::{ReconEngine, ReconResult};
pub use robots::RobotsDirectives;
pub use sitemap::{Resolution, ResolveLimits, SitemapOutcome, SitemapResolver};
pub use target::Target;
