use std::io::Read;
use std::time::Duration;

use encoding_rs::{Encoding, UTF_8};
use flate2::read::GzDecoder;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::ScanConfig;
use crate::error::{FetchError, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A fetched body, decompressed and decoded to text.
#[derive(Debug, Clone)]
pub struct Document {
    pub body: String,
    pub content_type: Option<String>,
}

/// Single-shot bounded-timeout retrieval over a shared HTTP client.
///
/// No retries live here; callers decide policy.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &ScanConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs.div_ceil(2)))
            .redirect(reqwest::redirect::Policy::limited(5));

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(proxy.clone());
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Fetch a URL and return its body as text.
    ///
    /// Bodies stored gzipped (`.gz` URL suffix or `1f 8b` magic bytes) are
    /// decompressed first; a failed decompression falls back to the raw
    /// bytes instead of aborting the fetch. The charset declared in the
    /// Content-Type header drives decoding, defaulting to UTF-8 with
    /// replacement for undecodable sequences.
    pub async fn fetch_text(&self, url: &str) -> std::result::Result<Document, FetchError> {
        debug!("fetching {}", url);

        let response = self.client.get(url).send().await.map_err(FetchError::from)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let raw = response.bytes().await.map_err(FetchError::from)?;
        let bytes = maybe_gunzip(url, &raw);
        let body = decode_body(&bytes, content_type.as_deref());

        Ok(Document { body, content_type })
    }

    /// Lightweight existence check: HEAD request, no body transfer.
    ///
    /// Any HTTP status is a successful check and is returned as-is; only
    /// transport failures surface as errors.
    pub async fn head(&self, url: &str) -> std::result::Result<(u16, Option<String>), FetchError> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(FetchError::from)?;

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        Ok((response.status().as_u16(), content_type))
    }
}

fn maybe_gunzip(url: &str, raw: &[u8]) -> Vec<u8> {
    let looks_gzipped = url.to_ascii_lowercase().ends_with(".gz") || raw.starts_with(&GZIP_MAGIC);
    if !looks_gzipped {
        return raw.to_vec();
    }

    let mut decoder = GzDecoder::new(raw);
    let mut decompressed = Vec::new();
    match decoder.read_to_end(&mut decompressed) {
        Ok(_) => decompressed,
        Err(e) => {
            warn!("gzip decompression failed for {}: {}", url, e);
            raw.to_vec()
        }
    }
}

/// Decode bytes using the charset from a Content-Type header value,
/// defaulting to UTF-8. Undecodable bytes are replaced, never fatal.
fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(|ct| ct.split("charset=").nth(1))
        .map(|rest| rest.split(';').next().unwrap_or(rest).trim().trim_matches('"'))
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);

    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}
