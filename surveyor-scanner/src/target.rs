use std::fmt;

use url::Url;

use crate::error::{ReconError, Result};

/// Normalized base URL for one recon target. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    base: Url,
    raw: String,
}

impl Target {
    /// Normalize raw user input into a scheme-prefixed base URL.
    ///
    /// Bare domains get an `https://` prefix; an empty path becomes `/`
    /// so that relative joins resolve against the site root. Input with
    /// no scheme-normalizable form is a configuration error.
    pub fn normalize(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ReconError::InvalidTarget("empty target".to_string()));
        }

        let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };

        let mut base = Url::parse(&candidate)
            .map_err(|e| ReconError::InvalidTarget(format!("{}: {}", trimmed, e)))?;

        if base.host_str().is_none() {
            return Err(ReconError::InvalidTarget(format!("{}: no host", trimmed)));
        }
        if base.path().is_empty() {
            base.set_path("/");
        }

        Ok(Self {
            base,
            raw: trimmed.to_string(),
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// The input string as the user supplied it, trimmed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Host label usable in report filenames (`:` is swapped for `_`).
    pub fn host_label(&self) -> String {
        let host = self.base.host_str().unwrap_or("target");
        match self.base.port() {
            Some(port) => format!("{}_{}", host, port),
            None => host.to_string(),
        }
    }

    /// Resolve a path against the base with standard URL-join semantics.
    pub fn join(&self, path: &str) -> Option<Url> {
        self.base.join(path).ok()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_domain_gets_https_and_trailing_slash() {
        let target = Target::normalize("example.com").unwrap();
        assert_eq!(target.base().as_str(), "https://example.com/");
    }

    #[test]
    fn explicit_scheme_is_preserved() {
        let target = Target::normalize("http://example.com").unwrap();
        assert_eq!(target.base().as_str(), "http://example.com/");
    }

    #[test]
    fn existing_path_is_kept() {
        let target = Target::normalize("https://example.com/app/").unwrap();
        assert_eq!(target.base().as_str(), "https://example.com/app/");
        let joined = target.join("robots.txt").unwrap();
        assert_eq!(joined.as_str(), "https://example.com/app/robots.txt");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let target = Target::normalize("  example.com  ").unwrap();
        assert_eq!(target.raw(), "example.com");
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            Target::normalize("   "),
            Err(ReconError::InvalidTarget(_))
        ));
    }

    #[test]
    fn unparseable_input_is_rejected() {
        assert!(matches!(
            Target::normalize("not a valid url"),
            Err(ReconError::InvalidTarget(_))
        ));
    }

    #[test]
    fn host_label_includes_port() {
        let target = Target::normalize("example.com:8443").unwrap();
        assert_eq!(target.host_label(), "example.com_8443");
    }

    #[test]
    fn absolute_path_join_replaces_base_path() {
        let target = Target::normalize("https://example.com/app/").unwrap();
        let joined = target.join("/sitemap.xml").unwrap();
        assert_eq!(joined.as_str(), "https://example.com/sitemap.xml");
    }
}
