use serde::{Deserialize, Serialize};

/// Directives extracted from one robots.txt body, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotsDirectives {
    pub disallow: Vec<String>,
    pub allow: Vec<String>,
    pub sitemaps: Vec<String>,
    pub comments: Vec<String>,
}

impl RobotsDirectives {
    /// Parse a robots.txt body.
    ///
    /// Total function: malformed or directive-free input yields an empty
    /// but valid value. Directive names match case-insensitively at line
    /// start after leading whitespace; a line's value is everything after
    /// the first colon, trimmed.
    pub fn parse(body: &str) -> Self {
        let mut directives = RobotsDirectives::default();

        for line in body.lines() {
            let trimmed = line.trim_start();

            if let Some(idx) = trimmed.find('#') {
                let comment = trimmed[idx + 1..].trim();
                if !comment.is_empty() {
                    directives.comments.push(comment.to_string());
                }
            }

            if let Some(value) = directive_value(trimmed, "Disallow") {
                directives.disallow.push(value);
            } else if let Some(value) = directive_value(trimmed, "Allow") {
                directives.allow.push(value);
            } else if let Some(value) = directive_value(trimmed, "Sitemap") {
                directives.sitemaps.push(value);
            }
        }

        directives
    }

    pub fn is_empty(&self) -> bool {
        self.disallow.is_empty()
            && self.allow.is_empty()
            && self.sitemaps.is_empty()
            && self.comments.is_empty()
    }
}

/// Match `Name:` anchored at line start, case-insensitively, and return
/// the trimmed remainder of the line.
fn directive_value(line: &str, name: &str) -> Option<String> {
    let bytes = line.as_bytes();
    if bytes.len() <= name.len() {
        return None;
    }
    if !bytes[..name.len()].eq_ignore_ascii_case(name.as_bytes()) {
        return None;
    }
    if bytes[name.len()] != b':' {
        return None;
    }
    Some(line[name.len() + 1..].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_directives_in_source_order() {
        let body = "User-agent: *\n\
                    Disallow: /admin\n\
                    Allow: /admin/public\n\
                    Sitemap: https://example.com/sitemap.xml\n\
                    Sitemap: https://example.com/news.xml\n";
        let parsed = RobotsDirectives::parse(body);

        assert_eq!(parsed.disallow, vec!["/admin"]);
        assert_eq!(parsed.allow, vec!["/admin/public"]);
        assert_eq!(
            parsed.sitemaps,
            vec![
                "https://example.com/sitemap.xml",
                "https://example.com/news.xml"
            ]
        );
    }

    #[test]
    fn directive_match_is_case_insensitive() {
        let parsed = RobotsDirectives::parse("SITEMAP: https://a.example/s.xml\ndisallow: /x\n");
        assert_eq!(parsed.sitemaps, vec!["https://a.example/s.xml"]);
        assert_eq!(parsed.disallow, vec!["/x"]);
    }

    #[test]
    fn leading_whitespace_is_tolerated() {
        let parsed = RobotsDirectives::parse("   Disallow: /private\n\t Sitemap: https://e/s.xml\n");
        assert_eq!(parsed.disallow, vec!["/private"]);
        assert_eq!(parsed.sitemaps, vec!["https://e/s.xml"]);
    }

    #[test]
    fn value_starts_after_the_first_colon() {
        // The sitemap URL itself contains colons; only the directive
        // colon splits the line.
        let parsed = RobotsDirectives::parse("Sitemap: https://example.com:8443/sitemap.xml\n");
        assert_eq!(parsed.sitemaps, vec!["https://example.com:8443/sitemap.xml"]);
    }

    #[test]
    fn disallow_does_not_shadow_allow() {
        let parsed = RobotsDirectives::parse("Allow: /open\n");
        assert_eq!(parsed.allow, vec!["/open"]);
        assert!(parsed.disallow.is_empty());
    }

    #[test]
    fn comments_are_captured_separately() {
        let body = "# managed by ops\nDisallow: /tmp # scratch space\n";
        let parsed = RobotsDirectives::parse(body);
        assert_eq!(parsed.comments, vec!["managed by ops", "scratch space"]);
        assert_eq!(parsed.disallow, vec!["/tmp # scratch space"]);
    }

    #[test]
    fn directive_free_input_yields_empty_value() {
        let parsed = RobotsDirectives::parse("just some text\nwith no directives\n");
        assert!(parsed.is_empty());
    }

    #[test]
    fn empty_input_yields_empty_value() {
        assert!(RobotsDirectives::parse("").is_empty());
    }

    #[test]
    fn empty_directive_values_are_kept() {
        // `Disallow:` with no value is the canonical allow-everything rule.
        let parsed = RobotsDirectives::parse("Disallow:\n");
        assert_eq!(parsed.disallow, vec![""]);
    }

    #[test]
    fn colonless_directive_names_are_ignored() {
        let parsed = RobotsDirectives::parse("Sitemap https://example.com/s.xml\n");
        assert!(parsed.sitemaps.is_empty());
    }
}
