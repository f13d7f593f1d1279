// Report generation over completed recon results.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use surveyor_scanner::{ReconResult, interesting};

/// Only this many discovered URLs are listed inline in the text and
/// markdown renderings; the full set always lands in JSON/CSV.
const MAX_LISTED_URLS: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Html,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "html" => Some(ReportFormat::Html),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Html => "html",
            ReportFormat::Markdown => "md",
        }
    }
}

/// Render results in the requested format.
pub fn render(format: &ReportFormat, results: &[ReconResult]) -> Result<String, String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(results)),
        ReportFormat::Json => {
            generate_json_report(results).map_err(|e| format!("JSON rendering failed: {}", e))
        }
        ReportFormat::Csv => Ok(generate_csv_report(results)),
        ReportFormat::Html => Ok(generate_html_report(results)),
        ReportFormat::Markdown => Ok(generate_markdown_report(results)),
    }
}

pub fn generate_text_report(results: &[ReconResult]) -> String {
    let mut report = String::new();

    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("                        SURVEYOR RECON REPORT\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    report.push_str(&format!("Targets:          {}\n", results.len()));
    let fetched = results.iter().filter(|r| r.robots_fetched).count();
    report.push_str(&format!("Robots fetched:   {}\n", fetched));
    let total_urls: usize = results.iter().map(|r| r.discovered_urls.len()).sum();
    report.push_str(&format!("URLs discovered:  {}\n\n", total_urls));

    for result in results {
        report.push_str("──────────────────────────────────────────────────────────────────────────────\n");
        report.push_str(&format!("## {}\n", result.target));
        if !result.base_url.is_empty() {
            report.push_str(&format!("Base URL:     {}\n", result.base_url));
        }

        if result.robots_fetched {
            if let Some(ref robots) = result.robots {
                report.push_str(&format!(
                    "robots.txt:   fetched ({} disallow, {} allow, {} sitemap, {} comments)\n",
                    robots.disallow.len(),
                    robots.allow.len(),
                    robots.sitemaps.len(),
                    robots.comments.len()
                ));
            }
        } else {
            report.push_str(&format!(
                "robots.txt:   FAILED -> {}\n",
                result.error.as_deref().unwrap_or("unknown error")
            ));
        }

        if !result.sitemaps.is_empty() {
            report.push_str(&format!(
                "\nSitemaps ({} fetched):\n",
                result.sitemap_fetches
            ));
            for outcome in &result.sitemaps {
                if outcome.fetched {
                    report.push_str(&format!(
                        "  [ok]   {} ({} urls, depth {})\n",
                        outcome.url, outcome.urls_count, outcome.depth
                    ));
                } else {
                    report.push_str(&format!(
                        "  [fail] {} -> {}\n",
                        outcome.url,
                        outcome.error.as_deref().unwrap_or("unknown error")
                    ));
                }
            }
        }

        if !result.discovered_urls.is_empty() {
            let suffix = if result.limit_reached {
                " (limit reached)"
            } else {
                ""
            };
            report.push_str(&format!(
                "\nDiscovered URLs: {}{}\n",
                result.discovered_urls.len(),
                suffix
            ));
            for url in result.discovered_urls.iter().take(MAX_LISTED_URLS) {
                report.push_str(&format!("  - {}\n", url));
            }
            if result.discovered_urls.len() > MAX_LISTED_URLS {
                report.push_str(&format!(
                    "  ... and {} more\n",
                    result.discovered_urls.len() - MAX_LISTED_URLS
                ));
            }
        }

        if !result.probes.is_empty() {
            let hits = interesting(&result.probes).len();
            report.push_str(&format!(
                "\nProbes ({} interesting of {}):\n",
                hits,
                result.probes.len()
            ));
            for probe in &result.probes {
                let status = probe
                    .status
                    .map(|code| code.to_string())
                    .unwrap_or_else(|| "---".to_string());
                let mut line = format!("  {} {}", status, probe.path);
                if let Some(ref content_type) = probe.content_type {
                    line.push_str(&format!(" [{}]", content_type));
                }
                report.push_str(&line);
                report.push('\n');
            }
        }
        report.push('\n');
    }

    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("                          End of Report\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("\nGenerated by Surveyor. For authorized security testing only.\n");

    report
}

pub fn generate_json_report(results: &[ReconResult]) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Surveyor",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json",
                "disclaimer": "For authorized security testing only"
            },
            "summary": {
                "targets": results.len(),
                "robots_fetched": results.iter().filter(|r| r.robots_fetched).count(),
                "sitemap_fetches": results.iter().map(|r| r.sitemap_fetches).sum::<usize>(),
                "urls_discovered": results.iter().map(|r| r.discovered_urls.len()).sum::<usize>(),
                "probes": results.iter().map(|r| r.probes.len()).sum::<usize>()
            },
            "results": results
        }
    });

    serde_json::to_string_pretty(&json_report)
}

/// Flat CSV: one row per discovered URL or probe, tagged with its kind.
pub fn generate_csv_report(results: &[ReconResult]) -> String {
    let mut csv = String::from("target,kind,url,status,content_type\n");

    for result in results {
        for url in &result.discovered_urls {
            csv.push_str(&format!(
                "{},leaf,{},,\n",
                csv_field(&result.target),
                csv_field(url)
            ));
        }
        for probe in &result.probes {
            csv.push_str(&format!(
                "{},probe,{},{},{}\n",
                csv_field(&result.target),
                csv_field(&probe.url),
                probe.status.map(|s| s.to_string()).unwrap_or_default(),
                csv_field(probe.content_type.as_deref().unwrap_or(""))
            ));
        }
    }

    csv
}

pub fn generate_markdown_report(results: &[ReconResult]) -> String {
    let mut report = String::from("# Surveyor Recon Report\n\n");

    for result in results {
        report.push_str(&format!("## {}\n\n", result.target));

        if result.robots_fetched {
            report.push_str("- robots.txt: fetched\n");
        } else {
            report.push_str(&format!(
                "- robots.txt: failed ({})\n",
                result.error.as_deref().unwrap_or("unknown error")
            ));
        }
        report.push_str(&format!("- Sitemap fetches: {}\n", result.sitemap_fetches));
        report.push_str(&format!(
            "- URLs discovered: {}\n\n",
            result.discovered_urls.len()
        ));

        if !result.discovered_urls.is_empty() {
            report.push_str("### URLs\n\n");
            for url in result.discovered_urls.iter().take(MAX_LISTED_URLS) {
                report.push_str(&format!("- {}\n", url));
            }
            if result.discovered_urls.len() > MAX_LISTED_URLS {
                report.push_str(&format!(
                    "- ... and {} more\n",
                    result.discovered_urls.len() - MAX_LISTED_URLS
                ));
            }
            report.push('\n');
        }

        if !result.probes.is_empty() {
            report.push_str("### Probes\n\n");
            report.push_str("| Path | Status | Content-Type |\n|---|---|---|\n");
            for probe in &result.probes {
                report.push_str(&format!(
                    "| {} | {} | {} |\n",
                    probe.path,
                    probe
                        .status
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    probe.content_type.as_deref().unwrap_or("-")
                ));
            }
            report.push('\n');
        }
    }

    report
}

pub fn generate_html_report(results: &[ReconResult]) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Surveyor Recon Report</title>\n\
         <style>\n\
         body { font-family: monospace; margin: 2em; }\n\
         table { border-collapse: collapse; }\n\
         td, th { border: 1px solid #999; padding: 4px 8px; text-align: left; }\n\
         .fail { color: #b00; }\n\
         </style>\n</head>\n<body>\n<h1>Surveyor Recon Report</h1>\n",
    );

    for result in results {
        html.push_str(&format!("<h2>{}</h2>\n", html_escape(&result.target)));
        if result.robots_fetched {
            html.push_str("<p>robots.txt: fetched</p>\n");
        } else {
            html.push_str(&format!(
                "<p class=\"fail\">robots.txt: failed ({})</p>\n",
                html_escape(result.error.as_deref().unwrap_or("unknown error"))
            ));
        }

        if !result.discovered_urls.is_empty() {
            html.push_str(&format!(
                "<p>{} URLs discovered from {} sitemap fetches</p>\n<ul>\n",
                result.discovered_urls.len(),
                result.sitemap_fetches
            ));
            for url in &result.discovered_urls {
                html.push_str(&format!("<li>{}</li>\n", html_escape(url)));
            }
            html.push_str("</ul>\n");
        }

        if !result.probes.is_empty() {
            html.push_str(
                "<table>\n<tr><th>Path</th><th>Status</th><th>Content-Type</th></tr>\n",
            );
            for probe in &result.probes {
                html.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    html_escape(&probe.path),
                    probe
                        .status
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    html_escape(probe.content_type.as_deref().unwrap_or("-"))
                ));
            }
            html.push_str("</table>\n");
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Build a timestamped report path under an explicit output directory.
pub fn report_path(output_dir: &Path, label: &str, format: &ReportFormat) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    output_dir.join(format!("{}_{}.{}", label, timestamp, format.extension()))
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
