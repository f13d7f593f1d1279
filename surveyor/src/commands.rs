use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("surveyor")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("surveyor")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("recon")
                .about(
                    "Map a target's crawlable surface: fetch robots.txt, expand declared \
                sitemaps into leaf URLs, optionally probe well-known paths.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("The target to scan (bare domain or full URL)")
                        .conflicts_with("hosts-file"),
                )
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of targets ('#' comments skipped)")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with("url"),
                )
                .arg(
                    arg!(-w --"workers" <NUM_WORKERS>)
                        .required(false)
                        .help("Targets scanned concurrently per batch")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("4"),
                )
                .arg(
                    arg!(-t --"timeout" <SECONDS>)
                        .required(false)
                        .help("Per-request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(-a --"user-agent" <STRING>)
                        .required(false)
                        .help("User-Agent header sent with every request"),
                )
                .arg(
                    arg!(--"proxy" <URL>)
                        .required(false)
                        .help("Proxy for all requests (e.g. socks5h://127.0.0.1:9050)"),
                )
                .arg(
                    arg!(--"deep")
                        .required(false)
                        .help("Also crawl well-known sitemap locations not declared in robots.txt")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"max-depth" <N>)
                        .required(false)
                        .help("Sitemap recursion ceiling")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("5"),
                )
                .arg(
                    arg!(--"max-sitemap-fetches" <N>)
                        .required(false)
                        .help("Sitemap documents fetched per target")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("200"),
                )
                .arg(
                    arg!(--"max-urls" <N>)
                        .required(false)
                        .help("Leaf URLs collected per target")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("50000"),
                )
                .arg(
                    arg!(--"probe")
                        .required(false)
                        .help("Probe the built-in list of well-known discovery paths")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"probe-concurrency" <N>)
                        .required(false)
                        .help("Concurrent probe requests")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"probe-delay-ms" <MS>)
                        .required(false)
                        .help("Upper bound of the per-request politeness jitter")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("250"),
                )
                .arg(
                    arg!(--"check-urls" <N>)
                        .required(false)
                        .help("HEAD-check the first N discovered URLs (0 disables)")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("0"),
                )
                .arg(
                    arg!(--"deadline" <SECONDS>)
                        .required(false)
                        .help("Hard per-target deadline")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(-d --"output-dir" <PATH>)
                        .required(false)
                        .help("Directory for per-target reports (set '' to disable)")
                        .default_value("recon_reports"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Write one combined report to this file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, csv, html, markdown")
                        .value_parser(["text", "json", "csv", "html", "markdown"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("probe")
                .about(
                    "Probe a host for well-known paths without the robots.txt/sitemap \
                pipeline.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The base URL to probe against"),
                )
                .arg(
                    arg!(-p --"paths-file" <PATH>)
                        .required(false)
                        .help("Newline-delimited candidate paths (default: built-in list)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-c --"concurrency" <N>)
                        .required(false)
                        .help("Concurrent probe requests")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                )
                .arg(
                    arg!(-t --"timeout" <SECONDS>)
                        .required(false)
                        .help("Per-request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("5"),
                )
                .arg(
                    arg!(--"probe-delay-ms" <MS>)
                        .required(false)
                        .help("Upper bound of the per-request politeness jitter")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("250"),
                )
                .arg(
                    arg!(-a --"user-agent" <STRING>)
                        .required(false)
                        .help("User-Agent header sent with every request"),
                )
                .arg(
                    arg!(--"all")
                        .required(false)
                        .help("Show every probe, not only the interesting ones")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}
