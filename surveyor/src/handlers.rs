use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::ArgMatches;
use colored::Colorize;

use surveyor_core::recon::{ReconOptions, ReconProgressCallback, execute_recon, summary_line};
use surveyor_core::report::{self, ReportFormat};
use surveyor_scanner::probe::DEFAULT_PROBE_PATHS;
use surveyor_scanner::{Fetcher, PathProber, ReconResult, ScanConfig, Target, interesting};

// Helper functions for the recon handler

/// Load targets from either a hosts file or a single --url argument.
pub fn load_targets_from_source(
    url: Option<&String>,
    hosts_file: Option<&PathBuf>,
) -> Result<Vec<String>, String> {
    if let Some(hosts_file_path) = hosts_file {
        load_targets_from_file(hosts_file_path)
    } else if let Some(url) = url {
        match parse_target_line(url) {
            Some(target) => Ok(vec![target]),
            None => Err(format!("Invalid target '{}'", url)),
        }
    } else {
        Err("Either --url or --hosts-file must be provided".to_string())
    }
}

/// Load and validate targets from a newline-delimited file. Blank lines
/// and '#' comments are skipped.
pub fn load_targets_from_file(path: &PathBuf) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read hosts file {}: {}", path.display(), e))?;

    let targets: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_target_line)
        .collect();

    if targets.is_empty() {
        return Err(format!("No valid targets found in {}", path.display()));
    }

    Ok(targets)
}

/// Validate one line as a scannable target. Bare domains are fine; lines
/// with no scheme-normalizable form are skipped with a warning.
pub fn parse_target_line(line: &str) -> Option<String> {
    match Target::normalize(line) {
        Ok(_) => Some(line.trim().to_string()),
        Err(e) => {
            eprintln!("[!] Skipping: {}", e);
            None
        }
    }
}

/// Candidate paths file for the probe subcommand: blank lines and '#'
/// comments skipped.
pub fn load_candidate_paths(path: &PathBuf) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read paths file {}: {}", path.display(), e))?;

    let paths: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    if paths.is_empty() {
        return Err(format!(
            "Paths file {} is empty or contains only comments",
            path.display()
        ));
    }

    Ok(paths)
}

fn build_scan_config(args: &ArgMatches) -> Result<ScanConfig, String> {
    let mut config = ScanConfig {
        timeout_secs: *args.get_one::<u64>("timeout").unwrap_or(&10),
        max_depth: *args.get_one::<usize>("max-depth").unwrap_or(&5),
        max_sitemap_fetches: *args.get_one::<usize>("max-sitemap-fetches").unwrap_or(&200),
        max_leaf_urls: *args.get_one::<usize>("max-urls").unwrap_or(&50_000),
        deep_mode: args.get_flag("deep"),
        probe_concurrency: *args.get_one::<usize>("probe-concurrency").unwrap_or(&10),
        probe_delay_ms: *args.get_one::<u64>("probe-delay-ms").unwrap_or(&250),
        check_urls: *args.get_one::<usize>("check-urls").unwrap_or(&0),
        ..ScanConfig::default()
    };

    if let Some(user_agent) = args.get_one::<String>("user-agent") {
        config.user_agent = user_agent.clone();
    }
    if args.get_flag("probe") {
        config.probe_candidates = DEFAULT_PROBE_PATHS.iter().map(|p| p.to_string()).collect();
    }
    if let Some(proxy) = args.get_one::<String>("proxy") {
        // The proxy is handed to the engine as an opaque transport handle.
        let proxy = reqwest::Proxy::all(proxy.as_str())
            .map_err(|e| format!("Invalid proxy '{}': {}", proxy, e))?;
        config.proxy = Some(proxy);
    }

    Ok(config)
}

fn target_label(result: &ReconResult) -> String {
    match Target::normalize(&result.target) {
        Ok(target) => target.host_label(),
        Err(_) => "target".to_string(),
    }
}

pub async fn handle_recon(sub_matches: &ArgMatches, quiet: bool) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let url = sub_matches.get_one::<String>("url");
    let hosts_file = sub_matches.get_one::<PathBuf>("hosts-file");
    let workers = *sub_matches.get_one::<usize>("workers").unwrap_or(&4);
    let deadline_secs = sub_matches.get_one::<u64>("deadline").copied();

    let targets = match load_targets_from_source(url, hosts_file) {
        Ok(targets) => targets,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    let config = match build_scan_config(sub_matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    let format_name = sub_matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    let format = ReportFormat::from_str(format_name).unwrap_or(ReportFormat::Text);
    let output = sub_matches.get_one::<PathBuf>("output");
    let output_dir = sub_matches
        .get_one::<String>("output-dir")
        .map(String::as_str)
        .unwrap_or("recon_reports");

    if !quiet {
        println!("\nScanning {} target(s)", targets.len());
        println!("Workers: {}", workers);
        println!(
            "Deep mode: {}",
            if config.deep_mode { "on" } else { "off" }
        );
        if !config.probe_candidates.is_empty() {
            println!("Probing: {} well-known paths", config.probe_candidates.len());
        }
        println!();
    }

    let options = ReconOptions {
        targets,
        workers,
        config,
        show_progress_bars: !quiet,
        deadline_secs,
    };

    let progress_callback: Option<ReconProgressCallback> = if quiet {
        None
    } else {
        Some(Arc::new(|msg: String| {
            println!("{}", msg);
        }))
    };

    let results = match execute_recon(options, progress_callback).await {
        Ok(results) => results,
        Err(e) => {
            eprintln!("{} Recon failed: {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    if !quiet {
        println!("\n{} Recon complete!\n", "✓".green().bold());
        println!("{}", "Summary".bright_white().bold());
        for result in &results {
            if result.robots_fetched {
                println!("  {} {}", "✓".green(), summary_line(result));
            } else {
                println!("  {} {}", "✗".red(), summary_line(result));
            }
        }
        println!();
    }

    // Per-target reports under the explicit output directory.
    if !output_dir.is_empty() {
        let expanded = shellexpand::tilde(output_dir);
        let dir = Path::new(expanded.as_ref());
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!(
                "{} Failed to create output directory {}: {}",
                "✗".red().bold(),
                dir.display(),
                e
            );
            std::process::exit(1);
        }

        for result in &results {
            let path = report::report_path(dir, &target_label(result), &format);
            match report::render(&format, std::slice::from_ref(result)) {
                Ok(rendered) => {
                    if let Err(e) = report::save_report(&rendered, &path) {
                        eprintln!("[!] Failed to write {}: {}", path.display(), e);
                    } else if !quiet {
                        println!("{} Report saved: {}", "✓".green(), path.display());
                    }
                }
                Err(e) => eprintln!("[!] {}", e),
            }
        }
    }

    // Combined report: to a file when requested, otherwise to the screen
    // when no directory reports were written.
    match output {
        Some(path) => match report::render(&format, &results) {
            Ok(rendered) => {
                if let Err(e) = report::save_report(&rendered, path) {
                    eprintln!(
                        "{} Failed to write {}: {}",
                        "✗".red().bold(),
                        path.display(),
                        e
                    );
                    std::process::exit(1);
                }
                if !quiet {
                    println!("{} Combined report saved: {}", "✓".green(), path.display());
                }
            }
            Err(e) => {
                eprintln!("{} {}", "✗".red().bold(), e);
                std::process::exit(1);
            }
        },
        None => {
            if output_dir.is_empty() {
                match report::render(&format, &results) {
                    Ok(rendered) => print!("{}", rendered),
                    Err(e) => eprintln!("[!] {}", e),
                }
            }
        }
    }
}

pub async fn handle_probe(sub_matches: &ArgMatches) {
    tracing_subscriber::fmt::init();

    let url = sub_matches.get_one::<String>("url").expect("url is required");
    let paths_file = sub_matches.get_one::<PathBuf>("paths-file");
    let concurrency = *sub_matches.get_one::<usize>("concurrency").unwrap_or(&10);
    let timeout_secs = *sub_matches.get_one::<u64>("timeout").unwrap_or(&5);
    let delay_ms = *sub_matches.get_one::<u64>("probe-delay-ms").unwrap_or(&250);
    let show_all = sub_matches.get_flag("all");

    let target = match Target::normalize(url) {
        Ok(target) => target,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    let candidates = match paths_file {
        Some(path) => match load_candidate_paths(path) {
            Ok(paths) => paths,
            Err(e) => {
                eprintln!("{} {}", "✗".red().bold(), e);
                std::process::exit(1);
            }
        },
        None => DEFAULT_PROBE_PATHS.iter().map(|p| p.to_string()).collect(),
    };

    let mut config = ScanConfig {
        timeout_secs,
        probe_concurrency: concurrency,
        probe_delay_ms: delay_ms,
        ..ScanConfig::default()
    };
    if let Some(user_agent) = sub_matches.get_one::<String>("user-agent") {
        config.user_agent = user_agent.clone();
    }

    let fetcher = match Fetcher::new(&config) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };
    let prober = PathProber::new(fetcher, concurrency, delay_ms);

    println!("\nProbing {} with {} candidate path(s)\n", target, candidates.len());

    match prober.probe(target.base(), &candidates).await {
        Ok(results) => {
            let hits = interesting(&results).len();

            for result in &results {
                let is_hit = matches!(result.status, Some(code) if (200..500).contains(&code));
                if !show_all && !is_hit {
                    continue;
                }

                let status = match result.status {
                    Some(code @ 200..=299) => code.to_string().green().to_string(),
                    Some(code @ 300..=399) => code.to_string().cyan().to_string(),
                    Some(code @ 400..=499) => code.to_string().yellow().to_string(),
                    Some(code) => code.to_string().red().to_string(),
                    None => "---".bright_black().to_string(),
                };

                let mut line = format!("  {} {}", status, result.path);
                if let Some(ref content_type) = result.content_type {
                    line.push_str(&format!(" {}", content_type.bright_black()));
                }
                println!("{}", line);
            }

            println!(
                "\n{} {} of {} paths interesting",
                "✓".green().bold(),
                hits,
                results.len()
            );
        }
        Err(e) => {
            eprintln!("{} Probe failed: {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}
