use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use surveyor_scanner::{ReconEngine, ReconResult, ScanConfig};

/// Options for one batch of recon runs.
pub struct ReconOptions {
    pub targets: Vec<String>,
    /// Upper bound of concurrent per-target runs.
    pub workers: usize,
    pub config: ScanConfig,
    pub show_progress_bars: bool,
    /// Hard per-target deadline. None lets a run go to its configured
    /// limits.
    pub deadline_secs: Option<u64>,
}

/// Callback for per-target completion lines.
pub type ReconProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Run recon over all targets in batches of at most `workers` concurrent
/// runs; a new batch starts only once the previous batch has fully
/// completed. One target's failure never aborts its siblings.
pub async fn execute_recon(
    options: ReconOptions,
    progress_callback: Option<ReconProgressCallback>,
) -> Result<Vec<ReconResult>, String> {
    let ReconOptions {
        targets,
        workers,
        config,
        show_progress_bars,
        deadline_secs,
    } = options;

    if targets.is_empty() {
        return Err("No targets provided".to_string());
    }
    let workers = workers.max(1);

    let engine = Arc::new(
        ReconEngine::new(config).map_err(|e| format!("Failed to build recon engine: {}", e))?,
    );

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.set_message("Starting recon...");
        Some(pb)
    } else {
        None
    };

    let total = targets.len();
    let mut all_results = Vec::with_capacity(total);
    let mut completed = 0usize;

    for batch in targets.chunks(workers) {
        let mut handles = Vec::with_capacity(batch.len());

        for target in batch {
            let engine = engine.clone();
            let target = target.clone();

            handles.push(tokio::spawn(async move {
                let outcome = match deadline_secs {
                    Some(secs) => {
                        match tokio::time::timeout(
                            Duration::from_secs(secs),
                            engine.run(&target),
                        )
                        .await
                        {
                            Ok(outcome) => outcome,
                            Err(_) => Ok(ReconResult::failed(
                                &target,
                                format!("deadline of {}s exceeded", secs),
                            )),
                        }
                    }
                    None => engine.run(&target).await,
                };

                match outcome {
                    Ok(result) => result,
                    Err(e) => {
                        warn!("recon failed for {}: {}", target, e);
                        ReconResult::failed(&target, e.to_string())
                    }
                }
            }));
        }

        for handle in handles {
            let result = handle
                .await
                .map_err(|e| format!("Worker task failed: {}", e))?;

            completed += 1;
            if let Some(ref pb) = progress_bar {
                pb.set_message(format!("Scanning... {}/{} targets complete", completed, total));
                pb.tick();
            }
            if let Some(ref callback) = progress_callback {
                callback(format!("[{}/{}] {}", completed, total, summary_line(&result)));
            }
            all_results.push(result);
        }
    }

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!("Recon complete! {} target(s) processed", total));
    }

    Ok(all_results)
}

/// One-line console summary for a completed target.
pub fn summary_line(result: &ReconResult) -> String {
    if result.robots_fetched {
        let mut line = format!(
            "{}: robots OK, sitemaps={}, urls={}",
            result.target,
            result.sitemaps.len(),
            result.discovered_urls.len()
        );
        if !result.probes.is_empty() {
            line.push_str(&format!(", probes={}", result.probes.len()));
        }
        if result.limit_reached {
            line.push_str(" (limit reached)");
        }
        line
    } else {
        format!(
            "{}: FAILED -> {}",
            result.target,
            result.error.as_deref().unwrap_or("unknown error")
        )
    }
}
