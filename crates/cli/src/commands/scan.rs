use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{info, warn};
use walkdir::WalkDir;

use darkux_guard::report::DetectionReport;
use darkux_guard::{FetchFailure, Target};
use darkux_guard_detectors::DetectionEngine;
use darkux_guard_monitor::file::is_snapshot_file;
use darkux_guard_monitor::{FilePageSource, HttpPageSource, PageSource};

use super::{is_local, Settings};
use crate::output;
use crate::{DetectorArgs, OutputFormat};

pub async fn run(
    target: &str,
    format: OutputFormat,
    args: &DetectorArgs,
    min_score: Option<u8>,
    quiet: bool,
    no_color: bool,
) -> Result<()> {
    let settings = Settings::load(args);
    let engine = DetectionEngine::new(settings.detectors.clone())
        .with_suppressions(settings.config.suppressions.clone());

    let reports = if Path::new(target).is_dir() {
        let files = collect_snapshots(Path::new(target));
        if !quiet {
            eprintln!("Scanning {} snapshots...", files.len());
        }
        scan_files(&engine, &files)
    } else {
        let source: Box<dyn PageSource> = if is_local(target) {
            Box::new(FilePageSource)
        } else {
            Box::new(
                HttpPageSource::from_config(&settings.config.source)
                    .context("failed to build HTTP client")?,
            )
        };
        vec![scan_one(&engine, source.as_ref(), &Target::new(target)).await]
    };

    match format {
        OutputFormat::Json => output::json::print(&reports)?,
        OutputFormat::Sarif => output::sarif::print(&reports)?,
        OutputFormat::Text => output::text::print(&reports, quiet, no_color)?,
    }

    if let Some(threshold) = min_score {
        let failing = reports.iter().filter(|r| r.score() < threshold).count();
        if failing > 0 {
            info!(failing, threshold, "pages below minimum score");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn scan_one(
    engine: &DetectionEngine,
    source: &dyn PageSource,
    target: &Target,
) -> DetectionReport {
    match source.fetch(target).await {
        Ok(page) => engine.run(Some(target), &page),
        Err(failure) => {
            warn!(page = %target, error = %failure, "fetch failed");
            engine.failure_report(Some(target), &failure)
        }
    }
}

/// Snapshot files under `root`, in path order.
fn collect_snapshots(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_snapshot_file(path))
        .collect();
    files.sort();
    files
}

/// Snapshots are independent, so they are read and scanned in parallel.
fn scan_files(engine: &DetectionEngine, files: &[PathBuf]) -> Vec<DetectionReport> {
    files
        .par_iter()
        .map(|path| {
            let target = Target::new(path.display().to_string());
            let page = std::fs::read_to_string(path)
                .map_err(|err| FetchFailure::Io(format!("{}: {err}", path.display())))
                .and_then(|contents| FilePageSource::decode(path, &contents));
            match page {
                Ok(page) => engine.run(Some(&target), &page),
                Err(failure) => engine.failure_report(Some(&target), &failure),
            }
        })
        .collect()
}
