use anyhow::Context;
use duck_merge::engine::driver::{BatchMergeDriver, MergeRunSummary};
use duck_merge::logging;
use duck_merge::shared::config::load_settings;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info, warn};

fn write_report(path: &Path, summary: &MergeRunSummary) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json).with_context(|| format!("writing report to {}", path.display()))?;
    info!(target: "duck_merge::main", path = %path.display(), "Wrote run report");
    Ok(())
}

fn run() -> anyhow::Result<ExitCode> {
    let settings = load_settings()?;
    logging::init(&settings.logging)?;
    let config = settings.merge_config()?;

    info!(
        target: "duck_merge::main",
        label = %config.label,
        existing = %config.existing_dir.display(),
        incoming = %config.incoming_dir.display(),
        iterations = config.iterations,
        max_files = ?config.file_cap(),
        strategy = ?config.strategy,
        workers = config.workers,
        "Starting batch merge"
    );

    let summary = match BatchMergeDriver::new(config).run() {
        Ok(summary) => summary,
        Err(e) => {
            error!(target: "duck_merge::main", phase = %e.phase, "{}", e);
            return Ok(ExitCode::from(1));
        }
    };

    info!(
        target: "duck_merge::main",
        succeeded = summary.files_succeeded(),
        failed = summary.files_failed(),
        rows = summary.rows_surviving(),
        keys = summary.key_cardinality,
        start_mb = summary.start.used_mb,
        end_mb = summary.end.used_mb,
        output = %summary.output_dir.display(),
        "Batch merge finished"
    );

    if let Some(path) = &settings.merge.report_path {
        write_report(path, &summary)?;
    }

    if settings.merge.strict && summary.files_failed() > 0 {
        warn!(target: "duck_merge::main", failed = summary.files_failed(), "Files failed in strict mode");
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("duck_merge: {:#}", e);
            ExitCode::from(1)
        }
    }
}
