//! Download command - fetch every image of an archive.

use std::path::PathBuf;
use std::time::Instant;
use tilegrab::batch::{BatchRunner, ImageStatus};

use super::common::{resolve_download_config, DownloadOverrides};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the download command.
pub struct DownloadArgs {
    pub archive_url: String,
    pub output: Option<PathBuf>,
    pub overrides: DownloadOverrides,
    pub verbose: bool,
}

/// Run the download command.
pub fn run(args: DownloadArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.verbose)?;
    runner.log_startup("download");
    let config = runner.config();

    let download_config = resolve_download_config(&args.overrides, config);
    let output_dir = args
        .output
        .unwrap_or_else(|| config.output.directory.clone());

    println!("Downloading archive:");
    println!("  URL: {}", args.archive_url);
    println!("  Output: {}", output_dir.display());
    println!("  Strategy: {}", download_config.strategy());
    println!();

    let client = runner.create_client(download_config.request_timeout())?;
    let batch = BatchRunner::new(client, download_config, output_dir);

    let start = Instant::now();
    let summary = runner.block_on(batch.run(&args.archive_url))?;
    let elapsed = start.elapsed();

    for report in &summary.reports {
        let line = match &report.status {
            ImageStatus::Succeeded { path } => format!("✓ {}", path.display()),
            ImageStatus::AlreadyComplete { path } => format!("= {} (already downloaded)", path.display()),
            ImageStatus::MissingService => "- no image service in manifest".to_string(),
            ImageStatus::Failed { reason } => format!("✗ {}", reason),
        };
        println!("[{:04}] {}: {}", report.sequence_index + 1, report.label, line);
    }

    let stats = &summary.stats;
    println!();
    println!(
        "{} tiles, {:.2} MB in {:.1}s ({} retries)",
        stats.tiles_fetched,
        stats.bytes_downloaded as f64 / 1_048_576.0,
        elapsed.as_secs_f64(),
        stats.retries
    );
    println!("{}", summary);

    if summary.has_failures() {
        return Err(CliError::ImagesFailed {
            failed: summary.failed(),
            total: summary.reports.len(),
        });
    }

    Ok(())
}
