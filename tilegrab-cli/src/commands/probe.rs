//! Probe command - inspect one image service.

use std::sync::Arc;
use tilegrab::iiif::fetch_image_info;
use tilegrab::iiif::url::normalize_service_url;
use tilegrab::orchestrator::FetchStats;
use tilegrab::tile::{TileGridPlanner, TileSizeProber};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the probe command.
pub struct ProbeArgs {
    pub service_url: String,
    pub size: Option<u32>,
    pub verbose: bool,
}

/// Run the probe command.
pub fn run(args: ProbeArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.verbose)?;
    runner.log_startup("probe");

    let mut download_config = runner.config().to_download_config();
    if let Some(size) = args.size {
        download_config = download_config.with_probe_size(size);
    }

    let service = normalize_service_url(&args.service_url);
    let client = runner.create_client(download_config.request_timeout())?;
    let stats = Arc::new(FetchStats::new());
    let prober = TileSizeProber::with_config(Arc::clone(&client), Arc::clone(&stats), &download_config);

    let (info, tile_size) = runner.block_on(async {
        let info = fetch_image_info(client.as_ref(), &service, download_config.request_timeout())
            .await
            .map_err(CliError::Probe)?;
        let tile_size = prober.probe(&service).await;
        Ok::<_, CliError>((info, tile_size))
    })?;

    let plan = TileGridPlanner::new(&service).plan(info.width, info.height, tile_size);
    let columns = info.width.div_ceil(tile_size);
    let rows = info.height.div_ceil(tile_size);

    println!("Service: {}", service);
    println!("  Full size: {} x {}", info.width, info.height);
    if stats.snapshot().probe_fallbacks > 0 {
        println!("  Tile size: {} (probe failed, using fallback)", tile_size);
    } else {
        println!("  Tile size: {}", tile_size);
    }
    println!("  Grid: {} x {} = {} tiles", columns, rows, plan.len());

    Ok(())
}
