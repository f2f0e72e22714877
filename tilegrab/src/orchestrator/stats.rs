//! Run-wide fetch statistics.
//!
//! Counters are shared by `Arc` between every fetcher, the prober and the
//! batch runner, and updated from concurrent workers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Instant;

/// Thread-safe run-wide fetch statistics.
///
/// # Example
///
/// ```
/// use tilegrab::orchestrator::FetchStats;
///
/// let stats = FetchStats::new();
/// stats.record_tile_success(1024);
/// stats.record_tile_failure();
/// stats.record_retry();
///
/// let snapshot = stats.snapshot();
/// assert_eq!(snapshot.tiles_fetched, 1);
/// assert_eq!(snapshot.bytes_downloaded, 1024);
/// ```
pub struct FetchStats {
    bytes_downloaded: AtomicU64,
    tiles_fetched: AtomicU64,
    tiles_failed: AtomicU64,
    retries: AtomicU64,
    probe_fallbacks: AtomicU64,
    activity: RwLock<ActivityWindow>,
}

/// First and last moment a tile body arrived.
///
/// Throughput is computed over this window so that time spent on manifests
/// and disk writes before the first tile is not counted.
struct ActivityWindow {
    first: Option<Instant>,
    last: Option<Instant>,
}

impl ActivityWindow {
    fn record(&mut self, now: Instant) {
        self.first.get_or_insert(now);
        self.last = Some(now);
    }

    fn elapsed_secs(&self) -> f64 {
        match (self.first, self.last) {
            (Some(first), Some(last)) => last.duration_since(first).as_secs_f64(),
            _ => 0.0,
        }
    }
}

/// Snapshot of fetch statistics at a point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchStatsSnapshot {
    /// Total tile bytes downloaded
    pub bytes_downloaded: u64,
    /// Tiles fetched, decoded and dimension-checked
    pub tiles_fetched: u64,
    /// Tiles that exhausted their attempts
    pub tiles_failed: u64,
    /// Retry attempts across all tiles
    pub retries: u64,
    /// Services whose tile size fell back to the default
    pub probe_fallbacks: u64,
    /// Seconds between the first and last successful tile
    pub active_time_secs: f64,
    /// Bytes per second over the active window
    pub avg_bytes_per_sec: f64,
}

impl FetchStats {
    pub fn new() -> Self {
        Self {
            bytes_downloaded: AtomicU64::new(0),
            tiles_fetched: AtomicU64::new(0),
            tiles_failed: AtomicU64::new(0),
            retries: AtomicU64::new(0),
            probe_fallbacks: AtomicU64::new(0),
            activity: RwLock::new(ActivityWindow {
                first: None,
                last: None,
            }),
        }
    }

    /// Record a successfully fetched tile of `bytes` encoded bytes.
    pub fn record_tile_success(&self, bytes: usize) {
        self.bytes_downloaded
            .fetch_add(bytes as u64, Ordering::Relaxed);
        self.tiles_fetched.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut activity) = self.activity.write() {
            activity.record(Instant::now());
        }
    }

    pub fn record_tile_failure(&self) {
        self.tiles_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_probe_fallback(&self) {
        self.probe_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> FetchStatsSnapshot {
        let bytes_downloaded = self.bytes_downloaded.load(Ordering::Relaxed);
        let active_time_secs = self
            .activity
            .read()
            .map(|a| a.elapsed_secs())
            .unwrap_or(0.0);

        let avg_bytes_per_sec = if active_time_secs > 0.0 {
            bytes_downloaded as f64 / active_time_secs
        } else {
            0.0
        };

        FetchStatsSnapshot {
            bytes_downloaded,
            tiles_fetched: self.tiles_fetched.load(Ordering::Relaxed),
            tiles_failed: self.tiles_failed.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            probe_fallbacks: self.probe_fallbacks.load(Ordering::Relaxed),
            active_time_secs,
            avg_bytes_per_sec,
        }
    }
}

impl Default for FetchStats {
    fn default() -> Self {
        Self::new()
    }
}
