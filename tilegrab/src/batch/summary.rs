//! Per-image reports and the end-of-run summary.

use crate::orchestrator::FetchStatsSnapshot;
use std::fmt;
use std::path::PathBuf;

/// What happened to one manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageStatus {
    /// Downloaded, assembled and saved during this run.
    Succeeded { path: PathBuf },
    /// A complete output already existed; no network work was done.
    AlreadyComplete { path: PathBuf },
    /// The manifest entry had no image-service reference.
    MissingService,
    /// Info lookup, fetching, assembly or saving failed.
    Failed { reason: String },
}

impl ImageStatus {
    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            ImageStatus::AlreadyComplete { .. } | ImageStatus::MissingService
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReport {
    pub sequence_index: usize,
    pub label: String,
    pub status: ImageStatus,
}

/// Outcome of one batch run, in manifest order.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub archive_id: String,
    pub reports: Vec<ImageReport>,
    pub stats: FetchStatsSnapshot,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.count(|s| matches!(s, ImageStatus::Succeeded { .. }))
    }

    /// Already-complete plus missing-service entries.
    pub fn skipped(&self) -> usize {
        self.count(ImageStatus::is_skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, ImageStatus::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ImageReport> {
        self.reports
            .iter()
            .filter(|r| matches!(r.status, ImageStatus::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&ImageStatus) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.status)).count()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} succeeded, {} skipped, {} failed.",
            self.succeeded(),
            self.skipped(),
            self.failed()
        )
    }
}
