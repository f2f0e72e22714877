//! Types shared by the fetch coordinator and its callers.

use crate::config::{clamp_max_in_flight, DEFAULT_MAX_IN_FLIGHT};
use crate::iiif::FetchError;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How the tiles of one image are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStrategy {
    /// One request at a time in grid order, stopping at the first failure.
    #[default]
    Sequential,
    /// A bounded pool of workers; every dispatched tile is awaited.
    Concurrent { max_in_flight: usize },
}

impl FetchStrategy {
    /// Concurrent strategy with `max_in_flight` clamped to `[1, MAX_IN_FLIGHT_CAP]`.
    pub fn concurrent(max_in_flight: usize) -> Self {
        FetchStrategy::Concurrent {
            max_in_flight: clamp_max_in_flight(max_in_flight),
        }
    }

    /// User-facing name (`safe` or `fast`).
    pub fn name(&self) -> &'static str {
        match self {
            FetchStrategy::Sequential => "safe",
            FetchStrategy::Concurrent { .. } => "fast",
        }
    }
}

impl fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStrategy::Sequential => write!(f, "safe (sequential)"),
            FetchStrategy::Concurrent { max_in_flight } => {
                write!(f, "fast (concurrent, {} in flight)", max_in_flight)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy '{0}' (expected 'safe' or 'fast')")]
pub struct ParseStrategyError(pub String);

impl FromStr for FetchStrategy {
    type Err = ParseStrategyError;

    /// Parses `safe`/`sequential` or `fast`/`concurrent`. The concurrent
    /// form uses the default pool size.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "safe" | "sequential" => Ok(FetchStrategy::Sequential),
            "fast" | "concurrent" => Ok(FetchStrategy::concurrent(DEFAULT_MAX_IN_FLIGHT)),
            other => Err(ParseStrategyError(other.to_string())),
        }
    }
}

/// Lifecycle of one image's fetch session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Planning,
    Fetching,
    Aggregating,
    Complete,
    Aborted,
}

impl FetchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FetchState::Complete | FetchState::Aborted)
    }
}

/// A planned tile that did not produce a usable bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTile {
    pub x: u32,
    pub y: u32,
    pub url: String,
    pub error: FetchError,
}

impl fmt::Display for FailedTile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile ({}, {}): {}", self.x, self.y, self.error)
    }
}

/// Terminal result of a fetch session.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Every tile succeeded; the assembled image, encoded.
    Complete(Vec<u8>),
    /// At least one tile is missing; nothing may be persisted.
    Aborted { failures: Vec<FailedTile> },
}

/// Everything the coordinator learned about one image.
#[derive(Debug)]
pub struct FetchReport {
    pub state: FetchState,
    pub planned: usize,
    pub pasted: usize,
    pub failed: usize,
    /// URLs in the order they were requested. Only recorded by the
    /// sequential strategy, where the order is deterministic.
    pub requested_urls: Vec<String>,
    pub outcome: FetchOutcome,
}

impl FetchReport {
    pub fn is_complete(&self) -> bool {
        matches!(self.outcome, FetchOutcome::Complete(_))
    }

    /// Short description of why the session aborted.
    pub fn abort_reason(&self) -> Option<String> {
        match &self.outcome {
            FetchOutcome::Complete(_) => None,
            FetchOutcome::Aborted { failures } => Some(match failures.first() {
                Some(first) if failures.len() > 1 => {
                    format!("{} tiles failed, first: {}", failures.len(), first)
                }
                Some(first) => first.to_string(),
                None => format!("{} of {} tiles assembled", self.pasted, self.planned),
            }),
        }
    }
}
