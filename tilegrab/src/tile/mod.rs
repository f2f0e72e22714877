//! Tile planning, probing and fetching.
//!
//! ```text
//!   service URL ──► TileSizeProber ──► tile size
//!                                        │
//!   info.json size ─────────────────► TileGridPlanner ──► Vec<TileSpec>
//!                                                             │
//!                                          TileFetcher ◄──────┘
//!                                              │
//!                                              ▼
//!                                          TileResult
//! ```

mod fetcher;
mod planner;
mod prober;
mod spec;

pub use fetcher::TileFetcher;
pub use planner::TileGridPlanner;
pub use prober::TileSizeProber;
pub use spec::{TileOutcome, TileResult, TileSpec};

#[cfg(test)]
pub(crate) use fetcher::tests::jpeg_tile;
