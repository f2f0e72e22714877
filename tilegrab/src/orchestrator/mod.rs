//! Fetch orchestration for one image.
//!
//! [`FetchCoordinator`] turns a tile plan into either an encoded image or
//! a list of failed tiles, using the sequential or bounded-concurrent
//! [`FetchStrategy`]. [`FetchStats`] accumulates counters across the run.

mod coordinator;
mod session;
mod stats;
mod types;

pub use coordinator::FetchCoordinator;
pub use session::FetchSession;
pub use stats::{FetchStats, FetchStatsSnapshot};
pub use types::{
    FailedTile, FetchOutcome, FetchReport, FetchState, FetchStrategy, ParseStrategyError,
};
