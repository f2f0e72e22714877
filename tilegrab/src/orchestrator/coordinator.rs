//! Tile fetch coordination for one image.
//!
//! The coordinator owns the canvas for the duration of a session. Workers
//! never touch it: in the concurrent strategy they send [`TileResult`]s over
//! a channel and the coordinator pastes each success as it arrives, so the
//! canvas has a single mutation point.

use super::session::FetchSession;
use super::types::{FetchOutcome, FetchReport, FetchState, FetchStrategy};
use crate::assembly::{AssemblyError, ImageAssembler, ImageEncoder};
use crate::config::DownloadConfig;
use crate::iiif::AsyncHttpClient;
use crate::tile::{TileFetcher, TileOutcome, TileResult, TileSpec};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Drives the fetching of one image's tile plan to `Complete` or `Aborted`.
///
/// # Example
///
/// ```ignore
/// use tilegrab::orchestrator::{FetchCoordinator, FetchStrategy};
///
/// let coordinator = FetchCoordinator::new(fetcher, FetchStrategy::concurrent(16));
/// let report = coordinator.run(width, height, plan, &JpegEncoder::new()).await?;
/// if let FetchOutcome::Complete(bytes) = report.outcome {
///     gate.commit(&descriptor, &bytes).await?;
/// }
/// ```
pub struct FetchCoordinator<C: AsyncHttpClient> {
    fetcher: TileFetcher<C>,
    strategy: FetchStrategy,
    cancel_on_failure: bool,
}

impl<C: AsyncHttpClient + 'static> FetchCoordinator<C> {
    pub fn new(fetcher: TileFetcher<C>, strategy: FetchStrategy) -> Self {
        Self {
            fetcher,
            strategy,
            cancel_on_failure: false,
        }
    }

    pub fn with_config(fetcher: TileFetcher<C>, config: &DownloadConfig) -> Self {
        Self::new(fetcher, config.strategy()).with_cancel_on_failure(config.cancel_on_failure())
    }

    /// Stop handing out new tiles once one has failed (concurrent only).
    pub fn with_cancel_on_failure(mut self, cancel: bool) -> Self {
        self.cancel_on_failure = cancel;
        self
    }

    pub fn strategy(&self) -> FetchStrategy {
        self.strategy
    }

    /// Fetches every spec in `plan` onto a `width × height` canvas.
    ///
    /// Tile failures end in [`FetchOutcome::Aborted`]; the canvas is then
    /// dropped. An error is returned only when the canvas itself cannot be
    /// built, pasted into or encoded.
    pub async fn run(
        &self,
        width: u32,
        height: u32,
        plan: Vec<TileSpec>,
        encoder: &dyn ImageEncoder,
    ) -> Result<FetchReport, AssemblyError> {
        let mut session = FetchSession::new(&plan);
        let mut assembler = ImageAssembler::new(width, height)?;
        let mut requested_urls = Vec::new();

        debug!(
            width = width,
            height = height,
            tiles = plan.len(),
            strategy = self.strategy.name(),
            "Starting fetch session"
        );
        session.transition(FetchState::Fetching);

        match self.strategy {
            FetchStrategy::Sequential => {
                self.run_sequential(plan, &mut session, &mut assembler, &mut requested_urls)
                    .await?
            }
            FetchStrategy::Concurrent { max_in_flight } => {
                self.run_concurrent(plan, max_in_flight, &mut session, &mut assembler)
                    .await?
            }
        }

        session.transition(FetchState::Aggregating);

        let planned = session.planned();
        let pasted = assembler.tiles_pasted();
        let failed = session.failed();

        let (state, outcome) = if session.is_complete() {
            let bytes = assembler.finalize(encoder)?;
            session.transition(FetchState::Complete);
            (session.state(), FetchOutcome::Complete(bytes))
        } else {
            drop(assembler);
            session.transition(FetchState::Aborted);
            let state = session.state();
            (
                state,
                FetchOutcome::Aborted {
                    failures: session.into_failures(),
                },
            )
        };

        debug!(
            state = ?state,
            planned = planned,
            pasted = pasted,
            failed = failed,
            "Fetch session finished"
        );

        Ok(FetchReport {
            state,
            planned,
            pasted,
            failed,
            requested_urls,
            outcome,
        })
    }

    /// Grid order, one request at a time, stop at the first failure.
    async fn run_sequential(
        &self,
        plan: Vec<TileSpec>,
        session: &mut FetchSession,
        assembler: &mut ImageAssembler,
        requested_urls: &mut Vec<String>,
    ) -> Result<(), AssemblyError> {
        for spec in plan {
            requested_urls.push(spec.url.clone());
            let result = self.fetcher.fetch(spec).await;
            if !accept(result, session, assembler)? {
                break;
            }
        }
        Ok(())
    }

    /// Bounded worker pool pulling from a shared queue.
    async fn run_concurrent(
        &self,
        plan: Vec<TileSpec>,
        max_in_flight: usize,
        session: &mut FetchSession,
        assembler: &mut ImageAssembler,
    ) -> Result<(), AssemblyError> {
        let workers = max_in_flight.max(1).min(plan.len());
        let queue = Arc::new(Mutex::new(VecDeque::from(plan)));
        let cancel = CancellationToken::new();
        let (tx, mut rx) = mpsc::unbounded_channel::<TileResult>();
        let mut pool = JoinSet::new();

        for worker_id in 0..workers {
            let fetcher = self.fetcher.clone();
            let queue = Arc::clone(&queue);
            let cancel = cancel.clone();
            let tx = tx.clone();

            pool.spawn(async move {
                while !cancel.is_cancelled() {
                    let Some(spec) = next_spec(&queue) else {
                        break;
                    };
                    let result = fetcher.fetch(spec).await;
                    if tx.send(result).is_err() {
                        break;
                    }
                }
                debug!(worker = worker_id, "Tile worker finished");
            });
        }
        drop(tx);

        // Drains until every worker has dropped its sender
        while let Some(result) = rx.recv().await {
            if !accept(result, session, assembler)? && self.cancel_on_failure {
                cancel.cancel();
            }
        }

        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Tile worker panicked");
                session.record_lost_worker();
            }
        }

        Ok(())
    }
}

/// Pops the next spec, treating a poisoned queue as empty.
fn next_spec(queue: &Mutex<VecDeque<TileSpec>>) -> Option<TileSpec> {
    queue.lock().ok()?.pop_front()
}

/// Folds one result into the session and canvas. Returns false on failure.
fn accept(
    result: TileResult,
    session: &mut FetchSession,
    assembler: &mut ImageAssembler,
) -> Result<bool, AssemblyError> {
    match result.outcome {
        TileOutcome::Success(bitmap) => {
            if session.record_success(&result.spec) {
                assembler.paste(&bitmap, result.spec.x, result.spec.y)?;
            } else {
                warn!(x = result.spec.x, y = result.spec.y, "Ignoring unexpected tile");
            }
            Ok(true)
        }
        TileOutcome::Failure(error) => {
            warn!(
                x = result.spec.x,
                y = result.spec.y,
                error = %error,
                "Tile failed"
            );
            session.record_failure(&result.spec, error);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::JpegEncoder;
    use crate::iiif::{FetchError, MockHttpClient};
    use crate::orchestrator::FetchStats;
    use crate::tile::{jpeg_tile, TileGridPlanner};
    use std::time::Duration;

    const SERVICE: &str = "http://iiif.test/p1";

    fn coordinator(
        mock: &Arc<MockHttpClient>,
        strategy: FetchStrategy,
    ) -> FetchCoordinator<MockHttpClient> {
        let config = DownloadConfig::new()
            .with_max_attempts(1)
            .with_retry_backoff(Duration::ZERO);
        let fetcher =
            TileFetcher::with_config(Arc::clone(mock), Arc::new(FetchStats::new()), &config);
        FetchCoordinator::new(fetcher, strategy)
    }

    /// Routes every tile of a 30×20 image at tile size 10.
    fn route_grid(mock: &MockHttpClient) -> Vec<TileSpec> {
        let plan = TileGridPlanner::new(SERVICE).plan(30, 20, 10);
        for spec in &plan {
            mock.route(&spec.url, jpeg_tile(spec.width, spec.height, [90, 90, 90]));
        }
        plan
    }

    #[tokio::test]
    async fn test_sequential_complete() {
        let mock = Arc::new(MockHttpClient::new());
        let plan = route_grid(&mock);
        let urls: Vec<_> = plan.iter().map(|s| s.url.clone()).collect();

        let report = coordinator(&mock, FetchStrategy::Sequential)
            .run(30, 20, plan, &JpegEncoder::new())
            .await
            .unwrap();

        assert_eq!(report.state, FetchState::Complete);
        assert!(report.state.is_terminal());
        assert!(report.is_complete());
        assert_eq!(report.pasted, 6);
        assert_eq!(report.requested_urls, urls);
    }

    #[tokio::test]
    async fn test_sequential_stops_at_first_failure() {
        let mock = Arc::new(MockHttpClient::new());
        let plan = route_grid(&mock);
        mock.fail(&plan[2].url, FetchError::Request("reset".into()));
        let urls: Vec<_> = plan.iter().map(|s| s.url.clone()).collect();

        let report = coordinator(&mock, FetchStrategy::Sequential)
            .run(30, 20, plan, &JpegEncoder::new())
            .await
            .unwrap();

        assert_eq!(report.state, FetchState::Aborted);
        assert!(report.state.is_terminal());
        assert_eq!(report.requested_urls, urls[..3].to_vec());
        assert_eq!(mock.requests(), urls[..3].to_vec());
        match report.outcome {
            FetchOutcome::Aborted { failures } => {
                assert_eq!(failures.len(), 1);
                assert_eq!((failures[0].x, failures[0].y), (20, 0));
            }
            FetchOutcome::Complete(_) => panic!("expected abort"),
        }
    }

    #[tokio::test]
    async fn test_concurrent_complete() {
        let mock = Arc::new(MockHttpClient::new());
        let plan = route_grid(&mock);

        let report = coordinator(&mock, FetchStrategy::concurrent(4))
            .run(30, 20, plan, &JpegEncoder::new())
            .await
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.pasted, 6);
        assert!(report.requested_urls.is_empty());
        assert_eq!(mock.requests().len(), 6);
    }

    #[tokio::test]
    async fn test_concurrent_drains_all_tiles_after_failure() {
        let mock = Arc::new(MockHttpClient::new());
        let plan = route_grid(&mock);
        mock.fail(&plan[0].url, FetchError::Request("reset".into()));

        let report = coordinator(&mock, FetchStrategy::concurrent(2))
            .run(30, 20, plan, &JpegEncoder::new())
            .await
            .unwrap();

        assert_eq!(report.state, FetchState::Aborted);
        assert_eq!(report.failed, 1);
        assert_eq!(report.pasted, 5);
        assert_eq!(mock.requests().len(), 6);
    }

    /// Fails one URL immediately and serves everything else after a delay,
    /// so the coordinator observes the failure while later tiles are in flight.
    struct SlowClient {
        inner: MockHttpClient,
        failing_url: String,
    }

    impl AsyncHttpClient for SlowClient {
        async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            if url != self.failing_url {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            self.inner.get(url).await
        }
    }

    #[tokio::test]
    async fn test_cancel_on_failure_stops_new_dispatch() {
        let plan = TileGridPlanner::new(SERVICE).plan(100, 10, 10);
        let inner = MockHttpClient::new();
        inner.fail(&plan[0].url, FetchError::Request("reset".into()));
        for spec in &plan[1..] {
            inner.route(&spec.url, jpeg_tile(spec.width, spec.height, [1, 1, 1]));
        }
        let client = Arc::new(SlowClient {
            inner,
            failing_url: plan[0].url.clone(),
        });

        let config = DownloadConfig::new().with_max_attempts(1);
        let fetcher =
            TileFetcher::with_config(Arc::clone(&client), Arc::new(FetchStats::new()), &config);
        let report = FetchCoordinator::new(fetcher, FetchStrategy::concurrent(1))
            .with_cancel_on_failure(true)
            .run(100, 10, plan, &JpegEncoder::new())
            .await
            .unwrap();

        assert_eq!(report.state, FetchState::Aborted);
        assert_eq!(report.failed, 1);
        assert!(client.inner.requests().len() <= 2);
    }

    #[tokio::test]
    async fn test_wrong_canvas_size_is_assembly_error() {
        let mock = Arc::new(MockHttpClient::new());
        let plan = route_grid(&mock);

        let result = coordinator(&mock, FetchStrategy::Sequential)
            .run(10, 10, plan, &JpegEncoder::new())
            .await;

        assert!(matches!(result, Err(AssemblyError::OutOfBounds { .. })));
    }

    #[test]
    fn test_next_spec_drains_in_order() {
        let plan = TileGridPlanner::new(SERVICE).plan(20, 10, 10);
        let queue = Mutex::new(VecDeque::from(plan.clone()));

        assert_eq!(next_spec(&queue), Some(plan[0].clone()));
        assert_eq!(next_spec(&queue), Some(plan[1].clone()));
        assert_eq!(next_spec(&queue), None);
    }
}
