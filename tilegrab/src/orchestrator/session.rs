//! Per-image fetch session bookkeeping.

use super::types::{FailedTile, FetchState};
use crate::iiif::FetchError;
use crate::tile::TileSpec;
use std::collections::{HashMap, HashSet};
use tracing::{trace, warn};

/// The plan for one image and the running set of results.
///
/// A session is complete only when every planned spec has exactly one
/// matching success and nothing failed. Results for specs that are not
/// part of the plan, or repeated successes for the same spec, are ignored.
#[derive(Debug)]
pub struct FetchSession {
    plan: HashMap<(u32, u32), TileSpec>,
    planned: usize,
    succeeded: HashSet<(u32, u32)>,
    failures: Vec<FailedTile>,
    lost_workers: usize,
    state: FetchState,
}

impl FetchSession {
    pub fn new(plan: &[TileSpec]) -> Self {
        Self {
            plan: plan.iter().map(|s| (s.origin(), s.clone())).collect(),
            planned: plan.len(),
            succeeded: HashSet::with_capacity(plan.len()),
            failures: Vec::new(),
            lost_workers: 0,
            state: FetchState::Planning,
        }
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    /// Moves to `next`. A session that reached `Complete` or `Aborted`
    /// stays there.
    pub(crate) fn transition(&mut self, next: FetchState) {
        if self.state.is_terminal() {
            warn!(state = ?self.state, to = ?next, "Ignoring transition out of terminal state");
            return;
        }
        trace!(from = ?self.state, to = ?next, "Fetch session transition");
        self.state = next;
    }

    /// Records a success. Returns false if the spec was not planned or
    /// already succeeded.
    pub fn record_success(&mut self, spec: &TileSpec) -> bool {
        match self.plan.get(&spec.origin()) {
            Some(planned) if planned == spec => self.succeeded.insert(spec.origin()),
            _ => false,
        }
    }

    pub fn record_failure(&mut self, spec: &TileSpec, error: FetchError) {
        self.failures.push(FailedTile {
            x: spec.x,
            y: spec.y,
            url: spec.url.clone(),
            error,
        });
    }

    /// A worker ended without reporting the tile it held.
    pub fn record_lost_worker(&mut self) {
        self.lost_workers += 1;
    }

    pub fn planned(&self) -> usize {
        self.planned
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len() + self.lost_workers
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
            && self.lost_workers == 0
            && self.succeeded.len() == self.plan.len()
            && self.plan.len() == self.planned
    }

    pub fn into_failures(self) -> Vec<FailedTile> {
        self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileGridPlanner;

    fn plan() -> Vec<TileSpec> {
        TileGridPlanner::new("http://iiif.test/p1").plan(20, 10, 10)
    }

    #[test]
    fn test_new_session_is_planning() {
        let session = FetchSession::new(&plan());
        assert_eq!(session.state(), FetchState::Planning);
        assert_eq!(session.planned(), 2);
        assert!(!session.is_complete());
    }

    #[test]
    fn test_complete_when_every_spec_succeeds() {
        let plan = plan();
        let mut session = FetchSession::new(&plan);

        assert!(session.record_success(&plan[1]));
        assert!(session.record_success(&plan[0]));
        assert!(session.is_complete());
    }

    #[test]
    fn test_duplicate_success_does_not_count_twice() {
        let plan = plan();
        let mut session = FetchSession::new(&plan);

        assert!(session.record_success(&plan[0]));
        assert!(!session.record_success(&plan[0]));
        assert_eq!(session.succeeded(), 1);
        assert!(!session.is_complete());
    }

    #[test]
    fn test_unplanned_spec_rejected() {
        let plan = plan();
        let mut session = FetchSession::new(&plan);

        let mut stray = plan[0].clone();
        stray.width = 5;
        assert!(!session.record_success(&stray));
    }

    #[test]
    fn test_any_failure_prevents_completion() {
        let plan = plan();
        let mut session = FetchSession::new(&plan);

        session.record_success(&plan[0]);
        session.record_success(&plan[1]);
        session.record_failure(&plan[1], FetchError::Request("late".into()));

        assert!(!session.is_complete());
        assert_eq!(session.failed(), 1);
    }

    #[test]
    fn test_lost_worker_prevents_completion() {
        let plan = plan();
        let mut session = FetchSession::new(&plan);

        session.record_success(&plan[0]);
        session.record_lost_worker();

        assert!(!session.is_complete());
        assert_eq!(session.failed(), 1);
    }

    #[test]
    fn test_terminal_state_is_final() {
        let mut session = FetchSession::new(&plan());
        session.transition(FetchState::Fetching);
        session.transition(FetchState::Aborted);
        assert!(session.state().is_terminal());

        session.transition(FetchState::Fetching);
        assert_eq!(session.state(), FetchState::Aborted);
    }

    #[test]
    fn test_empty_plan_is_trivially_complete() {
        let session = FetchSession::new(&[]);
        assert!(session.is_complete());
    }
}
