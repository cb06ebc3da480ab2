//! Deduplicates concurrent refresh attempts.
//!
//! When an access credential expires every in-flight request sees a 401 at
//! about the same time. Refresh credentials are single-use, so letting each of
//! those requests call `/refresh` would make all but the first fail and log
//! the user out. The coordinator lets exactly one caller (the leader) run the
//! refresh; everyone who asks while it is running waits for the leader's
//! outcome.
//!
//! Each settled refresh bumps an epoch. A caller passes the epoch it observed
//! before sending its request; if a refresh has settled since then, the
//! caller gets that outcome instead of starting another refresh. This covers
//! 401s that arrive just after a refresh finished.
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// New credentials were set; the original request can be replayed.
    Refreshed,
    /// The server refused the refresh credential. The session is over.
    Rejected,
    /// The refresh could not be completed (network, timeout, server error).
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Epoch(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled {
    pub outcome: RefreshOutcome,
    pub epoch: Epoch,
}

#[derive(Default)]
struct State {
    refreshing: bool,
    waiters: Vec<oneshot::Sender<Settled>>,
    epoch: u64,
    last: Option<RefreshOutcome>,
}

enum Role {
    Lead,
    Wait(oneshot::Receiver<Settled>),
    Done(Settled),
}

pub struct RefreshCoordinator {
    state: Arc<Mutex<State>>,
    timeout: Duration,
}

impl RefreshCoordinator {
    pub fn new(timeout: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            timeout,
        }
    }

    /// Epoch of the most recently settled refresh.
    pub fn epoch(&self) -> Epoch {
        Epoch(self.state.lock().epoch)
    }

    pub fn is_refreshing(&self) -> bool {
        self.state.lock().refreshing
    }

    /// Number of callers currently parked behind the leader.
    pub fn waiting(&self) -> usize {
        self.state.lock().waiters.len()
    }

    /// Obtain a refresh outcome for a caller that saw a 401 on a request sent
    /// at `observed`. `perform` runs only if this caller becomes the leader.
    pub async fn refresh<F, Fut>(&self, observed: Epoch, perform: F) -> Settled
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome>,
    {
        let role = {
            let mut state = self.state.lock();
            let settled_since = state.last.clone().filter(|_| state.epoch > observed.0);
            match settled_since {
                Some(outcome) => Role::Done(Settled {
                    outcome,
                    epoch: Epoch(state.epoch),
                }),
                None if state.refreshing => {
                    let (tx, rx) = oneshot::channel();
                    state.waiters.push(tx);
                    Role::Wait(rx)
                }
                None => {
                    // flag goes up before the refresh is dispatched
                    state.refreshing = true;
                    Role::Lead
                }
            }
        };

        match role {
            Role::Done(settled) => settled,
            Role::Wait(rx) => match rx.await {
                Ok(settled) => settled,
                // senders are only dropped unsent if the state itself is gone
                Err(_) => Settled {
                    outcome: RefreshOutcome::Failed("refresh abandoned".into()),
                    epoch: self.epoch(),
                },
            },
            Role::Lead => {
                let mut guard = LeaderGuard {
                    state: &self.state,
                    armed: true,
                };
                let outcome = match tokio::time::timeout(self.timeout, perform()).await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        tracing::warn!(timeout = ?self.timeout, "refresh timed out");
                        RefreshOutcome::Failed("refresh timed out".into())
                    }
                };
                guard.armed = false;
                settle(&self.state, outcome)
            }
        }
    }
}

// Settles the queue if the leading future is dropped before it finishes, so
// waiters never hang on a cancelled leader.
struct LeaderGuard<'a> {
    state: &'a Mutex<State>,
    armed: bool,
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            settle(self.state, RefreshOutcome::Failed("refresh cancelled".into()));
        }
    }
}

fn settle(state: &Mutex<State>, outcome: RefreshOutcome) -> Settled {
    let (settled, waiters) = {
        let mut state = state.lock();
        state.epoch += 1;
        state.last = Some(outcome.clone());
        state.refreshing = false;
        let settled = Settled {
            outcome,
            epoch: Epoch(state.epoch),
        };
        (settled, std::mem::take(&mut state.waiters))
    };

    tracing::debug!(waiters = waiters.len(), outcome = ?settled.outcome, "refresh settled");
    for waiter in waiters {
        // a waiter whose caller went away is fine to skip
        let _ = waiter.send(settled.clone());
    }
    settled
}
