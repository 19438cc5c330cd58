//! Restartable background switching task.
//!
//! A [`SwitchCycle`] runs at most one recurring task. Starting a new one
//! cancels the previous instance first; every instance has its own
//! [`CancellationToken`], which is also handed to each tick so the owner can
//! recognise a tick that was superseded while it waited for a lock.
//!
//! | State | `is_running()` | Left by |
//! |-------|----------------|---------|
//! | Stopped | `false` | `start` |
//! | Running | `true` | `stop`, `start` (replaced), tick error |

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{Error, Result};

// ============================================================================
// Types
// ============================================================================

/// Bookkeeping shared between the handle and its spawned tasks.
#[derive(Debug, Default)]
struct CycleState {
    /// Incremented on every start.
    generation: u64,
    /// The live instance, if any.
    running: Option<Running>,
}

#[derive(Debug)]
struct Running {
    generation: u64,
    token: CancellationToken,
}

// ============================================================================
// SwitchCycle
// ============================================================================

/// A cancellable recurring task with restart semantics.
///
/// Dropping the cycle cancels the running instance.
#[derive(Debug, Default)]
pub struct SwitchCycle {
    state: Arc<Mutex<CycleState>>,
}

impl SwitchCycle {
    /// Creates a stopped cycle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new instance, replacing any running one.
    ///
    /// `on_tick` runs once immediately and then once per `period`. A tick is
    /// never interrupted; cancellation takes effect between ticks. If a tick
    /// fails, the instance ends and `on_error` receives the error, provided
    /// the instance has not been replaced in the meantime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `period` is zero.
    pub fn start<T, Fut, E>(&self, period: Duration, mut on_tick: T, on_error: E) -> Result<()>
    where
        T: FnMut(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
        E: FnOnce(Error) + Send + 'static,
    {
        if period.is_zero() {
            return Err(Error::config("switch interval must be greater than zero"));
        }

        let mut state = self.state.lock();
        if let Some(old) = state.running.take() {
            debug!(generation = old.generation, "Replacing switch cycle");
            old.token.cancel();
        }

        state.generation += 1;
        let generation = state.generation;
        let token = CancellationToken::new();
        state.running = Some(Running {
            generation,
            token: token.clone(),
        });

        let shared = Arc::clone(&self.state);

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => {
                        debug!(generation, "Switch cycle stopped");
                        return;
                    }
                    _ = ticker.tick() => {}
                }

                if let Err(e) = on_tick(token.clone()).await {
                    let is_current = {
                        let mut state = shared.lock();
                        let is_current = state
                            .running
                            .as_ref()
                            .is_some_and(|running| running.generation == generation);
                        if is_current {
                            state.running = None;
                        }
                        is_current
                    };

                    if is_current {
                        on_error(e);
                    } else {
                        warn!(generation, error = %e, "Superseded switch cycle failed");
                    }
                    return;
                }
            }
        });

        debug!(generation, period_ms = period.as_millis() as u64, "Switch cycle started");
        Ok(())
    }

    /// Stops the running instance.
    ///
    /// Returns `true` if an instance was running. Does not wait for a tick
    /// in progress.
    pub fn stop(&self) -> bool {
        let running = self.state.lock().running.take();
        match running {
            Some(running) => {
                running.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Returns `true` while an instance is running.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.lock().running.is_some()
    }
}

impl Drop for SwitchCycle {
    fn drop(&mut self) {
        self.stop();
    }
}

// ============================================================================
// Tests
// ============================================================================
