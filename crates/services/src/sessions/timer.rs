use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use mcq_core::model::{Phase, Tick};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::controller::TestSessionController;

/// Controller handle shared between a host and its tick task.
pub type SharedController = Arc<Mutex<TestSessionController>>;

/// Periodic tick source for a shared controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimer {
    period: Duration,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::every_second()
    }
}

impl SessionTimer {
    #[must_use]
    pub fn every_second() -> Self {
        Self {
            period: Duration::from_secs(1),
        }
    }

    #[must_use]
    pub fn with_period(period: Duration) -> Self {
        Self { period }
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Spawn the tick task on the current tokio runtime.
    ///
    /// The task ends when the session finishes (by expiry or by `finish`) and is
    /// aborted when the returned guard is dropped.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use = "dropping the guard stops the timer immediately"]
    pub fn start(&self, controller: SharedController) -> TimerGuard {
        let period = self.period;
        let phase_rx = lock(&controller).subscribe_phase();
        tracing::debug!(?period, "session timer started");
        let handle = tokio::spawn(run(controller, period, phase_rx));
        TimerGuard { handle }
    }
}

async fn run(
    controller: SharedController,
    period: Duration,
    mut phase_rx: tokio::sync::watch::Receiver<Phase>,
) {
    if *phase_rx.borrow_and_update() == Phase::Finished {
        return;
    }

    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let tick = lock(&controller).tick();
                if !matches!(tick, Tick::Counting { .. }) {
                    break;
                }
            }
            changed = phase_rx.changed() => {
                if changed.is_err() || *phase_rx.borrow() == Phase::Finished {
                    break;
                }
            }
        }
    }

    tracing::debug!("session timer stopped");
}

fn lock(controller: &SharedController) -> MutexGuard<'_, TestSessionController> {
    controller.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("session controller lock poisoned");
        poisoned.into_inner()
    })
}

/// Scoped ownership of a running timer; aborts the tick task on drop.
#[derive(Debug)]
pub struct TimerGuard {
    handle: JoinHandle<()>,
}

impl TimerGuard {
    /// Whether the tick task is still alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stop ticking now.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
