//! Periodic stepping scheduler.
//!
//! A `Ticker` runs a caller-supplied callback every `delay` on a tokio task.
//! Only one timer is active per ticker; starting again replaces it.
//!
//! ```no_run
//! use std::sync::{Arc, Mutex};
//! use std::time::Duration;
//! use lifegame_core::{LifeGame, Ticker};
//!
//! # async fn run() -> lifegame_core::LifeResult<()> {
//! let game = Arc::new(Mutex::new(LifeGame::new(24, 48)?));
//! let mut ticker = Ticker::new(Duration::from_millis(200))?;
//!
//! let stepping = Arc::clone(&game);
//! ticker.start(move || {
//!     if let Ok(mut game) = stepping.lock() {
//!         game.advance_generation();
//!     }
//! });
//! // ...
//! ticker.stop();
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{LifeError, LifeResult};

struct ActiveTimer {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Invokes a callback at a fixed delay until stopped.
///
/// Each `start` captures the current epoch; `stop` bumps it under the same
/// lock that every invocation holds, so a tick that was already due when
/// `stop` returned finds a stale epoch and is discarded.
///
/// The callback runs while that lock is held: it must not stop its own
/// ticker. Signal the owner instead (for example through a
/// `tokio::sync::Notify`).
pub struct Ticker {
    delay: Duration,
    runtime: Handle,
    epoch: Arc<Mutex<u64>>,
    active: Option<ActiveTimer>,
}

impl Ticker {
    /// Create a stopped ticker on the current tokio runtime.
    pub fn new(delay: Duration) -> LifeResult<Self> {
        let runtime = Handle::try_current().map_err(|_| LifeError::RuntimeUnavailable)?;
        Self::with_handle(delay, runtime)
    }

    /// Create a stopped ticker that spawns its timer on `runtime`.
    pub fn with_handle(delay: Duration, runtime: Handle) -> LifeResult<Self> {
        if delay.is_zero() {
            return Err(LifeError::InvalidDelay { delay });
        }

        Ok(Self {
            delay,
            runtime,
            epoch: Arc::new(Mutex::new(0)),
            active: None,
        })
    }

    /// The fixed delay between invocations.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Check if a timer is active.
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Start invoking `callback` every `delay`, first one delay from now.
    ///
    /// A running timer is stopped first, so two timers never overlap.
    pub fn start<F>(&mut self, mut callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.stop();

        let epoch = *lock(&self.epoch);
        let gate = Arc::clone(&self.epoch);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let delay = self.delay;

        let task = self.runtime.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + delay, delay);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        if !fire(&gate, epoch, &mut callback) {
                            break;
                        }
                    }
                }
            }
        });

        self.active = Some(ActiveTimer { cancel, task });
        debug!(
            delay_ms = self.delay.as_millis() as u64,
            epoch, "ticker_started"
        );
    }

    /// Stop the timer. Does nothing if the ticker is not running.
    pub fn stop(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        *lock(&self.epoch) += 1;
        active.cancel.cancel();
        active.task.abort();

        debug!("ticker_stopped");
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticker")
            .field("delay", &self.delay)
            .field("running", &self.is_running())
            .finish()
    }
}

/// Run one invocation unless the ticker was stopped since `epoch` was taken.
fn fire(gate: &Mutex<u64>, epoch: u64, callback: &mut impl FnMut()) -> bool {
    let current = lock(gate);
    if *current != epoch {
        return false;
    }
    callback();
    true
}

// A panicking callback poisons the gate; the epoch itself is still valid.
fn lock(epoch: &Mutex<u64>) -> MutexGuard<'_, u64> {
    epoch.lock().unwrap_or_else(PoisonError::into_inner)
}
