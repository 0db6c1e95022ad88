//! Per-card countdown task.

use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// A spawned ticker that calls `on_tick` once per interval until cancelled.
///
/// The first tick fires one full interval after spawning. Dropping the
/// handle cancels the task.
#[derive(Debug)]
pub struct Countdown {
    token: CancellationToken,
}

impl Countdown {
    /// Spawn the ticker on the current runtime.
    ///
    /// `on_tick` returns `false` to stop ticking, e.g. when the receiver
    /// has gone away.
    pub fn spawn<F>(interval: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let token = CancellationToken::new();
        let child = token.clone();

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = child.cancelled() => break,
                    _ = ticker.tick() => {
                        if !on_tick() {
                            break;
                        }
                    }
                }
            }
            trace!("countdown task finished");
        });

        Self { token }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
