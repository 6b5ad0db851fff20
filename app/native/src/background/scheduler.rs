//! Cancellable scheduled tasks on the tokio timer.
//!
//! A `ScheduledTask` owns the spawned timer task: cancelling or dropping the
//! handle aborts it, so replacing the handle stored in an `Option` is enough
//! to guarantee a single live timer.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::constants::period;

/// Handle to a one-shot or repeating timer task.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Runs `callback` once after `delay`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn once<F>(delay: Duration, callback: F) -> Self
    where F: FnOnce() + Send + 'static {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
        Self { handle }
    }

    /// Runs `callback` every `period`, first after one full period.
    ///
    /// Late ticks are delayed rather than bursted, so a stalled thread never
    /// triggers a run of back-to-back advances.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, or if `period` is zero.
    pub fn repeating<F>(period: Duration, mut callback: F) -> Self
    where F: FnMut() + Send + 'static {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                callback();
            }
        });
        Self { handle }
    }

    /// Cancels the task. Equivalent to dropping the handle.
    pub fn cancel(self) {}
}

impl Drop for ScheduledTask {
    fn drop(&mut self) { self.handle.abort(); }
}

/// Converts a delay in milliseconds to a schedulable period, clamped to
/// `[1 ms, i32::MAX ms]`. Non-finite input clamps to the nearest bound.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to a positive range
pub fn period_from_ms(delay_ms: f64) -> Duration {
    let clamped = if delay_ms.is_nan() {
        period::MIN_MS
    } else {
        delay_ms.clamp(period::MIN_MS, period::MAX_MS)
    };
    Duration::from_micros((clamped * 1000.0).round() as u64)
}
