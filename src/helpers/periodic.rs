use crate::prelude::*;

/// Fires at most once per interval.
pub struct Periodic {
    interval: StdDuration,
    last_triggered_at: Instant,
}

impl Periodic {
    #[must_use]
    pub fn new(interval: StdDuration) -> Self {
        Self {
            interval,
            last_triggered_at: Instant::now(),
        }
    }

    /// Returns the time passed since the previous trigger, if the interval is over.
    #[must_use]
    pub fn poll(&mut self) -> Option<StdDuration> {
        let now = Instant::now();
        let elapsed = now - self.last_triggered_at;
        (elapsed > self.interval).then(|| {
            self.last_triggered_at = now;
            elapsed
        })
    }
}
