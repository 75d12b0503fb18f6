use std::time::Duration;

/// Fixed delay applied between successive search queries.
///
/// The delay is a deliberate throttle against provider rate limits, not a
/// performance knob; fetch loops sleep between queries, never after the
/// last one. Tests inject [`Pacing::none`] to run at full speed.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    delay: Duration,
}

impl Pacing {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// Zero delay, for tests and offline replays.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Sleep for the configured inter-query delay.
    pub async fn pause(self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
