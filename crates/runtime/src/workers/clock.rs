use tokio::time::Instant;

use battle_core::Timestamp;

/// Maps the runtime's monotonic clock onto session timestamps, with zero at
/// session creation.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SessionClock {
    origin: Instant,
}

impl SessionClock {
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now(&self) -> Timestamp {
        let millis = self.origin.elapsed().as_millis();
        Timestamp::from_millis(u64::try_from(millis).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn timestamps_follow_tokio_time() {
        let clock = SessionClock::start();
        assert_eq!(clock.now(), Timestamp::ZERO);

        tokio::time::advance(Duration::from_millis(1_500)).await;
        assert_eq!(clock.now(), Timestamp::from_millis(1_500));
    }
}
