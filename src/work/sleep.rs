use std::time::Duration;

use async_trait::async_trait;

use crate::{
    error::WorkError,
    work::{Work, WorkerId},
};

/// Default work: suspends for `delay × tick`.
///
/// A zero `tick` only yields to the scheduler once.
#[derive(Clone, Copy, Debug)]
pub struct Sleep {
    tick: Duration,
}

impl Sleep {
    /// Creates sleep work with the given duration per delay unit.
    #[must_use]
    pub fn new(tick: Duration) -> Self {
        Self { tick }
    }

    /// Total suspension for a sampled delay.
    pub fn duration(&self, delay: u64) -> Duration {
        let units = u32::try_from(delay).unwrap_or(u32::MAX);
        self.tick.saturating_mul(units)
    }
}

impl Default for Sleep {
    /// One second per delay unit.
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl Work for Sleep {
    fn name(&self) -> &str {
        "sleep"
    }

    async fn perform(&self, _worker: WorkerId, delay: u64) -> Result<(), WorkError> {
        let d = self.duration(delay);
        if d.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(d).await;
        }
        Ok(())
    }
}
