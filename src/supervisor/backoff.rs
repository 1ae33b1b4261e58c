use std::time::Duration;

use crate::constants::{
    STAGE_RESTART_BACKOFF_MULTIPLIER, STAGE_RESTART_INITIAL_BACKOFF_MS,
    STAGE_RESTART_MAX_BACKOFF_SECS,
};

/// Delay between consecutive restarts of a stage.
#[derive(Clone, Debug)]
pub struct RestartBackoff {
    pub initial_backoff: Duration,
    pub multiplier: f64,
    pub max_backoff: Duration,
}

impl Default for RestartBackoff {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_millis(STAGE_RESTART_INITIAL_BACKOFF_MS),
            multiplier: STAGE_RESTART_BACKOFF_MULTIPLIER,
            max_backoff: Duration::from_secs(STAGE_RESTART_MAX_BACKOFF_SECS),
        }
    }
}

impl RestartBackoff {
    pub fn backoff_duration(&self, attempt: usize) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let backoff = self.initial_backoff.as_millis() as f64 * self.multiplier.powi(exponent);
        Duration::from_millis(backoff.min(self.max_backoff.as_millis() as f64) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backoff_doubles_until_cap() {
        let backoff = RestartBackoff::default();
        assert_eq!(backoff.backoff_duration(0), Duration::from_secs(1));
        assert_eq!(backoff.backoff_duration(1), Duration::from_secs(2));
        assert_eq!(backoff.backoff_duration(4), Duration::from_secs(16));
        assert_eq!(backoff.backoff_duration(5), Duration::from_secs(30));
        assert_eq!(backoff.backoff_duration(500), Duration::from_secs(30));
    }

    #[test]
    fn test_custom_backoff() {
        let backoff = RestartBackoff {
            initial_backoff: Duration::from_millis(10),
            multiplier: 3.0,
            max_backoff: Duration::from_millis(100),
        };
        assert_eq!(backoff.backoff_duration(0), Duration::from_millis(10));
        assert_eq!(backoff.backoff_duration(2), Duration::from_millis(90));
        assert_eq!(backoff.backoff_duration(3), Duration::from_millis(100));
    }
}
