// Restart backoff for supervised pipeline stages
pub const STAGE_RESTART_INITIAL_BACKOFF_MS: u64 = 1_000;
pub const STAGE_RESTART_BACKOFF_MULTIPLIER: f64 = 2.0;
pub const STAGE_RESTART_MAX_BACKOFF_SECS: u64 = 30;
