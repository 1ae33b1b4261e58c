/// Number of actix workers serving the status endpoints.
pub const STATUS_SERVER_WORKERS: usize = 1;

/// Time the status server waits for in-flight requests when shutting down.
pub const STATUS_SERVER_SHUTDOWN_TIMEOUT_SECONDS: u64 = 5;
