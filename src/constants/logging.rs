//! Logging configuration constants

/// Default log level when not specified
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log mode when `LOG_MODE` is not set
pub const DEFAULT_LOG_MODE: &str = "stdout";

/// Default base path of the log file in `file` mode
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/relayer.log";
