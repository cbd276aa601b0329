//! Application-wide constants

pub const DEFAULT_APP_NAME: &str = "salon-services";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_FILE_PREFIX: &str = "salon";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_DB_MIN_CONNECTIONS: u32 = 1;
pub const DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_REDIS_MAX_CONNECTIONS: u32 = 16;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;
