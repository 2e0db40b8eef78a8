//! Configuration Module
//!
//! Cache tuning parameters and server settings, loadable from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default TTL applied when a caller does not supply one (5 minutes).
pub const DEFAULT_TTL_MS: u64 = 300_000;

/// Age after which an unsettled in-flight registration is reclaimed (30 seconds).
pub const DEFAULT_STALE_THRESHOLD_MS: u64 = 30_000;

/// Period of the background sweep (1 minute).
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 60_000;

/// Cache behaviour parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL used by `set` and `resolve` when no per-call TTL is given
    pub default_ttl: Duration,
    /// In-flight registrations older than this are reclaimed by the sweep
    pub stale_threshold: Duration,
    /// Interval between background sweeps
    pub sweep_interval: Duration,
    /// Whether waiters attached to a reclaimed registration are failed
    /// (`true`) or left awaiting the original producer (`false`)
    pub fail_abandoned_waiters: bool,
}

impl CacheConfig {
    /// Loads cache parameters from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `CACHE_STALE_THRESHOLD_MS` - Stale in-flight threshold in milliseconds (default: 30000)
    /// - `CACHE_SWEEP_INTERVAL_MS` - Sweep period in milliseconds (default: 60000)
    /// - `CACHE_FAIL_ABANDONED_WAITERS` - `true`/`false` (default: true)
    pub fn from_env() -> Self {
        Self {
            default_ttl: Duration::from_millis(env_or("CACHE_DEFAULT_TTL_MS", DEFAULT_TTL_MS)),
            stale_threshold: Duration::from_millis(env_or(
                "CACHE_STALE_THRESHOLD_MS",
                DEFAULT_STALE_THRESHOLD_MS,
            )),
            sweep_interval: Duration::from_millis(env_or(
                "CACHE_SWEEP_INTERVAL_MS",
                DEFAULT_SWEEP_INTERVAL_MS,
            )),
            fail_abandoned_waiters: env_or("CACHE_FAIL_ABANDONED_WAITERS", true),
        }
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn with_stale_threshold(mut self, threshold: Duration) -> Self {
        self.stale_threshold = threshold;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn with_fail_abandoned_waiters(mut self, fail: bool) -> Self {
        self.fail_abandoned_waiters = fail;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_millis(DEFAULT_TTL_MS),
            stale_threshold: Duration::from_millis(DEFAULT_STALE_THRESHOLD_MS),
            sweep_interval: Duration::from_millis(DEFAULT_SWEEP_INTERVAL_MS),
            fail_abandoned_waiters: true,
        }
    }
}

/// Admin server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP server port
    pub server_port: u16,
    /// Parameters of the hosted cache
    pub cache: CacheConfig,
}

impl ServerConfig {
    /// Loads the server port from `SERVER_PORT` (default: 3000) and the
    /// cache parameters via [`CacheConfig::from_env`].
    pub fn from_env() -> Self {
        Self {
            server_port: env_or("SERVER_PORT", 3000),
            cache: CacheConfig::from_env(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache: CacheConfig::default(),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
