//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Unset or unparsable values fall back
//! to the defaults of [`ServerConfig::default`].

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

/// Default bind address, matching the port the study flows point at.
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Text,
    /// Newline-delimited JSON records.
    Json,
}

impl LogFormat {
    /// Parses a `LOG_FORMAT` value. Unknown values select [`LogFormat::Text`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Top-level server configuration.
///
/// Loaded once at startup via [`ServerConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8000`).
    pub listen_addr: SocketAddr,

    /// Deadline for a single outbound WebSocket send. A recipient that
    /// cannot accept a frame within this window is treated as failed.
    pub ws_send_timeout: Duration,

    /// Idle receive timeout for WebSocket connections. `None` keeps
    /// silent connections open indefinitely.
    pub ws_idle_timeout: Option<Duration>,

    /// Deadline for HTTP request handlers.
    pub request_timeout: Duration,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            ws_send_timeout: Duration::from_millis(5_000),
            ws_idle_timeout: None,
            request_timeout: Duration::from_secs(30),
            log_format: LogFormat::Text,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let raw_addr =
            std::env::var("LISTEN_ADDR").unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr: SocketAddr = raw_addr
            .parse()
            .with_context(|| format!("invalid LISTEN_ADDR: {raw_addr}"))?;

        let ws_send_timeout = Duration::from_millis(parse_env("WS_SEND_TIMEOUT_MS", 5_000));
        let ws_idle_timeout = idle_timeout(parse_env("WS_IDLE_TIMEOUT_SECS", 0));
        let request_timeout = Duration::from_secs(parse_env("HTTP_REQUEST_TIMEOUT_SECS", 30));
        let log_format = std::env::var("LOG_FORMAT")
            .map(|v| LogFormat::parse(&v))
            .unwrap_or_default();

        Ok(Self {
            listen_addr,
            ws_send_timeout,
            ws_idle_timeout,
            request_timeout,
            log_format,
        })
    }
}

/// Maps a number of seconds to an optional timeout; `0` disables it.
fn idle_timeout(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_values() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_addr.port(), 8000);
        assert_eq!(config.ws_send_timeout, Duration::from_secs(5));
        assert!(config.ws_idle_timeout.is_none());
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn parse_env_falls_back_on_missing_key() {
        let value: u64 = parse_env("STUDY_GATEWAY_TEST_SURELY_UNSET", 42);
        assert_eq!(value, 42);
    }

    #[test]
    fn zero_idle_timeout_disables_it() {
        assert!(idle_timeout(0).is_none());
        assert_eq!(idle_timeout(15), Some(Duration::from_secs(15)));
    }

    #[test]
    fn log_format_is_case_insensitive() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Text);
    }
}
