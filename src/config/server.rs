//! HTTP server configuration constants.

/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 10000;

/// Interface used when `BIND_HOST` is not set.
pub const DEFAULT_BIND_HOST: &str = "127.0.0.1";

/// Origins allowed by CORS when `ALLOWED_ORIGINS` is not set.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://localhost:5173"];

/// A game with no connected client for this long is dropped.
pub const SESSION_IDLE_TIMEOUT_SECS: u64 = 30 * 60;

/// How often a game checks whether it has gone idle.
pub const SESSION_IDLE_CHECK_SECS: u64 = 60;
