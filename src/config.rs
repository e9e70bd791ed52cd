//! Server configuration, read from environment variables with defaults.
//!
//! `HOST`, `PORT`, `INACTIVITY_TIMEOUT_SECS`, `CLEANUP_INTERVAL_SECS`, `SESSION_KEY`.

use std::time::Duration;

/// Session keys shorter than this are ignored (cookie signing needs 64 bytes).
pub const MIN_SESSION_KEY_LEN: usize = 64;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tournaments not accessed for this long are removed.
    pub inactivity_timeout: Duration,
    pub cleanup_interval: Duration,
    /// Cookie session key; a random one is generated when absent.
    pub session_key: Option<Vec<u8>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            inactivity_timeout: Duration::from_secs(12 * 3600),
            cleanup_interval: Duration::from_secs(30 * 60),
            session_key: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparseable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let host = lookup("HOST").unwrap_or(defaults.host);
        let port = parse_or("PORT", lookup("PORT"), defaults.port);
        let inactivity_timeout = positive_secs(
            "INACTIVITY_TIMEOUT_SECS",
            lookup("INACTIVITY_TIMEOUT_SECS"),
            defaults.inactivity_timeout,
        );
        let cleanup_interval = positive_secs(
            "CLEANUP_INTERVAL_SECS",
            lookup("CLEANUP_INTERVAL_SECS"),
            defaults.cleanup_interval,
        );
        let session_key = lookup("SESSION_KEY").and_then(|k| {
            if k.len() >= MIN_SESSION_KEY_LEN {
                Some(k.into_bytes())
            } else {
                log::warn!(
                    "SESSION_KEY shorter than {} bytes, using a random key",
                    MIN_SESSION_KEY_LEN
                );
                None
            }
        });
        Self {
            host,
            port,
            inactivity_timeout,
            cleanup_interval,
            session_key,
        }
    }
}

fn parse_or<T: std::str::FromStr + Copy>(key: &str, value: Option<String>, default: T) -> T {
    match value {
        None => default,
        Some(v) => v.trim().parse().unwrap_or_else(|_| {
            log::warn!("Invalid value {:?} for {}, using default", v, key);
            default
        }),
    }
}

/// A whole number of seconds; zero counts as invalid (`tokio::time::interval` rejects it).
fn positive_secs(key: &str, value: Option<String>, default: Duration) -> Duration {
    match parse_or(key, value, default.as_secs()) {
        0 => {
            log::warn!("{} must be greater than zero, using default", key);
            default
        }
        secs => Duration::from_secs(secs),
    }
}
