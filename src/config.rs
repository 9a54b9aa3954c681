//! Configuration from environment variables.

use std::{path::PathBuf, time::Duration};

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,

    /// `DEBUG=1`. Turns on serving of `static_dir` under `/static`.
    pub debug: bool,

    pub bind_addr: String,

    pub static_dir: PathBuf,

    /// Newline separated, the way the new-post form expects it.
    pub default_relays: String,

    /// How long to wait on each relay connection while publishing.
    pub relay_timeout: Duration,
}

impl Config {
    /// Optional, with defaults:
    /// - `DATABASE_URL` (`sqlite://quill.db?mode=rwc`)
    /// - `DEBUG` (off, `1` turns it on)
    /// - `BIND_ADDR` (`0.0.0.0:8000`)
    /// - `STATIC_DIR` (`static`)
    /// - `DEFAULT_RELAYS`: comma or newline separated (`wss://nostr01.opencult.com`)
    /// - `RELAY_TIMEOUT_SECS` (`10`)
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://quill.db?mode=rwc".to_string());

        let debug = std::env::var("DEBUG").is_ok_and(|v| v.trim() == "1");

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let static_dir = PathBuf::from(
            std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
        );

        let default_relays = std::env::var("DEFAULT_RELAYS")
            .unwrap_or_else(|_| "wss://nostr01.opencult.com".to_string())
            .split([',', '\n'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        let relay_timeout = match std::env::var("RELAY_TIMEOUT_SECS") {
            Ok(secs) => Duration::from_secs(
                secs.trim()
                    .parse()
                    .with_context(|| format!("RELAY_TIMEOUT_SECS is not a number: {secs}"))?,
            ),
            Err(_) => Duration::from_secs(10),
        };

        let debug_enabled = debug;
        tracing::info!(
            bind_addr = %bind_addr,
            debug = debug_enabled,
            static_dir = %static_dir.display(),
            relay_timeout_secs = relay_timeout.as_secs(),
            "configuration loaded"
        );

        Ok(Self {
            database_url,
            debug,
            bind_addr,
            static_dir,
            default_relays,
            relay_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "DATABASE_URL",
        "DEBUG",
        "BIND_ADDR",
        "STATIC_DIR",
        "DEFAULT_RELAYS",
        "RELAY_TIMEOUT_SECS",
    ];

    fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_MUTEX.lock().unwrap();

        let saved: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: serialized by ENV_MUTEX, nothing else in the tests reads these.
        unsafe {
            for k in ENV_KEYS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        // SAFETY: as above.
        unsafe {
            for (k, v) in &saved {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn defaults() {
        with_env_vars(&[], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.database_url, "sqlite://quill.db?mode=rwc");
            assert!(!config.debug);
            assert_eq!(config.bind_addr, "0.0.0.0:8000");
            assert_eq!(config.static_dir, PathBuf::from("static"));
            assert_eq!(config.default_relays, "wss://nostr01.opencult.com");
            assert_eq!(config.relay_timeout, Duration::from_secs(10));
        });
    }

    #[test]
    fn custom_values() {
        with_env_vars(
            &[
                ("DATABASE_URL", "sqlite::memory:"),
                ("DEBUG", "1"),
                ("BIND_ADDR", "127.0.0.1:9000"),
                ("STATIC_DIR", "/srv/static"),
                ("RELAY_TIMEOUT_SECS", "3"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.database_url, "sqlite::memory:");
                assert!(config.debug);
                assert_eq!(config.bind_addr, "127.0.0.1:9000");
                assert_eq!(config.static_dir, PathBuf::from("/srv/static"));
                assert_eq!(config.relay_timeout, Duration::from_secs(3));
            },
        );
    }

    #[test]
    fn debug_only_for_one() {
        with_env_vars(&[("DEBUG", "true")], || {
            assert!(!Config::from_env().unwrap().debug);
        });
    }

    #[test]
    fn default_relays_become_lines() {
        with_env_vars(
            &[("DEFAULT_RELAYS", "wss://a.test, wss://b.test,\nwss://c.test")],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.default_relays, "wss://a.test\nwss://b.test\nwss://c.test");
            },
        );
    }

    #[test]
    fn bad_timeout_is_an_error() {
        with_env_vars(&[("RELAY_TIMEOUT_SECS", "soon")], || {
            assert!(Config::from_env().is_err());
        });
    }
}
