//! duidui-server/src/config.rs
//!
//! Runtime configuration: built-in defaults, then environment (including a
//! `.env` file), then command-line flags.

use std::path::PathBuf;

use chrono::Duration;
use duidui_core::Error;
use duidui_core::auth::state_store::DEFAULT_STATE_TTL_SECS;

use crate::Args;

pub const ENV_DATA_DIR: &str = "DUIDUI_DATA_DIR";
pub const ENV_LOG: &str = "DUIDUI_LOG";
pub const ENV_STATE_TTL_SECS: &str = "DUIDUI_STATE_TTL_SECS";
pub const ENV_RUST_LOG: &str = "RUST_LOG";

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_LOG_FILTER: &str = "duidui_core=info,duidui_server=info";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    pub log_filter: String,
    pub state_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            state_ttl: Duration::seconds(DEFAULT_STATE_TTL_SECS),
        }
    }
}

impl ServerConfig {
    /// Loads `.env` (if present), reads the process environment and applies
    /// the flags in `args` on top.
    pub fn load(args: &Args) -> Result<Self, Error> {
        dotenv::dotenv().ok();
        Ok(Self::from_lookup(|key| std::env::var(key).ok())?.with_args(args))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        let filter = lookup(ENV_LOG)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| lookup(ENV_RUST_LOG).filter(|v| !v.trim().is_empty()));
        if let Some(filter) = filter {
            config.log_filter = filter;
        }
        if let Some(raw) = lookup(ENV_STATE_TTL_SECS) {
            config.state_ttl = parse_ttl(&raw)?;
        }
        Ok(config)
    }

    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(dir) = &args.data_dir {
            self.data_dir = dir.clone();
        }
        if let Some(filter) = &args.log {
            self.log_filter = filter.clone();
        }
        if let Some(secs) = args.state_ttl_secs {
            self.state_ttl = Duration::seconds(i64::from(secs));
        }
        self
    }
}

fn parse_ttl(raw: &str) -> Result<Duration, Error> {
    let secs: u32 = raw
        .trim()
        .parse()
        .map_err(|_| Error::Validation(format!("{ENV_STATE_TTL_SECS} must be a whole number of seconds, got '{raw}'")))?;
    if secs == 0 {
        return Err(Error::Validation(format!("{ENV_STATE_TTL_SECS} must be positive")));
    }
    Ok(Duration::seconds(i64::from(secs)))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use clap::Parser;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = ServerConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.state_ttl, Duration::minutes(10));
    }

    #[test]
    fn test_env_overrides_defaults() {
        let config = ServerConfig::from_lookup(env(&[
            (ENV_DATA_DIR, "/var/lib/duidui"),
            (ENV_LOG, "debug"),
            (ENV_STATE_TTL_SECS, "30"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/duidui"));
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.state_ttl, Duration::seconds(30));
    }

    #[test]
    fn test_rust_log_is_a_fallback_for_the_filter() {
        let config = ServerConfig::from_lookup(env(&[(ENV_RUST_LOG, "trace")])).unwrap();
        assert_eq!(config.log_filter, "trace");

        let config =
            ServerConfig::from_lookup(env(&[(ENV_RUST_LOG, "trace"), (ENV_LOG, "warn")])).unwrap();
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_bad_ttl_is_rejected() {
        for raw in ["abc", "0", "-5"] {
            let err = ServerConfig::from_lookup(env(&[(ENV_STATE_TTL_SECS, raw)])).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{raw}");
        }
    }

    #[test]
    fn test_flags_override_env() {
        let args = Args::parse_from([
            "duidui",
            "--data-dir",
            "/tmp/flag-dir",
            "--state-ttl-secs",
            "5",
            "tier",
            "list",
        ]);
        let config = ServerConfig::from_lookup(env(&[(ENV_DATA_DIR, "/from/env"), (ENV_LOG, "warn")]))
            .unwrap()
            .with_args(&args);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/flag-dir"));
        assert_eq!(config.log_filter, "warn");
        assert_eq!(config.state_ttl, Duration::seconds(5));
    }
}
