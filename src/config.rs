//! Host configuration read from the environment.

use std::env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::engine::EngineConfig;

pub const DEFAULT_SAVE_PATH: &str = "blocktris-save.json";
pub const DEFAULT_FRAME_MS: u64 = 33;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// JSON file backing the key-value store
    pub save_path: PathBuf,
    /// Log file; logging stays off when unset
    pub log_path: Option<PathBuf>,
    pub seed: u32,
    /// Input poll / redraw interval
    pub frame_ms: u64,
}

impl HostConfig {
    /// Create from `BLOCKTRIS_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| {
            var(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let save_path = non_empty("BLOCKTRIS_SAVE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_PATH));
        let log_path = non_empty("BLOCKTRIS_LOG_PATH").map(PathBuf::from);
        let seed = non_empty("BLOCKTRIS_SEED")
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(clock_seed);
        let frame_ms = non_empty("BLOCKTRIS_FRAME_MS")
            .and_then(|s| s.parse().ok())
            .filter(|&ms| ms > 0)
            .unwrap_or(DEFAULT_FRAME_MS);

        Self {
            save_path,
            log_path,
            seed,
            frame_ms,
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default().with_seed(self.seed)
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(12345)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HostConfig::from_lookup(|_| None);
        assert_eq!(config.save_path, PathBuf::from(DEFAULT_SAVE_PATH));
        assert_eq!(config.log_path, None);
        assert_eq!(config.frame_ms, DEFAULT_FRAME_MS);
    }

    #[test]
    fn test_overrides() {
        let config = HostConfig::from_lookup(|name| match name {
            "BLOCKTRIS_SAVE_PATH" => Some("/tmp/slots.json".to_string()),
            "BLOCKTRIS_LOG_PATH" => Some("  ".to_string()),
            "BLOCKTRIS_SEED" => Some("42".to_string()),
            "BLOCKTRIS_FRAME_MS" => Some("0".to_string()),
            _ => None,
        });
        assert_eq!(config.save_path, PathBuf::from("/tmp/slots.json"));
        assert_eq!(config.log_path, None);
        assert_eq!(config.seed, 42);
        assert_eq!(config.frame_ms, DEFAULT_FRAME_MS);
        assert_eq!(config.engine_config().seed, 42);
    }

    #[test]
    fn test_from_env_does_not_panic() {
        let _config = HostConfig::from_env();
    }
}
