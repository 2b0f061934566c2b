use serde::{Deserialize, Serialize};
use ssm_core::{Result, SsmError};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure parsed from `ssm.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SsmConfig {
    /// Sampling cadence and history size.
    pub sampler: SamplerConfig,
    /// Optional append-only metrics log.
    pub log: LogConfig,
    /// Junk cleanup targets.
    pub cleaner: CleanerConfig,
}

impl SsmConfig {
    /// Reject values that would stall the sampler or make the log spin.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            (self.sampler.interval_ms == 0, "sampler.interval_ms must be > 0"),
            (self.sampler.history_capacity == 0, "sampler.history_capacity must be > 0"),
            (self.sampler.read_timeout_ms == 0, "sampler.read_timeout_ms must be > 0"),
            (self.log.interval_secs == 0, "log.interval_secs must be > 0"),
            (self.log.max_bytes == 0, "log.max_bytes must be > 0"),
        ];
        match checks.iter().find(|(bad, _)| *bad) {
            Some((_, msg)) => Err(SsmError::Config((*msg).to_string())),
            None => Ok(()),
        }
    }
}

/// Sampler loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Tick period in milliseconds.
    pub interval_ms: u64,
    /// Number of samples kept in the rolling history window.
    pub history_capacity: usize,
    /// Upper bound on a single counter read; expiry skips the tick.
    pub read_timeout_ms: u64,
}

impl SamplerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_ms:      1_000,
            history_capacity: 60,
            read_timeout_ms:  900,
        }
    }
}

/// Metrics log settings.  Disabled unless turned on explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub enabled: bool,
    /// Log file location.
    pub path: PathBuf,
    /// Minimum spacing between two written lines.
    pub interval_secs: u64,
    /// The file is rotated to `<path>.1` before it would grow past this.
    pub max_bytes: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled:       false,
            path:          crate::default_log_path(),
            interval_secs: 60,
            max_bytes:     1 << 20,
        }
    }
}

/// Junk cleanup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Directories whose contents are considered junk.  Empty = the OS
    /// temp directory.
    pub paths: Vec<PathBuf>,
    /// Pause between deletions, in milliseconds (0 = none).
    pub pace_ms: u64,
}

impl CleanerConfig {
    /// The configured roots, or the OS temp directory when none are set.
    pub fn roots(&self) -> Vec<PathBuf> {
        if self.paths.is_empty() {
            vec![std::env::temp_dir()]
        } else {
            self.paths.clone()
        }
    }

    pub fn pace(&self) -> Duration {
        Duration::from_millis(self.pace_ms)
    }
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            paths:   Vec::new(),
            pace_ms: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SsmConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut cfg = SsmConfig::default();
        cfg.sampler.interval_ms = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_cleaner_paths_fall_back_to_temp_dir() {
        let cfg = CleanerConfig::default();
        assert_eq!(cfg.roots(), vec![std::env::temp_dir()]);
    }
}
