pub mod schema;

pub use schema::{CleanerConfig, LogConfig, SamplerConfig, SsmConfig};

use ssm_core::{Result, SsmError};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `SsmConfig::default()` if
/// the file doesn't exist so the monitor always has sensible defaults.
///
/// The loaded config is validated before it is returned.
pub fn load(path: impl AsRef<Path>) -> Result<SsmConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(SsmConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| SsmError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let config: SsmConfig =
        toml::from_str(&raw).map_err(|e| SsmError::Config(format!("TOML parse error: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config").join("ssm").join("ssm.toml")
}

/// Return the default metrics log path, honouring `$XDG_STATE_HOME`.
pub fn default_log_path() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", ".local/state").join("ssm").join("metrics.log")
}

fn xdg_dir(var: &str, home_fallback: &str) -> PathBuf {
    std::env::var(var)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(home_fallback)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load(dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg.sampler.interval_ms, 1_000);
        assert_eq!(cfg.sampler.history_capacity, 60);
        assert!(!cfg.log.enabled);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sampler]\nhistory_capacity = 3\n\n[log]\nenabled = true").unwrap();

        let cfg = load(file.path()).unwrap();
        assert_eq!(cfg.sampler.history_capacity, 3);
        assert_eq!(cfg.sampler.interval_ms, 1_000);
        assert!(cfg.log.enabled);
        assert_eq!(cfg.log.interval_secs, 60);
        assert_eq!(cfg.cleaner.pace_ms, 5);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sampler]\nhistory_capacity = 0").unwrap();

        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, SsmError::Config(_)), "{err}");
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sampler\ninterval_ms = ").unwrap();

        assert!(matches!(load(file.path()), Err(SsmError::Config(_))));
    }
}
