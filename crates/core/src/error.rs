use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum SsmError {
    #[error("config error: {0}")]
    Config(String),

    /// A counter or sensor read failed. Inside the sampler this only ever
    /// skips a tick.
    #[error("sensor error: {0}")]
    Sensor(String),

    #[error("cleanup error: {0}")]
    Cleanup(String),

    #[error("power control error: {0}")]
    Power(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = SsmError> = std::result::Result<T, E>;
