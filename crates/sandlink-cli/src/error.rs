//! Error types for SandLink CLI.
//!
//! CliError wraps CoreError from the shared library and adds CLI-specific
//! variants.

use sandlink_core::error::CoreError;
use thiserror::Error;

// Re-export core error types so command modules can use them via crate::error
pub use sandlink_core::error::{ConfigError, DeviceError, SchedulerError, StorageError};

/// Exit codes for the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NETWORK_ERROR: i32 = 2;
    pub const DEVICE_ERROR: i32 = 3;
    pub const INVALID_ARGS: i32 = 4;
}

/// Main error type for the CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No preferences directory available (pass --prefs-dir)")]
    NoPrefsDir,

    #[error("{0}")]
    Other(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(e) => match e {
                CoreError::Device(_) => exit_codes::DEVICE_ERROR,
                CoreError::Node(_) => exit_codes::NETWORK_ERROR,
                CoreError::Config(_) => exit_codes::INVALID_ARGS,
                CoreError::Scheduler(_) => exit_codes::GENERAL_ERROR,
                CoreError::Protocol(_) => exit_codes::GENERAL_ERROR,
                CoreError::Storage(_) => exit_codes::GENERAL_ERROR,
                CoreError::Io(_) => exit_codes::GENERAL_ERROR,
                CoreError::Other(_) => exit_codes::GENERAL_ERROR,
            },
            CliError::Io(_) => exit_codes::GENERAL_ERROR,
            CliError::InvalidArgument(_) => exit_codes::INVALID_ARGS,
            CliError::NoPrefsDir => exit_codes::GENERAL_ERROR,
            CliError::Other(_) => exit_codes::GENERAL_ERROR,
        }
    }
}

// Conversions from core error subtypes to CliError
impl From<DeviceError> for CliError {
    fn from(e: DeviceError) -> Self {
        CliError::Core(CoreError::Device(e))
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        CliError::Core(CoreError::Storage(e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Core(CoreError::Config(e))
    }
}

impl From<SchedulerError> for CliError {
    fn from(e: SchedulerError) -> Self {
        CliError::Core(CoreError::Scheduler(e))
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_error_exit_code() {
        let err = CliError::from(DeviceError::NotRunning {
            id: "1".to_string(),
        });
        assert_eq!(err.exit_code(), exit_codes::DEVICE_ERROR);
    }

    #[test]
    fn test_config_error_exit_code() {
        let err = CliError::from(ConfigError::NoInterface);
        assert_eq!(err.exit_code(), exit_codes::INVALID_ARGS);
    }
}
