//! Error types for SandLink core.

use thiserror::Error;

/// Core error type for shared operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Node error: {0}")]
    Node(#[from] NodeError),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Device lifecycle errors
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Device {id} is already running")]
    AlreadyRunning { id: String },

    #[error("Device {id} is not running")]
    NotRunning { id: String },
}

/// Protocol node errors
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("Failed to bind node socket on {ip}: {source}")]
    Bind {
        ip: String,
        source: std::io::Error,
    },

    #[error("Failed to send advertisement to {target}: {source}")]
    Send {
        target: String,
        source: std::io::Error,
    },
}

/// Timer scheduling errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("No async runtime available for timer registration")]
    NoRuntime,

    #[error("Timer registration failed: {0}")]
    RegistrationFailed(String),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid IP preference '{0}': expected an IPv4 address")]
    InvalidIp(String),

    #[error("Invalid advertisement target '{0}': expected ip:port")]
    InvalidTarget(String),

    #[error("No usable network interface found")]
    NoInterface,
}

/// Wire protocol errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Packet too short: {len} bytes, expected {expected}")]
    TooShort { len: usize, expected: usize },

    #[error("Unexpected opcode: 0x{0:04x}")]
    UnexpectedOpcode(u16),

    #[error("Unsupported protocol version: {0}")]
    UnsupportedVersion(u8),
}

/// Preferences storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
