use thiserror::Error;

/// Library errors using thiserror for structured error handling.
///
/// None of these are fatal to a running session: capture failures degrade
/// input to the pointer fallback, malformed frames read as "no hand", and
/// rejected transitions are logged and ignored.

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("Landmark source disconnected")]
    Disconnected,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("Expected {expected} landmarks, got {actual}")]
    WrongJointCount { expected: usize, actual: usize },

    #[error("Landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },

    #[error("Landmark {index} is outside the normalized frame: ({x}, {y})")]
    OutOfRange { index: usize, x: f64, y: f64 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine the platform config directory")]
    NoConfigDir,
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Failed to load score history from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save score history to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Could not determine the platform config directory")]
    NoConfigDir,
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;
