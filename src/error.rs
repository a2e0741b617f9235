//! Error types for focuser operations.

use thiserror::Error;

/// Primary error type for focuser operations.
#[derive(Error, Debug)]
pub enum FocusError {
    // Device errors
    #[error("Error opening FLI device: {reason}")]
    DeviceOpenFailed { device: String, reason: String },

    #[error("Error {operation}: {reason}")]
    Vendor {
        /// What the tool was doing, e.g. "querying FLI stepper position".
        operation: String,
        /// Raw return code from the vendor library (negative errno).
        code: i64,
        reason: String,
    },

    #[error("Hardware backend unavailable: built without libfli support")]
    BackendUnavailable,

    #[error("Focuser not attached")]
    NotAttached,

    // Motion errors
    #[error("Need to specify focuser position between {min} and {max}.")]
    PositionOutOfRange { target: i64, min: i64, max: i64 },

    #[error("Attempted motion to position {target} is out of range ({min},{max}).")]
    StepOutOfRange { target: i64, min: i64, max: i64 },

    #[error("Motion did not finish within {timeout_secs}s ({remaining} steps remaining)")]
    MotionTimeout { timeout_secs: u64, remaining: i64 },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl FocusError {
    /// Build a vendor error from a libfli return code.
    ///
    /// libfli reports failures as negated errno values.
    pub fn vendor(operation: impl Into<String>, code: i64) -> Self {
        let errno = i32::try_from(code.unsigned_abs()).unwrap_or(i32::MAX);
        let reason = std::io::Error::from_raw_os_error(errno).to_string();
        Self::Vendor {
            operation: operation.into(),
            code,
            reason,
        }
    }

    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::BackendUnavailable
                | Self::NotAttached
                | Self::PositionOutOfRange { .. }
                | Self::StepOutOfRange { .. }
                | Self::ConfigNotFound { .. }
                | Self::ConfigInvalid(_)
        )
    }

    /// Returns true if retrying the connection may help.
    pub const fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::DeviceOpenFailed { .. } | Self::NotAttached
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::DeviceOpenFailed { .. } => {
                Some("Check the focuser is connected and the fliusb kernel module is loaded")
            }
            Self::NotAttached => Some("Ensure the focuser is connected via USB"),
            Self::BackendUnavailable => {
                Some("Rebuild with --features libfli, or pass --simulate")
            }
            Self::PositionOutOfRange { .. } | Self::StepOutOfRange { .. } => {
                Some("Run: flifocus status to see the valid range")
            }
            Self::MotionTimeout { .. } => Some("Increase motion.timeout_secs in the config"),
            Self::ConfigNotFound { .. } => Some("Run: flifocus config --path"),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using FocusError.
pub type Result<T> = std::result::Result<T, FocusError>;
