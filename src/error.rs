//! Error types.
//!
//! Library code returns [`InitError`]; the binary boundary converts it into an
//! [`AppError`] carrying the process exit code.

/// Failures of the seed-vector computation and its configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InitError {
    /// The wavelet identifier is not in the coefficient table.
    #[error("unknown wavelet '{0}' (expected db2 .. db25)")]
    UnknownWavelet(String),

    /// The coefficient sequence cannot define an interior system.
    #[error("invalid filter of length {len}: {reason}")]
    InvalidFilter { len: usize, reason: String },

    /// The solver did not produce an acceptable constrained minimizer.
    #[error("{method} solver failed: {reason}")]
    Convergence { method: String, reason: String },

    /// A configuration value is out of range or unparseable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read or parsed.
    #[error("config file '{path}': {reason}")]
    ConfigFile { path: String, reason: String },
}

impl InitError {
    pub(crate) fn invalid_filter(len: usize, reason: impl Into<String>) -> Self {
        Self::InvalidFilter {
            len,
            reason: reason.into(),
        }
    }

    pub(crate) fn convergence(method: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        Self::Convergence {
            method: method.to_string(),
            reason: reason.into(),
        }
    }

    /// Exit code used when this error terminates the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::UnknownWavelet(_) | Self::InvalidConfig(_) | Self::ConfigFile { .. } => 2,
            Self::InvalidFilter { .. } => 3,
            Self::Convergence { .. } => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<InitError> for AppError {
    fn from(err: InitError) -> Self {
        Self::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
