use std::fmt;

/// Result type for MADDPG operations
pub type Result<T> = std::result::Result<T, MaddpgError>;

/// Main error type for the crate
#[derive(Debug, Clone)]
pub enum MaddpgError {
    /// Invalid dimensions for operations
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),

    /// Numerical computation errors
    NumericalError(String),

    /// Empty buffer or batch
    EmptyBuffer(String),

    /// Agent index outside the joint layout
    UnknownAgent {
        index: usize,
        num_agents: usize,
    },
}

impl fmt::Display for MaddpgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaddpgError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, actual)
            }
            MaddpgError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            MaddpgError::IoError(msg) => write!(f, "IO error: {}", msg),
            MaddpgError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            MaddpgError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            MaddpgError::EmptyBuffer(msg) => write!(f, "Empty buffer: {}", msg),
            MaddpgError::UnknownAgent { index, num_agents } => {
                write!(f, "Unknown agent {}: layout has {} agents", index, num_agents)
            }
        }
    }
}

impl std::error::Error for MaddpgError {}

impl From<std::io::Error> for MaddpgError {
    fn from(err: std::io::Error) -> Self {
        MaddpgError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for MaddpgError {
    fn from(err: bincode::Error) -> Self {
        MaddpgError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for MaddpgError {
    fn from(err: serde_json::Error) -> Self {
        MaddpgError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for MaddpgError {
    fn from(err: ndarray::ShapeError) -> Self {
        MaddpgError::DimensionMismatch {
            expected: "compatible array shapes".to_string(),
            actual: err.to_string(),
        }
    }
}

// Helper functions for common error patterns
impl MaddpgError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        MaddpgError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        MaddpgError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Fail with `DimensionMismatch` unless `actual == expected`.
    pub(crate) fn check_width(what: &str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(MaddpgError::dimension_mismatch(
                format!("{} of width {}", what, expected),
                format!("width {}", actual),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_dimension_mismatch() {
        let err = MaddpgError::dimension_mismatch("5", "4");
        assert_eq!(err.to_string(), "Dimension mismatch: expected 5, got 4");
    }

    #[test]
    fn test_check_width() {
        assert!(MaddpgError::check_width("observation", 3, 3).is_ok());
        let err = MaddpgError::check_width("observation", 3, 2).unwrap_err();
        assert!(matches!(err, MaddpgError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: MaddpgError = io.into();
        assert!(matches!(err, MaddpgError::IoError(_)));
    }
}
