//! Error types for marga.
//!
//! Only call-contract violations are errors. Noisy or incomplete telemetry is
//! absorbed by the pipeline and never surfaces here.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, SynthError>;

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(String),

    /// YAML could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// A value is outside its allowed range
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Synthesis errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SynthError {
    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Samples are not in non-decreasing timestamp order
    #[error("Sample {index} at {timestamp_ms} ms precedes previous sample at {previous_ms} ms")]
    UnorderedSamples {
        /// Index of the offending sample
        index: usize,
        /// Timestamp of the sample before it
        previous_ms: u64,
        /// Timestamp of the offending sample
        timestamp_ms: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = SynthError::UnorderedSamples {
            index: 3,
            previous_ms: 200,
            timestamp_ms: 150,
        };
        assert_eq!(
            err.to_string(),
            "Sample 3 at 150 ms precedes previous sample at 200 ms"
        );

        let err: SynthError = ConfigError::invalid("arc.ratio_min", "must be positive").into();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: Invalid value for arc.ratio_min: must be positive"
        );
    }
}
