use core::fmt;

/// Validation errors raised at kernel construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A configuration argument value is invalid.
    InvalidArgument {
        /// Name of the argument.
        arg: &'static str,
        /// Human readable reason.
        reason: &'static str,
    },
    /// The requested segment is longer than the samples available on the axis.
    SegmentTooLong {
        /// Requested samples per segment.
        nperseg: usize,
        /// Samples available along the analysis axis.
        available: usize,
    },
    /// A caller supplied window does not match the segment length.
    WindowLengthMismatch {
        /// Required length.
        expected: usize,
        /// Received length.
        got: usize,
    },
}

impl ConfigError {
    /// Name of the configuration argument at fault.
    pub fn arg(&self) -> &'static str {
        match self {
            ConfigError::InvalidArgument { arg, .. } => arg,
            ConfigError::SegmentTooLong { .. } => "nperseg",
            ConfigError::WindowLengthMismatch { .. } => "window",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidArgument { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
            ConfigError::SegmentTooLong { nperseg, available } => write!(
                f,
                "nperseg ({nperseg}) is greater than the {available} samples on the analysis axis."
            ),
            ConfigError::WindowLengthMismatch { expected, got } => write!(
                f,
                "Window must have one coefficient per segment sample. Expected {expected}, got {got}."
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for xdsp_core::Error {
    fn from(value: ConfigError) -> Self {
        let reason = match &value {
            ConfigError::InvalidArgument { reason, .. } => (*reason).into(),
            other => other.to_string(),
        };
        xdsp_core::Error::InvalidParameter {
            arg: value.arg().into(),
            reason,
        }
    }
}

/// Runtime execution invariant violations for checked kernel entrypoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecInvariantViolation {
    /// An execution precondition was violated.
    InvalidState {
        /// Human readable reason.
        reason: &'static str,
    },
    /// Output length mismatched the expected runtime shape.
    LengthMismatch {
        /// Name of the argument.
        arg: &'static str,
        /// Required length.
        expected: usize,
        /// Received length.
        got: usize,
    },
    /// Paired inputs of a cross computation disagree in shape.
    ShapeMismatch {
        /// Shape of the first input.
        x: Vec<usize>,
        /// Shape of the second input.
        y: Vec<usize>,
    },
    /// Adapter binding/configuration failure.
    Config(ConfigError),
}

impl From<ConfigError> for ExecInvariantViolation {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl fmt::Display for ExecInvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecInvariantViolation::InvalidState { reason } => {
                write!(f, "Execution invariant violation: {reason}")
            }
            ExecInvariantViolation::LengthMismatch { arg, expected, got } => {
                write!(
                    f,
                    "Execution length mismatch on `{arg}`. Expected {expected}, got {got}."
                )
            }
            ExecInvariantViolation::ShapeMismatch { x, y } => {
                write!(f, "Input shapes differ: {x:?} vs {y:?}.")
            }
            ExecInvariantViolation::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ExecInvariantViolation {}

impl From<ExecInvariantViolation> for xdsp_core::Error {
    fn from(value: ExecInvariantViolation) -> Self {
        match value {
            ExecInvariantViolation::Config(err) => err.into(),
            other => xdsp_core::Error::ExecInvariantViolation {
                reason: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ExecInvariantViolation};

    #[test]
    fn config_errors_surface_as_invalid_parameters() {
        let err: xdsp_core::Error = ConfigError::SegmentTooLong {
            nperseg: 512,
            available: 100,
        }
        .into();
        match err {
            xdsp_core::Error::InvalidParameter { arg, reason } => {
                assert_eq!(arg, "nperseg");
                assert!(reason.contains("512"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn wrapped_config_errors_keep_their_kind() {
        let exec = ExecInvariantViolation::from(ConfigError::InvalidArgument {
            arg: "fs",
            reason: "fs must be finite and > 0",
        });
        let err: xdsp_core::Error = exec.into();
        assert_eq!(
            err,
            xdsp_core::Error::InvalidParameter {
                arg: "fs".into(),
                reason: "fs must be finite and > 0".into(),
            }
        );

        let err: xdsp_core::Error = ExecInvariantViolation::ShapeMismatch {
            x: vec![2, 8],
            y: vec![2, 9],
        }
        .into();
        assert!(matches!(
            err,
            xdsp_core::Error::ExecInvariantViolation { .. }
        ));
    }
}
