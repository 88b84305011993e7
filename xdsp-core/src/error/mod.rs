use core::{error, fmt};

/// Errors raised whilst running xdsp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A named dimension is absent, or the sample axis cannot provide a sampling step.
    InvalidAxis {
        /// The offending dimension.
        dim: String,
        /// Explaining why the dimension cannot be used.
        reason: String,
    },
    /// Argument passed into a function was invalid.
    InvalidParameter {
        /// The invalid arg
        arg: String,
        /// Explaining why arg is invalid.
        reason: String,
    },
    /// Two arrays could not be brought onto common coordinates.
    Alignment {
        /// Explaining what prevented the alignment.
        reason: String,
    },
    /// Execution was attempted with a violated kernel invariant.
    ExecInvariantViolation {
        /// Why execution could not proceed.
        reason: String,
    },
}

impl Error {
    /// Shorthand for [`Error::InvalidAxis`].
    pub fn invalid_axis(dim: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidAxis {
            dim: dim.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::InvalidParameter`].
    pub fn invalid_parameter(arg: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            arg: arg.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::Alignment`].
    pub fn alignment(reason: impl Into<String>) -> Self {
        Error::Alignment {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidAxis { dim, reason } => {
                write!(f, "Invalid axis `{dim}`: {reason}")
            }
            Error::InvalidParameter { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
            Error::Alignment { reason } => write!(f, "Alignment failed: {reason}"),
            Error::ExecInvariantViolation { reason } => {
                write!(f, "Execution invariant violation: {reason}")
            }
        }
    }
}

impl error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn display_names_the_offending_argument() {
        let err = Error::invalid_parameter("noverlap", "noverlap must be less than nperseg");
        assert_eq!(
            err.to_string(),
            "Invalid argument `noverlap`: noverlap must be less than nperseg"
        );

        let err = Error::invalid_axis("time", "dimension not found");
        assert_eq!(err.to_string(), "Invalid axis `time`: dimension not found");
    }
}
