use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Errors surfaced by the dispatch layer and the accelerated adapters.
///
/// Load failure of the accelerated engine is deliberately absent: a build
/// without FFTW degrades to the default engine instead of erroring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FftError {
    /// The factory rejects a zero thread count up front.
    InvalidThreadCount { requested: usize },

    /// The accelerated engine plans transforms over axes (0, 1) only.
    UnsupportedDimensionality { ndim: usize },

    /// The accelerated engine refused to build or execute a plan.
    PlanFailure { detail: String },
}

impl Display for FftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidThreadCount { requested } => {
                write!(f, "invalid thread count: {requested}")
            }
            Self::UnsupportedDimensionality { ndim } => {
                write!(
                    f,
                    "accelerated transforms are fixed to 2 axes, got {ndim}-dimensional input"
                )
            }
            Self::PlanFailure { detail } => write!(f, "FFT plan failure: {detail}"),
        }
    }
}

impl Error for FftError {}

#[cfg(test)]
mod tests {
    use super::FftError;

    #[test]
    fn messages_name_the_offending_value() {
        let err = FftError::InvalidThreadCount { requested: 0 };
        assert!(err.to_string().contains('0'));

        let err = FftError::UnsupportedDimensionality { ndim: 3 };
        assert!(err.to_string().contains('3'));
    }
}
