// =============================================================================
// Indicator Errors
// =============================================================================
//
// Every failure the indicator core can report. All variants are recoverable:
// the engines either produce a complete result or fail before producing any
// output.

use thiserror::Error;

/// The unified error type for the indicator and regime engines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    /// A window, span or period argument is outside its valid range.
    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// The bar sequence (or a derived input) is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The sequence is shorter than the minimum the requested operation needs.
    #[error("insufficient history: need at least {required} bars, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },
}

impl IndicatorError {
    pub(crate) fn invalid_parameter(name: &'static str, value: f64) -> Self {
        Self::InvalidParameter { name, value }
    }
}

/// Convenience alias used across the library.
pub type Result<T> = std::result::Result<T, IndicatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = IndicatorError::invalid_parameter("window", 0.0);
        assert_eq!(err.to_string(), "invalid parameter `window`: 0");

        let err = IndicatorError::InsufficientHistory {
            required: 210,
            actual: 209,
        };
        assert_eq!(
            err.to_string(),
            "insufficient history: need at least 210 bars, got 209"
        );
    }
}
