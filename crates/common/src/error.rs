use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A market must contain at least one currency.
    #[error("Exchange graph must contain at least one currency.")]
    EmptyGraph,

    /// The number of names, matrix rows or the declared currency count disagree.
    #[error("Dimension mismatch: expected {expected} currencies, found {actual}.")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A row of the rate matrix has the wrong number of columns.
    #[error("Rate matrix row {row} has {actual} columns, expected {expected}.")]
    NonSquareRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A rate is zero, negative, NaN or infinite.
    #[error("Rate at ({row}, {col}) must be finite and strictly positive, got {rate}.")]
    InvalidRate { row: usize, col: usize, rate: f64 },

    /// Self-conversion must be neutral (rate 1).
    #[error("Self-conversion rate for currency {index} must be 1, got {rate}.")]
    NonNeutralDiagonal { index: usize, rate: f64 },

    #[error("Duplicate currency identifier: {0}.")]
    DuplicateCurrency(String),

    /// The certification epsilon must be strictly looser than the relaxation epsilon.
    #[error("Invalid tolerance: relax epsilon {relax} must be below detect epsilon {detect}.")]
    InvalidTolerance { relax: f64, detect: f64 },

    #[error("Currency not found: {0}.")]
    NotFound(String),

    /// Failed to trace the full cycle path, usually due to broken predecessor chains.
    #[error("Cycle path reconstruction failed due to broken predecessor chain.")]
    CycleReconstructionFailed,

    /// The successor chain loops, which only happens when the market holds an arbitrage cycle.
    #[error("No finite conversion path from {from} to {to}: successor chain loops.")]
    PathNotRecoverable { from: String, to: String },
}

impl Error {
    /// True for errors raised while validating graph or tolerance input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::EmptyGraph
                | Error::DimensionMismatch { .. }
                | Error::NonSquareRow { .. }
                | Error::InvalidRate { .. }
                | Error::NonNeutralDiagonal { .. }
                | Error::DuplicateCurrency(_)
                | Error::InvalidTolerance { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_classified() {
        assert!(Error::EmptyGraph.is_validation());
        assert!(Error::DuplicateCurrency("USD".into()).is_validation());
        assert!(
            Error::InvalidRate {
                row: 0,
                col: 1,
                rate: -1.0
            }
            .is_validation()
        );
        assert!(!Error::NotFound("XYZ".into()).is_validation());
        assert!(!Error::CycleReconstructionFailed.is_validation());
    }

    #[test]
    fn display_names_the_offending_input() {
        let err = Error::NonSquareRow {
            row: 2,
            expected: 3,
            actual: 4,
        };
        assert_eq!(
            err.to_string(),
            "Rate matrix row 2 has 4 columns, expected 3."
        );
        assert_eq!(
            Error::NotFound("XYZ".into()).to_string(),
            "Currency not found: XYZ."
        );
    }

    #[test]
    fn looping_path_error_has_no_underlying_cause() {
        let err = Error::PathNotRecoverable {
            from: "USD".into(),
            to: "AUD".into(),
        };
        assert_eq!(
            err.to_string(),
            "No finite conversion path from USD to AUD: successor chain loops."
        );
        assert!(std::error::Error::source(&err).is_none());
        assert!(!err.is_validation());
    }
}
