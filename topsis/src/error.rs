use thiserror::Error;

/// Everything that can go wrong between reading an input table and producing
/// a ranked result. All variants are detected synchronously and carry a
/// message naming the failed check; none are recovered silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unable to access {path}: {reason}")]
    FileAccess { path: String, reason: String },

    #[error("input table must contain a header, at least one data row, and three or more columns")]
    Shape,

    #[error("column {column:?} contains non-numeric value {value:?} in data row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("{reason}")]
    Format { reason: String },

    #[error(
        "number of weights ({weights}), impacts ({impacts}) and criteria columns ({criteria}) must all be equal"
    )]
    CountMismatch {
        weights: usize,
        impacts: usize,
        criteria: usize,
    },

    #[error("weight {token:?} is not a numeric value")]
    Parse { token: String },

    #[error("criteria column {column:?} is all zeros, so vector normalization is undefined")]
    DegenerateColumn { column: String },
}

impl Error {
    pub(crate) fn format(reason: impl Into<String>) -> Self {
        Error::Format {
            reason: reason.into(),
        }
    }
}
