//! Error types returned by the detection pipeline.
//!
//! Every variant is a local validation failure: the current image is
//! abandoned and no partial result is returned.

/// Failure reported by a [`Classifier`](crate::classify::Classifier).
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// Feature vector length differs from what the model expects.
    DimensionMismatch { expected: usize, got: usize },
    /// The model produced a NaN or infinite decision value.
    NonFiniteDecision(f32),
    /// Batch call returned a different number of results than inputs.
    BatchSizeMismatch { expected: usize, got: usize },
    /// Anything else raised by an external model.
    Model(String),
}

impl std::fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DimensionMismatch { expected, got } => {
                write!(f, "feature length mismatch: expected {}, got {}", expected, got)
            }
            Self::NonFiniteDecision(v) => write!(f, "non-finite decision value: {}", v),
            Self::BatchSizeMismatch { expected, got } => {
                write!(f, "batch returned {} results for {} inputs", got, expected)
            }
            Self::Model(msg) => write!(f, "model error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}

#[derive(Debug, Clone, PartialEq)]
pub enum DetectError {
    /// Non-positive step/box size, empty scale plan or a ratio that resolves
    /// to a non-positive resized dimension.
    InvalidConfiguration(String),
    /// The feature extractor rejected its input.
    FeatureExtraction(String),
    ClassifierFailure(ClassifierError),
    /// Zero/negative scale, or an empty or inverted interval.
    CoordinateMapping(String),
    /// Mask offset landed outside the suppression mask.
    SuppressionIndex {
        index_x: i64,
        index_y: i64,
        side: usize,
    },
}

impl std::fmt::Display for DetectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfiguration(msg) => write!(f, "invalid configuration: {}", msg),
            Self::FeatureExtraction(msg) => write!(f, "feature extraction failed: {}", msg),
            Self::ClassifierFailure(err) => write!(f, "classifier failure: {}", err),
            Self::CoordinateMapping(msg) => write!(f, "coordinate mapping error: {}", msg),
            Self::SuppressionIndex {
                index_x,
                index_y,
                side,
            } => write!(
                f,
                "suppression mask index ({}, {}) outside {}x{} mask",
                index_x, index_y, side, side
            ),
        }
    }
}

impl std::error::Error for DetectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ClassifierFailure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ClassifierError> for DetectError {
    fn from(err: ClassifierError) -> Self {
        Self::ClassifierFailure(err)
    }
}

pub type DetectResult<T> = Result<T, DetectError>;
