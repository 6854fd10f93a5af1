use std::fmt;

/// Rejected input to the sharpness evaluator.
///
/// Every variant is a call-site programming error: a plane whose declared
/// dimensions are inconsistent with its buffer, or a kernel/threshold that
/// is not a finite number. Nothing here is transient and nothing is retried.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum InvalidInputError {
    /// Width or height is zero
    EmptyPlane { width: usize, height: usize },

    /// Row stride is smaller than the row width
    StrideTooSmall { stride: usize, width: usize },

    /// Buffer does not cover the declared stride/height
    BufferTooShort { len: usize, required: usize },

    /// Kernel weight is NaN or infinite
    NonFiniteWeight { row: usize, col: usize },

    /// Pass threshold is NaN or infinite
    NonFiniteThreshold { value: f32 },
}

impl fmt::Display for InvalidInputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvalidInputError::EmptyPlane { width, height } => {
                write!(f, "Empty plane: {}x{} has no pixels", width, height)
            }
            InvalidInputError::StrideTooSmall { stride, width } => {
                write!(
                    f,
                    "Stride too small: stride {} < row width {}",
                    stride, width
                )
            }
            InvalidInputError::BufferTooShort { len, required } => {
                write!(f, "Buffer too short: got {} bytes, need {}", len, required)
            }
            InvalidInputError::NonFiniteWeight { row, col } => {
                write!(f, "Non-finite kernel weight at ({}, {})", row, col)
            }
            InvalidInputError::NonFiniteThreshold { value } => {
                write!(f, "Non-finite pass threshold: {}", value)
            }
        }
    }
}

impl std::error::Error for InvalidInputError {}
