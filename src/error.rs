use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrgError {
    #[error("Invalid range: upper bound {upper} must be strictly greater than lower bound {lower}")]
    InvalidRange { lower: String, upper: String },
    #[error("Oversized block: {given} bytes given, at most {max} can be absorbed at once")]
    OversizedBlock { given: usize, max: usize },
    #[error("Failed to parse")]
    HexParseError(#[from] hex::FromHexError),
    #[error("Invalid generator description: {0}")]
    DescriptionError(String),
}

impl PrgError {
    pub(crate) fn invalid_range<T: std::fmt::Display>(lower: &T, upper: &T) -> Self {
        PrgError::InvalidRange {
            lower: lower.to_string(),
            upper: upper.to_string(),
        }
    }
}

impl From<std::num::ParseIntError> for PrgError {
    fn from(e: std::num::ParseIntError) -> Self {
        PrgError::DescriptionError(e.to_string())
    }
}
