//! Error type shared by the climate library

use thiserror::Error;

/// Errors raised while configuring or feeding the climate system.
///
/// The simulation itself cannot fail once constructed; everything here is
/// either a bad configuration or a failure on the loading/export surfaces.
#[derive(Debug, Error)]
pub enum ClimateError {
    /// At least one dimension leaves no interior cells to simulate
    #[error("grid {width}x{height} has no interior cells (both dimensions must exceed 2)")]
    GridTooSmall { width: usize, height: usize },

    /// Buffer length does not match the declared dimensions
    #[error("heightmap has {actual} cells, expected {expected}")]
    HeightmapSizeMismatch { expected: usize, actual: usize },

    /// Parameter set failed validation
    #[error("invalid climate parameters: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse parameter file: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl ClimateError {
    /// True for errors caused by the caller's configuration rather than I/O
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::GridTooSmall { .. } | Self::HeightmapSizeMismatch { .. } | Self::InvalidParams(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ClimateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(ClimateError::GridTooSmall { width: 2, height: 10 }.is_configuration());
        assert!(ClimateError::HeightmapSizeMismatch { expected: 9, actual: 8 }.is_configuration());
        assert!(ClimateError::InvalidParams("years".into()).is_configuration());

        let io = ClimateError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        assert!(!io.is_configuration());
    }

    #[test]
    fn test_messages_name_the_dimensions() {
        let err = ClimateError::GridTooSmall { width: 2, height: 7 };
        assert!(err.to_string().contains("2x7"));
    }
}
