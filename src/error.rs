//! Error type shared by the raster types and the blur engine.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::raster::ChannelKind;

/// Errors that can occur while preparing or blurring a raster.
///
/// Out-of-range areas and oversized radii are not errors: they are clipped
/// and clamped. What remains are allocation failures and rasters whose
/// layout the engine cannot address.
#[derive(Debug, Clone, Error)]
pub enum BlurError {
    #[error("Failed to allocate {what} of {elements} elements: {source}")]
    Allocation {
        what: &'static str,
        elements: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("Size of {what} overflows: {width}x{height}x{channels}")]
    SizeOverflow {
        what: &'static str,
        width: usize,
        height: usize,
        channels: usize,
    },

    #[error("Unsupported channel count {0}, expected 1, 3 or 4")]
    UnsupportedChannelCount(usize),

    #[error("Channels {start}..{end} do not fit in a pixel of {pixel_stride} elements")]
    ChannelLayout {
        start: usize,
        end: usize,
        pixel_stride: usize,
    },

    #[error(
        "Dimension mismatch: source is {src_width}x{src_height} with {src_channels} channels, \
         destination is {dst_width}x{dst_height} with {dst_channels} channels"
    )]
    DimensionMismatch {
        src_width: usize,
        src_height: usize,
        src_channels: usize,
        dst_width: usize,
        dst_height: usize,
        dst_channels: usize,
    },

    #[error("Surface has no {0:?} channel")]
    MissingChannel(ChannelKind),

    #[error("Row stride {row_stride} is smaller than a row of {min} elements")]
    RowStride { row_stride: usize, min: usize },

    #[error("Pixel data holds {actual} elements, {expected} required")]
    DataLength { expected: usize, actual: usize },

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

impl BlurError {
    /// True for failures caused by running out of memory rather than bad input.
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(self, BlurError::Allocation { .. } | BlurError::SizeOverflow { .. })
    }
}

#[cfg(feature = "python")]
impl From<BlurError> for pyo3::PyErr {
    fn from(err: BlurError) -> Self {
        use pyo3::exceptions::{PyMemoryError, PyValueError};

        if err.is_resource_exhaustion() {
            PyMemoryError::new_err(err.to_string())
        } else {
            PyValueError::new_err(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_error_is_resource_exhaustion() {
        let source = Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err();
        let err = BlurError::Allocation {
            what: "scratch buffer",
            elements: usize::MAX,
            source,
        };
        assert!(err.is_resource_exhaustion());
        assert!(err.to_string().starts_with("Failed to allocate scratch buffer"));
    }

    #[test]
    fn test_layout_errors_are_not_resource_exhaustion() {
        assert!(!BlurError::UnsupportedChannelCount(2).is_resource_exhaustion());
        assert!(!BlurError::MissingChannel(ChannelKind::Alpha).is_resource_exhaustion());
    }

    #[test]
    fn test_unsupported_channel_count_message() {
        let err = BlurError::UnsupportedChannelCount(2);
        assert_eq!(err.to_string(), "Unsupported channel count 2, expected 1, 3 or 4");
    }
}
