//! WebAssembly exports for stack blur.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images are
//! flat, tightly packed `(height, width, channels)` buffers with 1, 3 or 4
//! channels; 4 channels means RGBA.
//!
//! ## Bit Depth Support
//!
//! - **u8**: 8-bit per channel (0-255), standard for web/display
//! - **u16**: 16-bit per channel (0-65535)
//! - **f32**: Float per channel, for HDR/linear workflows

use ndarray::{ArrayView3, ArrayViewMut3};
use wasm_bindgen::prelude::*;

use crate::error::BlurError;
use crate::filters::blur::{stack_blur_area, stack_blur_f32, stack_blur_u16, stack_blur_u8};
use crate::raster::{element_count, Area};

fn check_len(len: usize, width: usize, height: usize, channels: usize) -> Result<(), BlurError> {
    let expected = element_count("wasm image", width, height, channels)?;
    if len != expected {
        return Err(BlurError::DataLength {
            expected,
            actual: len,
        });
    }
    Ok(())
}

// ============================================================================
// Copying blur
// ============================================================================

/// Stack blur a u8 image into a new buffer.
///
/// # Arguments
/// * `data` - Flat array of bytes (length = width * height * channels)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `channels` - 1, 3 or 4
/// * `radius` - Blur radius in pixels; 0 returns a copy
#[wasm_bindgen]
pub fn stack_blur_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    radius: u32,
) -> Result<Vec<u8>, JsError> {
    check_len(data.len(), width, height, channels)?;
    let input = ArrayView3::from_shape((height, width, channels), data)?;
    let result = stack_blur_u8(input, radius)?;
    Ok(result.into_raw_vec_and_offset().0)
}

/// Stack blur a u16 image into a new buffer.
#[wasm_bindgen]
pub fn stack_blur_u16_wasm(
    data: &[u16],
    width: usize,
    height: usize,
    channels: usize,
    radius: u32,
) -> Result<Vec<u16>, JsError> {
    check_len(data.len(), width, height, channels)?;
    let input = ArrayView3::from_shape((height, width, channels), data)?;
    let result = stack_blur_u16(input, radius)?;
    Ok(result.into_raw_vec_and_offset().0)
}

/// Stack blur an f32 image into a new buffer.
#[wasm_bindgen]
pub fn stack_blur_f32_wasm(
    data: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    radius: u32,
) -> Result<Vec<f32>, JsError> {
    check_len(data.len(), width, height, channels)?;
    let input = ArrayView3::from_shape((height, width, channels), data)?;
    let result = stack_blur_f32(input, radius)?;
    Ok(result.into_raw_vec_and_offset().0)
}

// ============================================================================
// In-place blur
// ============================================================================

/// Stack blur the rectangle `(x, y, area_width, area_height)` of a u8 image in place.
///
/// The rectangle is clipped to the image; pixels outside it are untouched.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn stack_blur_area_wasm(
    data: &mut [u8],
    width: usize,
    height: usize,
    channels: usize,
    x: i32,
    y: i32,
    area_width: i32,
    area_height: i32,
    radius: u32,
) -> Result<(), JsError> {
    check_len(data.len(), width, height, channels)?;
    let mut image = ArrayViewMut3::from_shape((height, width, channels), data)?;
    stack_blur_area(&mut image, Area::new(x, y, area_width, area_height), radius)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_len() {
        assert!(check_len(24, 2, 3, 4).is_ok());
        let err = check_len(23, 2, 3, 4).unwrap_err();
        assert!(matches!(err, BlurError::DataLength { expected: 24, actual: 23 }));
    }
}
