//! StackBlur Rust Extensions
//!
//! Fast approximate Gaussian blur ("stack blur") over 2D rasters, with
//! Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Rasters expose their pixels as `(height, width, elements_per_pixel)`:
//! - **Grayscale**: 1 channel
//! - **RGB**: 3 color channels, in any order, optionally padded to 4 elements
//! - **RGBA**: 3 color channels + alpha, alpha first or last
//!
//! Component types:
//! - `u8`: 8-bit per channel (0-255)
//! - `u16`: 16-bit per channel (0-65535)
//! - `f32`: Float per channel
//!
//! ## Cost
//! Each pixel costs a constant amount of work regardless of radius, so a
//! radius of 200 runs about as fast as a radius of 2.
//!
//! ```
//! use ndarray::Array3;
//! use stackblur_rust::{stack_blur, Area, stack_blur_area};
//!
//! let mut image = Array3::<u8>::from_elem((32, 32, 4), 128);
//! stack_blur(&mut image, 5)?;
//! stack_blur_area(&mut image, Area::new(8, 8, 16, 16), 2)?;
//! # Ok::<(), stackblur_rust::BlurError>(())
//! ```

pub mod error;
pub mod filters;
pub mod raster;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::BlurError;
pub use filters::blur::{
    stack_blur, stack_blur_area, stack_blur_copy, stack_blur_f32, stack_blur_inplace_f32,
    stack_blur_inplace_u16, stack_blur_inplace_u8, stack_blur_u16, stack_blur_u8,
};
pub use filters::core::{BlurComponent, BlurSum};
pub use raster::{
    Area, ChannelKind, ChannelOrder, ChannelViewMut, CloneBuffer, PixelBuffer, PixelBufferMut,
    Surface,
};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3, PyReadwriteArray3};
    use pyo3::prelude::*;

    use crate::filters::blur::{
        stack_blur_f32 as blur_copy_f32, stack_blur_inplace_f32, stack_blur_inplace_u16,
        stack_blur_inplace_u8, stack_blur_u16 as blur_copy_u16, stack_blur_u8,
    };
    use crate::raster::Area;

    fn to_area(area: Option<(i32, i32, i32, i32)>) -> Option<Area> {
        area.map(|(x, y, width, height)| Area::new(x, y, width, height))
    }

    // ========================================================================
    // Copying blur
    // ========================================================================

    /// Stack blur a u8 image with 1, 3 or 4 channels.
    ///
    /// Returns a new array; the input is left untouched.
    #[pyfunction]
    pub fn stack_blur<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        radius: u32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = stack_blur_u8(image.as_array(), radius)?;
        Ok(result.into_pyarray(py))
    }

    /// Stack blur a u16 image with 1, 3 or 4 channels.
    #[pyfunction]
    pub fn stack_blur_u16<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u16>,
        radius: u32,
    ) -> PyResult<Bound<'py, PyArray3<u16>>> {
        let result = blur_copy_u16(image.as_array(), radius)?;
        Ok(result.into_pyarray(py))
    }

    /// Stack blur a float image with 1, 3 or 4 channels.
    #[pyfunction]
    pub fn stack_blur_f32<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        radius: u32,
    ) -> PyResult<Bound<'py, PyArray3<f32>>> {
        let result = blur_copy_f32(image.as_array(), radius)?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // In-place blur
    // ========================================================================

    /// Stack blur a writable u8 array in place.
    ///
    /// `area` is `(x, y, width, height)`; pixels outside it are not touched.
    #[pyfunction]
    #[pyo3(signature = (image, radius, area=None))]
    pub fn stack_blur_inplace(
        mut image: PyReadwriteArray3<'_, u8>,
        radius: u32,
        area: Option<(i32, i32, i32, i32)>,
    ) -> PyResult<()> {
        stack_blur_inplace_u8(image.as_array_mut(), to_area(area), radius)?;
        Ok(())
    }

    #[pyfunction]
    #[pyo3(name = "stack_blur_inplace_u16", signature = (image, radius, area=None))]
    pub fn stack_blur_inplace_u16_py(
        mut image: PyReadwriteArray3<'_, u16>,
        radius: u32,
        area: Option<(i32, i32, i32, i32)>,
    ) -> PyResult<()> {
        stack_blur_inplace_u16(image.as_array_mut(), to_area(area), radius)?;
        Ok(())
    }

    #[pyfunction]
    #[pyo3(name = "stack_blur_inplace_f32", signature = (image, radius, area=None))]
    pub fn stack_blur_inplace_f32_py(
        mut image: PyReadwriteArray3<'_, f32>,
        radius: u32,
        area: Option<(i32, i32, i32, i32)>,
    ) -> PyResult<()> {
        stack_blur_inplace_f32(image.as_array_mut(), to_area(area), radius)?;
        Ok(())
    }

    /// Python module definition
    #[pymodule]
    pub fn stackblur_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(stack_blur, m)?)?;
        m.add_function(wrap_pyfunction!(stack_blur_u16, m)?)?;
        m.add_function(wrap_pyfunction!(stack_blur_f32, m)?)?;

        m.add_function(wrap_pyfunction!(stack_blur_inplace, m)?)?;
        m.add_function(wrap_pyfunction!(stack_blur_inplace_u16_py, m)?)?;
        m.add_function(wrap_pyfunction!(stack_blur_inplace_f32_py, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::stackblur_rust;
