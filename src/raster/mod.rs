//! Raster views consumed and produced by the blur engine.
//!
//! A raster is anything that can expose its pixels as a strided ndarray view
//! of shape `(height, width, elements_per_pixel)` and describe where its
//! color components live inside each pixel:
//!
//! | Type | Layout | Channels |
//! |------|--------|----------|
//! | [`Surface<T>`] | interleaved, any [`ChannelOrder`], optional row padding | 1, 3 or 4 |
//! | [`ChannelViewMut<T>`] | one channel of an interleaved surface | 1 |
//! | `Array3<T>` / `ArrayView3<T>` / `ArrayViewMut3<T>` | `(H, W, C)` | `C`, alpha when `C == 4` |
//!
//! Component types are `u8`, `u16` and `f32`.

mod area;
mod channel_order;
mod surface;

use ndarray::{Array3, ArrayBase, ArrayView3, ArrayViewMut3, Data, DataMut, Ix3};

use crate::error::BlurError;

pub use area::Area;
pub use channel_order::{ChannelKind, ChannelOrder};
pub use surface::{ChannelViewMut, Surface};

/// Read side of a raster.
pub trait PixelBuffer {
    type Component: Copy;

    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// Elements between the starts of consecutive rows.
    fn row_stride(&self) -> usize;

    /// Elements between consecutive pixels of a row.
    fn pixel_stride(&self) -> usize;

    /// Offset of the first color component within a pixel.
    ///
    /// Color components are assumed to be stored contiguously from here.
    fn color_channel_offset(&self) -> usize;

    fn alpha_channel_offset(&self) -> Option<usize>;

    fn has_alpha(&self) -> bool {
        self.alpha_channel_offset().is_some()
    }

    /// Channels a blur processes per pixel.
    fn channel_count(&self) -> usize;

    /// All pixels as a `(height, width, elements_per_pixel)` view.
    fn pixels(&self) -> ArrayView3<'_, Self::Component>;

    fn bounds(&self) -> Area {
        Area::from_size(self.width(), self.height())
    }
}

/// Write side of a raster.
pub trait PixelBufferMut: PixelBuffer {
    fn pixels_mut(&mut self) -> ArrayViewMut3<'_, Self::Component>;
}

/// Rasters that can produce an owned raster of the same shape.
pub trait CloneBuffer: PixelBuffer {
    type Owned: PixelBufferMut<Component = Self::Component>;

    /// Allocate a raster of identical shape, copying pixel values when
    /// `copy_pixels` is set and leaving them at their default otherwise.
    fn clone_buffer(&self, copy_pixels: bool) -> Result<Self::Owned, BlurError>;
}

/// Number of elements in a `width * height * channels` buffer.
pub(crate) fn element_count(
    what: &'static str,
    width: usize,
    height: usize,
    channels: usize,
) -> Result<usize, BlurError> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(BlurError::SizeOverflow {
            what,
            width,
            height,
            channels,
        })
}

/// Empty vector with room for exactly `len` elements, or an allocation error.
pub(crate) fn try_vec<T>(len: usize, what: &'static str) -> Result<Vec<T>, BlurError> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|source| BlurError::Allocation {
            what,
            elements: len,
            source,
        })?;
    Ok(data)
}

/// Vector of `len` copies of `value`, or an allocation error.
pub(crate) fn try_filled_vec<T: Clone>(
    len: usize,
    value: T,
    what: &'static str,
) -> Result<Vec<T>, BlurError> {
    let mut data = try_vec(len, what)?;
    data.resize(len, value);
    Ok(data)
}

// ============================================================================
// ndarray arrays: (height, width, channels)
// ============================================================================

impl<S, T> PixelBuffer for ArrayBase<S, Ix3>
where
    S: Data<Elem = T>,
    T: Copy,
{
    type Component = T;

    fn width(&self) -> usize {
        self.dim().1
    }

    fn height(&self) -> usize {
        self.dim().0
    }

    fn row_stride(&self) -> usize {
        self.strides()[0].unsigned_abs()
    }

    fn pixel_stride(&self) -> usize {
        self.strides()[1].unsigned_abs()
    }

    fn color_channel_offset(&self) -> usize {
        0
    }

    fn alpha_channel_offset(&self) -> Option<usize> {
        (self.dim().2 == 4).then_some(3)
    }

    fn channel_count(&self) -> usize {
        self.dim().2
    }

    fn pixels(&self) -> ArrayView3<'_, T> {
        self.view()
    }
}

impl<S, T> PixelBufferMut for ArrayBase<S, Ix3>
where
    S: DataMut<Elem = T>,
    T: Copy,
{
    fn pixels_mut(&mut self) -> ArrayViewMut3<'_, T> {
        self.view_mut()
    }
}

impl<S, T> CloneBuffer for ArrayBase<S, Ix3>
where
    S: Data<Elem = T>,
    T: Copy + Default,
{
    type Owned = Array3<T>;

    fn clone_buffer(&self, copy_pixels: bool) -> Result<Array3<T>, BlurError> {
        let (height, width, channels) = self.dim();
        let len = element_count("raster clone", width, height, channels)?;
        let data = if copy_pixels {
            let mut data = try_vec(len, "raster clone")?;
            data.extend(self.iter().copied());
            data
        } else {
            try_filled_vec(len, T::default(), "raster clone")?
        };
        Ok(Array3::from_shape_vec(self.raw_dim(), data)?)
    }
}
