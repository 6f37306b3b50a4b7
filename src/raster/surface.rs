//! Owned interleaved surfaces and single-channel views into them.

use ndarray::{s, ArrayView3, ArrayViewMut3, ShapeBuilder};

use super::{
    element_count, try_filled_vec, try_vec, ChannelKind, ChannelOrder, CloneBuffer, PixelBuffer,
    PixelBufferMut,
};
use crate::error::BlurError;

/// Interleaved raster stored row by row, with optional padding after each row.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
    row_stride: usize,
    order: ChannelOrder,
}

/// Elements a `width` x `height` raster with `row_stride` needs to hold.
fn required_len(
    width: usize,
    height: usize,
    row_stride: usize,
    pixel_stride: usize,
) -> Result<usize, BlurError> {
    if width == 0 || height == 0 {
        return Ok(0);
    }
    let leading_rows = element_count("surface", row_stride, height - 1, 1)?;
    let last_row = element_count("surface", width, pixel_stride, 1)?;
    leading_rows.checked_add(last_row).ok_or(BlurError::SizeOverflow {
        what: "surface",
        width,
        height,
        channels: pixel_stride,
    })
}

fn check_row_stride(width: usize, row_stride: usize, order: ChannelOrder) -> Result<(), BlurError> {
    let min = element_count("surface row", width, order.pixel_stride(), 1)?;
    if row_stride < min {
        return Err(BlurError::RowStride { row_stride, min });
    }
    Ok(())
}

impl<T: Copy + Default> Surface<T> {
    /// Tightly packed surface with every element at its default value.
    pub fn new(width: usize, height: usize, order: ChannelOrder) -> Result<Self, BlurError> {
        let row_stride = element_count("surface row", width, order.pixel_stride(), 1)?;
        Self::with_row_stride(width, height, row_stride, order)
    }

    /// Surface whose rows start `row_stride` elements apart.
    pub fn with_row_stride(
        width: usize,
        height: usize,
        row_stride: usize,
        order: ChannelOrder,
    ) -> Result<Self, BlurError> {
        check_row_stride(width, row_stride, order)?;
        let len = element_count("surface", row_stride, height, 1)?;
        let data = try_filled_vec(len, T::default(), "surface")?;
        Ok(Self {
            data,
            width,
            height,
            row_stride,
            order,
        })
    }

    /// Wrap existing pixel data laid out with `row_stride`.
    pub fn from_vec(
        width: usize,
        height: usize,
        row_stride: usize,
        order: ChannelOrder,
        data: Vec<T>,
    ) -> Result<Self, BlurError> {
        check_row_stride(width, row_stride, order)?;
        let expected = required_len(width, height, row_stride, order.pixel_stride())?;
        if data.len() < expected {
            return Err(BlurError::DataLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            row_stride,
            order,
        })
    }

    /// Set every pixel to `value`; extra elements are ignored, missing ones left as is.
    pub fn fill(&mut self, value: &[T]) {
        let n = value.len().min(self.order.pixel_stride());
        let mut pixels = self.pixels_mut();
        for mut pixel in pixels.rows_mut() {
            for (dst, src) in pixel.iter_mut().zip(&value[..n]) {
                *dst = *src;
            }
        }
    }
}

impl<T> Surface<T> {
    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    /// Raw element storage, row padding included.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    fn pixel_range(&self, x: usize, y: usize) -> Option<std::ops::Range<usize>> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = y * self.row_stride + x * self.order.pixel_stride();
        Some(start..start + self.order.pixel_stride())
    }

    /// Elements of the pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[T]> {
        let range = self.pixel_range(x, y)?;
        self.data.get(range)
    }

    pub fn pixel_mut(&mut self, x: usize, y: usize) -> Option<&mut [T]> {
        let range = self.pixel_range(x, y)?;
        self.data.get_mut(range)
    }

    /// Single-channel view of one interleaved channel, e.g. to blur alpha alone.
    pub fn channel_mut(&mut self, kind: ChannelKind) -> Result<ChannelViewMut<'_, T>, BlurError>
    where
        T: Copy,
    {
        let offset = self
            .order
            .offset_of(kind)
            .ok_or(BlurError::MissingChannel(kind))?;
        Ok(ChannelViewMut {
            pixels: self.pixels_mut(),
            offset,
        })
    }
}

impl<T: Copy> PixelBuffer for Surface<T> {
    type Component = T;

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn row_stride(&self) -> usize {
        self.row_stride
    }

    fn pixel_stride(&self) -> usize {
        self.order.pixel_stride()
    }

    fn color_channel_offset(&self) -> usize {
        self.order.color_offset()
    }

    fn alpha_channel_offset(&self) -> Option<usize> {
        self.order.alpha_offset()
    }

    fn channel_count(&self) -> usize {
        self.order.channel_count()
    }

    fn pixels(&self) -> ArrayView3<'_, T> {
        let pixel_stride = self.order.pixel_stride();
        let shape = (self.height, self.width, pixel_stride).strides((self.row_stride, pixel_stride, 1));
        ArrayView3::from_shape(shape, &self.data).expect("surface layout is validated on construction")
    }
}

impl<T: Copy> PixelBufferMut for Surface<T> {
    fn pixels_mut(&mut self) -> ArrayViewMut3<'_, T> {
        let pixel_stride = self.order.pixel_stride();
        let shape = (self.height, self.width, pixel_stride).strides((self.row_stride, pixel_stride, 1));
        ArrayViewMut3::from_shape(shape, &mut self.data)
            .expect("surface layout is validated on construction")
    }
}

impl<T: Copy + Default> CloneBuffer for Surface<T> {
    type Owned = Surface<T>;

    fn clone_buffer(&self, copy_pixels: bool) -> Result<Surface<T>, BlurError> {
        let data = if copy_pixels {
            let mut data = try_vec(self.data.len(), "surface clone")?;
            data.extend_from_slice(&self.data);
            data
        } else {
            try_filled_vec(self.data.len(), T::default(), "surface clone")?
        };
        Ok(Surface {
            data,
            width: self.width,
            height: self.height,
            row_stride: self.row_stride,
            order: self.order,
        })
    }
}

/// One channel of an interleaved surface, seen as a single-channel raster.
#[derive(Debug)]
pub struct ChannelViewMut<'a, T> {
    pixels: ArrayViewMut3<'a, T>,
    offset: usize,
}

impl<T: Copy> PixelBuffer for ChannelViewMut<'_, T> {
    type Component = T;

    fn width(&self) -> usize {
        self.pixels.dim().1
    }

    fn height(&self) -> usize {
        self.pixels.dim().0
    }

    fn row_stride(&self) -> usize {
        self.pixels.strides()[0].unsigned_abs()
    }

    fn pixel_stride(&self) -> usize {
        self.pixels.strides()[1].unsigned_abs()
    }

    fn color_channel_offset(&self) -> usize {
        self.offset
    }

    fn alpha_channel_offset(&self) -> Option<usize> {
        None
    }

    fn channel_count(&self) -> usize {
        1
    }

    fn pixels(&self) -> ArrayView3<'_, T> {
        self.pixels.view()
    }
}

impl<T: Copy> PixelBufferMut for ChannelViewMut<'_, T> {
    fn pixels_mut(&mut self) -> ArrayViewMut3<'_, T> {
        self.pixels.view_mut()
    }
}

impl<T: Copy + Default> CloneBuffer for ChannelViewMut<'_, T> {
    type Owned = Surface<T>;

    fn clone_buffer(&self, copy_pixels: bool) -> Result<Surface<T>, BlurError> {
        let (height, width, _) = self.pixels.dim();
        if !copy_pixels {
            return Surface::new(width, height, ChannelOrder::Gray);
        }
        let len = element_count("channel clone", width, height, 1)?;
        let mut data = try_vec(len, "channel clone")?;
        data.extend(self.pixels.slice(s![.., .., self.offset]).iter().copied());
        Surface::from_vec(width, height, width, ChannelOrder::Gray, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_surface_is_packed() {
        let surface = Surface::<u8>::new(5, 3, ChannelOrder::Rgb).unwrap();
        assert_eq!(surface.row_stride(), 15);
        assert_eq!(surface.data().len(), 45);
        assert_eq!(surface.pixels().dim(), (3, 5, 3));
    }

    #[test]
    fn test_row_stride_too_small() {
        let err = Surface::<u8>::with_row_stride(4, 4, 15, ChannelOrder::Rgba).unwrap_err();
        assert!(matches!(err, BlurError::RowStride { row_stride: 15, min: 16 }));
    }

    #[test]
    fn test_from_vec_checks_length() {
        // Last row needs no padding
        let ok = Surface::from_vec(2, 2, 8, ChannelOrder::Rgb, vec![0u8; 14]);
        assert!(ok.is_ok());

        let err = Surface::from_vec(2, 2, 8, ChannelOrder::Rgb, vec![0u8; 13]).unwrap_err();
        assert!(matches!(err, BlurError::DataLength { expected: 14, actual: 13 }));
    }

    #[test]
    fn test_padded_pixels_view() {
        let mut surface = Surface::<u16>::with_row_stride(2, 2, 10, ChannelOrder::Rgba).unwrap();
        surface.pixel_mut(1, 1).unwrap().copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(surface.data()[14..18], [1, 2, 3, 4]);

        let pixels = surface.pixels();
        assert_eq!(pixels[[1, 1, 2]], 3);
        assert_eq!(pixels.strides(), &[10, 4, 1]);
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let surface = Surface::<f32>::new(2, 2, ChannelOrder::Gray).unwrap();
        assert!(surface.pixel(2, 0).is_none());
        assert!(surface.pixel(0, 2).is_none());
        assert_eq!(surface.pixel(1, 1), Some(&[0.0f32][..]));
    }

    #[test]
    fn test_fill_leaves_padding() {
        let mut surface = Surface::<u8>::with_row_stride(2, 2, 7, ChannelOrder::Rgb).unwrap();
        surface.fill(&[10, 20, 30]);
        assert_eq!(surface.pixel(1, 1), Some(&[10, 20, 30][..]));
        assert_eq!(surface.data()[6], 0);
    }

    #[test]
    fn test_clone_buffer() {
        let mut surface = Surface::<u8>::new(3, 2, ChannelOrder::Bgra).unwrap();
        surface.fill(&[1, 2, 3, 4]);

        let copy = surface.clone_buffer(true).unwrap();
        assert_eq!(copy, surface);

        let blank = surface.clone_buffer(false).unwrap();
        assert_eq!(blank.order(), ChannelOrder::Bgra);
        assert_eq!(blank.row_stride(), surface.row_stride());
        assert!(blank.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_channel_view() {
        let mut surface = Surface::<u8>::new(2, 2, ChannelOrder::Argb).unwrap();
        surface.fill(&[200, 1, 2, 3]);

        let alpha = surface.channel_mut(ChannelKind::Alpha).unwrap();
        assert_eq!(alpha.channel_count(), 1);
        assert_eq!(alpha.color_channel_offset(), 0);
        assert_eq!(alpha.pixel_stride(), 4);

        let cloned = alpha.clone_buffer(true).unwrap();
        assert_eq!(cloned.order(), ChannelOrder::Gray);
        assert_eq!(cloned.data(), &[200, 200, 200, 200]);

        let blue = surface.channel_mut(ChannelKind::Blue).unwrap();
        assert_eq!(blue.color_channel_offset(), 3);
    }

    #[test]
    fn test_missing_alpha_channel() {
        let mut surface = Surface::<u8>::new(2, 2, ChannelOrder::Xrgb).unwrap();
        let err = surface.channel_mut(ChannelKind::Alpha).unwrap_err();
        assert!(matches!(err, BlurError::MissingChannel(ChannelKind::Alpha)));
    }
}
