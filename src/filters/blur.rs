//! Stack blur for 1, 3 and 4 channel rasters.
//!
//! Approximates a Gaussian blur with a triangular (tent) kernel applied as
//! two separable passes. Each pass slides a window of `2 * radius + 1`
//! samples along a line and updates the weighted sum in constant time per
//! sample, so the cost per pixel does not depend on the radius.
//!
//! ## Bit Depth Support
//!
//! | Component | Accumulator | Normalization |
//! |-----------|-------------|---------------|
//! | `u8` | `i32`, `i64` above radius 2900 | integer division by the kernel divisor |
//! | `u16` | `i64` | integer division by the kernel divisor |
//! | `f32` | `f32`, `f64` above radius 4095 | multiplication by the divisor's reciprocal |
//!
//! ## Alpha Handling
//!
//! Alpha is blurred as an ordinary channel. Colors are not premultiplied.
//!
//! ## Edges
//!
//! Samples beyond the blurred area repeat the nearest edge sample, so any
//! radius is valid, including radii larger than the raster.

use std::ops::Range;

#[cfg(feature = "parallel")]
use ndarray::parallel::prelude::*;
use ndarray::{s, Array3, ArrayView2, ArrayView3, ArrayViewMut2, ArrayViewMut3, Axis};
use num_traits::NumAssign;

use super::core::{alloc_scratch, BlurComponent, BlurSum};
use crate::error::BlurError;
use crate::raster::{try_filled_vec, Area, CloneBuffer, PixelBuffer, PixelBufferMut};

// ============================================================================
// Sliding window
// ============================================================================

/// The `2 * radius + 1` samples currently under the kernel, as a ring.
///
/// `out_sum` holds the samples at or left of the center, `in_sum` those to
/// the right; `sum` is the tent-weighted total of both. One window is reused
/// for every line a worker processes.
struct StackWindow<S, const C: usize> {
    slots: Vec<[S; C]>,
    sum: [S; C],
    in_sum: [S; C],
    out_sum: [S; C],
    pointer: usize,
    radius: usize,
}

impl<S: Copy + NumAssign, const C: usize> StackWindow<S, C> {
    fn new(radius: usize) -> Result<Self, BlurError> {
        let slots = try_filled_vec(2 * radius + 1, [S::zero(); C], "stack window")?;
        Ok(Self {
            slots,
            sum: [S::zero(); C],
            in_sum: [S::zero(); C],
            out_sum: [S::zero(); C],
            pointer: radius,
            radius,
        })
    }

    /// Load the window centered on index 0 of a line whose last index is `last`.
    fn prime(&mut self, last: usize, sample: &impl Fn(usize) -> [S; C]) {
        let radius = self.radius;
        self.sum = [S::zero(); C];
        self.in_sum = [S::zero(); C];
        self.out_sum = [S::zero(); C];

        let mut weight = S::zero();
        for (k, slot) in self.slots.iter_mut().enumerate() {
            let value = sample(k.saturating_sub(radius).min(last));
            if k <= radius {
                weight += S::one();
            } else {
                weight -= S::one();
            }
            *slot = value;
            for c in 0..C {
                self.sum[c] += value[c] * weight;
                if k > radius {
                    self.in_sum[c] += value[c];
                } else {
                    self.out_sum[c] += value[c];
                }
            }
        }
        self.pointer = radius;
    }

    /// Shift the window one sample forward, taking in `incoming` at the far end.
    #[inline]
    fn advance(&mut self, incoming: [S; C]) {
        let len = self.slots.len();
        let start = (self.pointer + len - self.radius) % len;
        let leaving = self.slots[start];
        for c in 0..C {
            self.sum[c] -= self.out_sum[c];
            self.out_sum[c] -= leaving[c];
            self.in_sum[c] += incoming[c];
            self.sum[c] += self.in_sum[c];
        }
        self.slots[start] = incoming;

        self.pointer = (self.pointer + 1) % len;
        let center = self.slots[self.pointer];
        for c in 0..C {
            self.out_sum[c] += center[c];
            self.in_sum[c] -= center[c];
        }
    }

    /// Slide along one line of `len` samples, reporting the weighted sum at
    /// every position.
    fn run(
        &mut self,
        len: usize,
        sample: impl Fn(usize) -> [S; C],
        mut emit: impl FnMut(usize, &[S; C]),
    ) {
        if len == 0 {
            return;
        }
        let last = len - 1;
        self.prime(last, &sample);

        for pos in 0..len {
            emit(pos, &self.sum);
            self.advance(sample((pos + self.radius + 1).min(last)));
        }
    }
}

// ============================================================================
// Passes
// ============================================================================

fn blur_row<T, S: BlurSum<T>, const C: usize>(
    window: &mut StackWindow<S, C>,
    mut out: ArrayViewMut2<'_, S>,
    line: ArrayView2<'_, T>,
    normalizer: S,
) where
    T: Copy,
{
    window.run(
        line.nrows(),
        |x| std::array::from_fn(|c| S::from_component(line[[x, c]])),
        |x, sum| {
            for c in 0..C {
                out[[x, c]] = S::normalize(sum[c], normalizer);
            }
        },
    );
}

fn blur_column<T, S: BlurSum<T>, const C: usize>(
    window: &mut StackWindow<S, C>,
    mut out: ArrayViewMut2<'_, T>,
    line: ArrayView2<'_, S>,
    normalizer: S,
) {
    window.run(
        line.nrows(),
        |y| std::array::from_fn(|c| line[[y, c]]),
        |y, sum| {
            for c in 0..C {
                out[[y, c]] = S::to_component(S::normalize(sum[c], normalizer));
            }
        },
    );
}

/// Blur every row of `src` into the full-precision `scratch` buffer.
fn horizontal_pass<T: BlurComponent, S: BlurSum<T>, const C: usize>(
    src: ArrayView3<'_, T>,
    scratch: &mut Array3<S>,
    radius: usize,
) -> Result<(), BlurError> {
    let normalizer = S::normalizer(radius);
    let rows = scratch.axis_iter_mut(Axis(0));
    let lines = src.axis_iter(Axis(0));

    #[cfg(feature = "parallel")]
    let result: Result<(), BlurError> = rows
        .into_par_iter()
        .zip(lines.into_par_iter())
        .try_for_each_init(
            || StackWindow::<S, C>::new(radius),
            |window, (out, line)| {
                let window = window.as_mut().map_err(|err| err.clone())?;
                blur_row::<T, S, C>(window, out, line, normalizer);
                Ok(())
            },
        );
    #[cfg(not(feature = "parallel"))]
    let result = StackWindow::<S, C>::new(radius).map(|mut window| {
        for (out, line) in rows.zip(lines) {
            blur_row::<T, S, C>(&mut window, out, line, normalizer);
        }
    });

    result
}

/// Blur every column of `scratch` into the final components of `dst`.
fn vertical_pass<T: BlurComponent, S: BlurSum<T>, const C: usize>(
    scratch: ArrayView3<'_, S>,
    mut dst: ArrayViewMut3<'_, T>,
    radius: usize,
) -> Result<(), BlurError> {
    let normalizer = S::normalizer(radius);
    let columns = dst.axis_iter_mut(Axis(1));
    let lines = scratch.axis_iter(Axis(1));

    #[cfg(feature = "parallel")]
    let result: Result<(), BlurError> = columns
        .into_par_iter()
        .zip(lines.into_par_iter())
        .try_for_each_init(
            || StackWindow::<S, C>::new(radius),
            |window, (out, line)| {
                let window = window.as_mut().map_err(|err| err.clone())?;
                blur_column::<T, S, C>(window, out, line, normalizer);
                Ok(())
            },
        );
    #[cfg(not(feature = "parallel"))]
    let result = StackWindow::<S, C>::new(radius).map(|mut window| {
        for (out, line) in columns.zip(lines) {
            blur_column::<T, S, C>(&mut window, out, line, normalizer);
        }
    });

    result
}

fn blur_in_place<T: BlurComponent, S: BlurSum<T>, const C: usize>(
    region: ArrayViewMut3<'_, T>,
    radius: usize,
) -> Result<(), BlurError> {
    let (height, width, _) = region.dim();
    let mut scratch = alloc_scratch::<S>(height, width, C)?;
    horizontal_pass::<T, S, C>(region.view(), &mut scratch, radius)?;
    vertical_pass::<T, S, C>(scratch.view(), region, radius)
}

fn blur_into<T: BlurComponent, S: BlurSum<T>, const C: usize>(
    src: ArrayView3<'_, T>,
    dst: ArrayViewMut3<'_, T>,
    radius: usize,
) -> Result<(), BlurError> {
    let (height, width, _) = src.dim();
    let mut scratch = alloc_scratch::<S>(height, width, C)?;
    horizontal_pass::<T, S, C>(src, &mut scratch, radius)?;
    vertical_pass::<T, S, C>(scratch.view(), dst, radius)
}

// ============================================================================
// Dispatch
// ============================================================================

/// Element range of a pixel covered by the blurred channels.
///
/// The 4-channel path spans color and alpha, starting at whichever comes first.
fn blurred_span<B: PixelBuffer>(buffer: &B) -> Result<Range<usize>, BlurError> {
    let count = buffer.channel_count();
    if !matches!(count, 1 | 3 | 4) {
        return Err(BlurError::UnsupportedChannelCount(count));
    }
    let start = match (count, buffer.alpha_channel_offset()) {
        (4, Some(alpha)) => buffer.color_channel_offset().min(alpha),
        _ => buffer.color_channel_offset(),
    };
    let end = start + count;
    let elements = buffer.pixels().dim().2;
    if end > elements {
        return Err(BlurError::ChannelLayout {
            start,
            end,
            pixel_stride: elements,
        });
    }
    Ok(start..end)
}

/// Radius the widest accumulator of `T` can carry.
fn effective_radius<T: BlurComponent>(radius: u32) -> usize {
    let requested = radius as usize;
    let limit = <T::WideSum as BlurSum<T>>::MAX_RADIUS;
    if requested > limit {
        log::debug!("stack blur radius {requested} exceeds accumulator limit, clamping to {limit}");
        limit
    } else {
        requested
    }
}

/// Whether `radius` overflows the narrow accumulator of `T`.
fn needs_wide_sum<T: BlurComponent>(radius: usize) -> bool {
    radius > <T::Sum as BlurSum<T>>::MAX_RADIUS
}

fn in_place_by_channels<T: BlurComponent, S: BlurSum<T>>(
    region: ArrayViewMut3<'_, T>,
    radius: usize,
) -> Result<(), BlurError> {
    match region.dim().2 {
        1 => blur_in_place::<T, S, 1>(region, radius),
        3 => blur_in_place::<T, S, 3>(region, radius),
        4 => blur_in_place::<T, S, 4>(region, radius),
        n => Err(BlurError::UnsupportedChannelCount(n)),
    }
}

fn into_by_channels<T: BlurComponent, S: BlurSum<T>>(
    src: ArrayView3<'_, T>,
    dst: ArrayViewMut3<'_, T>,
    radius: usize,
) -> Result<(), BlurError> {
    match src.dim().2 {
        1 => blur_into::<T, S, 1>(src, dst, radius),
        3 => blur_into::<T, S, 3>(src, dst, radius),
        4 => blur_into::<T, S, 4>(src, dst, radius),
        n => Err(BlurError::UnsupportedChannelCount(n)),
    }
}

fn dispatch_in_place<T: BlurComponent>(
    region: ArrayViewMut3<'_, T>,
    radius: usize,
) -> Result<(), BlurError> {
    if needs_wide_sum::<T>(radius) {
        in_place_by_channels::<T, T::WideSum>(region, radius)
    } else {
        in_place_by_channels::<T, T::Sum>(region, radius)
    }
}

fn dispatch_into<T: BlurComponent>(
    src: ArrayView3<'_, T>,
    dst: ArrayViewMut3<'_, T>,
    radius: usize,
) -> Result<(), BlurError> {
    if needs_wide_sum::<T>(radius) {
        into_by_channels::<T, T::WideSum>(src, dst, radius)
    } else {
        into_by_channels::<T, T::Sum>(src, dst, radius)
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Blur the whole raster in place.
///
/// A radius of 0 leaves the raster untouched.
pub fn stack_blur<B>(raster: &mut B, radius: u32) -> Result<(), BlurError>
where
    B: PixelBufferMut,
    B::Component: BlurComponent,
{
    let bounds = raster.bounds();
    stack_blur_area(raster, bounds, radius)
}

/// Blur only `area` of the raster in place.
///
/// `area` is clipped to the raster first. Pixels outside it are neither
/// read nor written, and edge samples are repeated at the area's border.
pub fn stack_blur_area<B>(raster: &mut B, area: Area, radius: u32) -> Result<(), BlurError>
where
    B: PixelBufferMut,
    B::Component: BlurComponent,
{
    if radius < 1 {
        return Ok(());
    }
    let clipped = area.clip_by(&raster.bounds());
    if clipped.is_empty() {
        log::debug!("stack blur skipped, {area:?} does not overlap the raster");
        return Ok(());
    }
    let channels = blurred_span(&*raster)?;
    let radius = effective_radius::<B::Component>(radius);
    log::trace!(
        "stack blur {}x{} at ({}, {}), channels {:?}, radius {}",
        clipped.width,
        clipped.height,
        clipped.x,
        clipped.y,
        channels,
        radius
    );

    let (rows, cols) = clipped.index_ranges();
    let region = raster.pixels_mut().slice_move(s![rows, cols, channels]);
    dispatch_in_place(region, radius)
}

/// Blur into a newly allocated raster of the same shape, leaving `raster` untouched.
///
/// Elements outside the blurred channels (padding) are left at their default
/// in the result. A radius of 0 returns a plain copy.
pub fn stack_blur_copy<B>(raster: &B, radius: u32) -> Result<B::Owned, BlurError>
where
    B: CloneBuffer,
    B::Component: BlurComponent,
{
    if radius < 1 || raster.width() == 0 || raster.height() == 0 {
        return raster.clone_buffer(true);
    }
    let src_channels = blurred_span(raster)?;
    let mut result = raster.clone_buffer(false)?;
    let dst_channels = blurred_span(&result)?;

    if (result.width(), result.height(), dst_channels.len())
        != (raster.width(), raster.height(), src_channels.len())
    {
        return Err(BlurError::DimensionMismatch {
            src_width: raster.width(),
            src_height: raster.height(),
            src_channels: src_channels.len(),
            dst_width: result.width(),
            dst_height: result.height(),
            dst_channels: dst_channels.len(),
        });
    }

    let radius = effective_radius::<B::Component>(radius);
    log::trace!(
        "stack blur copy {}x{}, channels {:?}, radius {}",
        raster.width(),
        raster.height(),
        src_channels,
        radius
    );

    let src = raster.pixels().slice_move(s![.., .., src_channels]);
    let dst = result.pixels_mut().slice_move(s![.., .., dst_channels]);
    dispatch_into(src, dst, radius)?;
    Ok(result)
}

// ============================================================================
// ndarray convenience: (height, width, channels) arrays
// ============================================================================

/// Stack blur a u8 image with 1, 3 or 4 channels into a new array.
pub fn stack_blur_u8(input: ArrayView3<u8>, radius: u32) -> Result<Array3<u8>, BlurError> {
    stack_blur_copy(&input, radius)
}

/// Stack blur a u16 image with 1, 3 or 4 channels into a new array.
pub fn stack_blur_u16(input: ArrayView3<u16>, radius: u32) -> Result<Array3<u16>, BlurError> {
    stack_blur_copy(&input, radius)
}

/// Stack blur an f32 image with 1, 3 or 4 channels into a new array.
pub fn stack_blur_f32(input: ArrayView3<f32>, radius: u32) -> Result<Array3<f32>, BlurError> {
    stack_blur_copy(&input, radius)
}

/// Stack blur a u8 image in place, optionally restricted to `area`.
pub fn stack_blur_inplace_u8(
    mut image: ArrayViewMut3<u8>,
    area: Option<Area>,
    radius: u32,
) -> Result<(), BlurError> {
    let area = area.unwrap_or_else(|| image.bounds());
    stack_blur_area(&mut image, area, radius)
}

/// Stack blur a u16 image in place, optionally restricted to `area`.
pub fn stack_blur_inplace_u16(
    mut image: ArrayViewMut3<u16>,
    area: Option<Area>,
    radius: u32,
) -> Result<(), BlurError> {
    let area = area.unwrap_or_else(|| image.bounds());
    stack_blur_area(&mut image, area, radius)
}

/// Stack blur an f32 image in place, optionally restricted to `area`.
pub fn stack_blur_inplace_f32(
    mut image: ArrayViewMut3<f32>,
    area: Option<Area>,
    radius: u32,
) -> Result<(), BlurError> {
    let area = area.unwrap_or_else(|| image.bounds());
    stack_blur_area(&mut image, area, radius)
}
