//! Core numeric support shared by the blur passes.
//!
//! This module provides:
//! - The component-kind trait pairing each component type with its accumulators
//! - Normalization of accumulated sums back into component range
//! - Fallible allocation of the intermediate scratch buffer

use ndarray::Array3;
use num_traits::{NumAssign, Zero};

use crate::error::BlurError;
use crate::raster::{element_count, try_filled_vec};

/// Accumulator that carries weighted window sums of component `T`.
pub trait BlurSum<T>: Copy + NumAssign + PartialOrd + Send + Sync + 'static {
    /// Largest radius whose weighted sums still fit. Larger radii are clamped.
    const MAX_RADIUS: usize;

    fn from_component(value: T) -> Self;

    /// Factor handed to [`BlurSum::normalize`] for a given radius.
    ///
    /// Integral sums return the triangular kernel divisor `(radius + 1)^2`,
    /// floating sums its reciprocal.
    fn normalizer(radius: usize) -> Self;

    /// Scale an accumulated window sum back to component magnitude.
    fn normalize(sum: Self, normalizer: Self) -> Self;

    /// Convert a normalized value into the component type, clamped to its range.
    fn to_component(value: Self) -> T;
}

/// A pixel component the stack blur can process.
///
/// `Sum` is used while the radius stays within its [`BlurSum::MAX_RADIUS`];
/// above that the blur runs on `WideSum`.
pub trait BlurComponent: Copy + Default + Send + Sync + 'static {
    type Sum: BlurSum<Self>;
    type WideSum: BlurSum<Self>;
}

/// Sum of the triangular weights of half-width `radius`: `((div + 1) >> 1)^2`
/// with `div = 2 * radius + 1`.
#[inline]
pub fn kernel_divisor(radius: usize) -> u64 {
    let div = radius as u64 * 2 + 1;
    ((div + 1) >> 1) * ((div + 1) >> 1)
}

/// Radius ceiling shared by the wide accumulators.
///
/// Beyond it a single window slot ring would need gigabytes per line.
const WIDE_MAX_RADIUS: usize = 1 << 23;

impl BlurComponent for u8 {
    type Sum = i32;
    type WideSum = i64;
}

impl BlurComponent for u16 {
    type Sum = i64;
    type WideSum = i64;
}

impl BlurComponent for f32 {
    type Sum = f32;
    type WideSum = f64;
}

// ============================================================================
// 8-bit (u8) - 32-bit integer accumulator, 64-bit for large radii
// ============================================================================

impl BlurSum<u8> for i32 {
    // 255 * 2901^2 still fits in an i32
    const MAX_RADIUS: usize = 2900;

    #[inline]
    fn from_component(value: u8) -> i32 {
        i32::from(value)
    }

    fn normalizer(radius: usize) -> i32 {
        let radius = radius.min(<Self as BlurSum<u8>>::MAX_RADIUS);
        i32::try_from(kernel_divisor(radius)).unwrap_or(i32::MAX)
    }

    #[inline]
    fn normalize(sum: i32, normalizer: i32) -> i32 {
        sum / normalizer
    }

    #[inline]
    fn to_component(value: i32) -> u8 {
        value.clamp(0, i32::from(u8::MAX)) as u8
    }
}

impl BlurSum<u8> for i64 {
    const MAX_RADIUS: usize = WIDE_MAX_RADIUS;

    #[inline]
    fn from_component(value: u8) -> i64 {
        i64::from(value)
    }

    fn normalizer(radius: usize) -> i64 {
        let radius = radius.min(<Self as BlurSum<u8>>::MAX_RADIUS);
        i64::try_from(kernel_divisor(radius)).unwrap_or(i64::MAX)
    }

    #[inline]
    fn normalize(sum: i64, normalizer: i64) -> i64 {
        sum / normalizer
    }

    #[inline]
    fn to_component(value: i64) -> u8 {
        value.clamp(0, i64::from(u8::MAX)) as u8
    }
}

// ============================================================================
// 16-bit (u16) - 64-bit integer accumulator
// ============================================================================

impl BlurSum<u16> for i64 {
    const MAX_RADIUS: usize = WIDE_MAX_RADIUS;

    #[inline]
    fn from_component(value: u16) -> i64 {
        i64::from(value)
    }

    fn normalizer(radius: usize) -> i64 {
        let radius = radius.min(<Self as BlurSum<u16>>::MAX_RADIUS);
        i64::try_from(kernel_divisor(radius)).unwrap_or(i64::MAX)
    }

    #[inline]
    fn normalize(sum: i64, normalizer: i64) -> i64 {
        sum / normalizer
    }

    #[inline]
    fn to_component(value: i64) -> u16 {
        value.clamp(0, i64::from(u16::MAX)) as u16
    }
}

// ============================================================================
// Float (f32) - same-width float accumulator, f64 for large radii
// ============================================================================

impl BlurSum<f32> for f32 {
    // (radius + 1)^2 stays exactly representable in the 24-bit mantissa
    const MAX_RADIUS: usize = 4095;

    #[inline]
    fn from_component(value: f32) -> f32 {
        value
    }

    fn normalizer(radius: usize) -> f32 {
        let radius = radius.min(<Self as BlurSum<f32>>::MAX_RADIUS);
        1.0 / kernel_divisor(radius) as f32
    }

    #[inline]
    fn normalize(sum: f32, normalizer: f32) -> f32 {
        sum * normalizer
    }

    #[inline]
    fn to_component(value: f32) -> f32 {
        value
    }
}

// Window sums keep 29 more mantissa bits than f32, so constant lines come
// back exactly after rounding to f32.
impl BlurSum<f32> for f64 {
    const MAX_RADIUS: usize = WIDE_MAX_RADIUS;

    #[inline]
    fn from_component(value: f32) -> f64 {
        f64::from(value)
    }

    fn normalizer(radius: usize) -> f64 {
        let radius = radius.min(<Self as BlurSum<f32>>::MAX_RADIUS);
        1.0 / kernel_divisor(radius) as f64
    }

    #[inline]
    fn normalize(sum: f64, normalizer: f64) -> f64 {
        sum * normalizer
    }

    #[inline]
    fn to_component(value: f64) -> f32 {
        value as f32
    }
}

/// Zeroed `(height, width, channels)` accumulator buffer for the horizontal pass.
pub fn alloc_scratch<S: Copy + Zero>(
    height: usize,
    width: usize,
    channels: usize,
) -> Result<Array3<S>, BlurError> {
    let len = element_count("scratch buffer", width, height, channels)?;
    let data = try_filled_vec(len, S::zero(), "scratch buffer")?;
    Ok(Array3::from_shape_vec((height, width, channels), data)?)
}
