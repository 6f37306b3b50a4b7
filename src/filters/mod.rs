//! Blur filters over interleaved rasters.
//!
//! ## Supported Formats
//!
//! | Format | Shape | Type | Accumulator |
//! |--------|-------|------|-------------|
//! | Grayscale8 | (H, W, 1) | u8 | i32 (i64 above radius 2900) |
//! | RGB8 | (H, W, 3) | u8 | i32 (i64 above radius 2900) |
//! | RGBA8 | (H, W, 4) | u8 | i32 (i64 above radius 2900) |
//! | Grayscale16 / RGB16 / RGBA16 | (H, W, 1/3/4) | u16 | i64 |
//! | Grayscale / RGB / RGBA float | (H, W, 1/3/4) | f32 | f32 (f64 above radius 4095) |
//!
//! Any [`crate::raster::PixelBuffer`] can be blurred, including padded
//! [`crate::raster::Surface`]s in BGRA/ARGB/XRGB orders and single-channel
//! views into them.
//!
//! ## Modules
//!
//! - [`core`] - component kinds, accumulators and scratch allocation
//! - [`blur`] - the stack blur engine and its typed entry points

pub mod core;
pub mod blur;
