//! Point-wise filters: each output pixel depends only on its own input
//! pixel, so these could run in place — they still return a fresh buffer to
//! keep the pipeline contract uniform.

use alloc::vec::Vec;
use enough::Stop;

use super::STOP_STRIDE;
use crate::buffer::{CHANNELS, PixelBuffer, bt601_luma};
use crate::error::RasterError;

/// Run `f` over each pixel, checking `stop` every [`STOP_STRIDE`] rows.
fn map_pixels(
    input: &PixelBuffer,
    stop: &dyn Stop,
    mut f: impl FnMut(&[u16], &mut Vec<u16>),
) -> Result<PixelBuffer, RasterError> {
    let row_samples = input.width() as usize * CHANNELS;
    let mut out = Vec::with_capacity(input.samples().len());
    for (y, row) in input.samples().chunks_exact(row_samples).enumerate() {
        if y % STOP_STRIDE == 0 {
            stop.check()?;
        }
        for px in row.chunks_exact(CHANNELS) {
            f(px, &mut out);
        }
    }
    Ok(input.reshaped(out))
}

/// Round to nearest and clamp into `[0, maxval]`.
///
/// `as` casts saturate, so adding 0.5 before the cast implements
/// round-to-nearest for every value that survives the clamp.
fn clamp_round(v: f64, maxval: u16) -> u16 {
    ((v + 0.5) as i64).clamp(0, i64::from(maxval)) as u16
}

pub(crate) fn grayscale(
    input: &PixelBuffer,
    stop: &dyn Stop,
) -> Result<PixelBuffer, RasterError> {
    map_pixels(input, stop, |px, out| {
        let y = bt601_luma(px[0], px[1], px[2]);
        out.extend_from_slice(&[y, y, y]);
    })
}

pub(crate) fn brightness_contrast(
    input: &PixelBuffer,
    brightness: f32,
    contrast: f32,
    stop: &dyn Stop,
) -> Result<PixelBuffer, RasterError> {
    let maxval = input.maxval();
    let mid = f64::from(maxval) / 2.0;
    let b = f64::from(brightness);
    let c = f64::from(contrast);
    map_pixels(input, stop, |px, out| {
        for &s in px {
            out.push(clamp_round(c * (f64::from(s) - mid) + mid + b, maxval));
        }
    })
}

pub(crate) fn threshold(
    input: &PixelBuffer,
    level: u16,
    stop: &dyn Stop,
) -> Result<PixelBuffer, RasterError> {
    let maxval = input.maxval();
    map_pixels(input, stop, |px, out| {
        let v = if bt601_luma(px[0], px[1], px[2]) >= level {
            maxval
        } else {
            0
        };
        out.extend_from_slice(&[v, v, v]);
    })
}

pub(crate) fn channel_swap(
    input: &PixelBuffer,
    permutation: [usize; 3],
    stop: &dyn Stop,
) -> Result<PixelBuffer, RasterError> {
    map_pixels(input, stop, |px, out| {
        out.extend_from_slice(&[px[permutation[0]], px[permutation[1]], px[permutation[2]]]);
    })
}
