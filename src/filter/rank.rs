//! Rank filters: median, and binary dilation/erosion.
//!
//! These take order statistics over a window rather than weighted sums:
//! dilation is a windowed maximum, erosion a windowed minimum, median the
//! middle value.

use alloc::format;
use alloc::vec::Vec;
use enough::Stop;

use super::STOP_STRIDE;
use crate::buffer::{CHANNELS, PixelBuffer};
use crate::error::RasterError;

/// Morphology footprint: a rectangular mask of active cells, anchored at
/// its center cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuringElement {
    width: usize,
    height: usize,
    mask: Vec<bool>,
}

impl StructuringElement {
    pub fn new(width: usize, height: usize, mask: Vec<bool>) -> Result<Self, RasterError> {
        let element = Self {
            width,
            height,
            mask,
        };
        element.validate()?;
        Ok(element)
    }

    /// A fully-active `size` x `size` square.
    pub fn square(size: usize) -> Result<Self, RasterError> {
        Self::new(size, size, alloc::vec![true; size * size])
    }

    pub(crate) fn validate(&self) -> Result<(), RasterError> {
        if self.width == 0 || self.height == 0 {
            return Err(RasterError::InvalidParameter(
                "structuring element must be non-empty".into(),
            ));
        }
        if self.mask.len() != self.width * self.height {
            return Err(RasterError::InvalidParameter(format!(
                "structuring element needs {} cells, got {}",
                self.width * self.height,
                self.mask.len()
            )));
        }
        if !self.mask.iter().any(|&m| m) {
            return Err(RasterError::InvalidParameter(
                "structuring element has no active cells".into(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_window(size: usize) -> Result<(), RasterError> {
    if size == 0 || size % 2 == 0 {
        return Err(RasterError::InvalidParameter(format!(
            "median window {size} must be odd"
        )));
    }
    Ok(())
}

/// Per-channel median. Border pixels use the smaller in-bounds window, so
/// the window is never empty.
pub(crate) fn median(
    input: &PixelBuffer,
    size: usize,
    stop: &dyn Stop,
) -> Result<PixelBuffer, RasterError> {
    let w = i64::from(input.width());
    let h = i64::from(input.height());
    let r = (size / 2) as i64;
    let samples = input.samples();
    let mut out = Vec::with_capacity(samples.len());
    let mut window: [Vec<u16>; CHANNELS] =
        core::array::from_fn(|_| Vec::with_capacity(size * size));

    for y in 0..h {
        if y % STOP_STRIDE as i64 == 0 {
            stop.check()?;
        }
        for x in 0..w {
            for values in window.iter_mut() {
                values.clear();
            }
            for ny in (y - r)..=(y + r) {
                if ny < 0 || ny >= h {
                    continue;
                }
                for nx in (x - r)..=(x + r) {
                    if nx < 0 || nx >= w {
                        continue;
                    }
                    let off = ((ny * w + nx) as usize) * CHANNELS;
                    for (c, values) in window.iter_mut().enumerate() {
                        values.push(samples[off + c]);
                    }
                }
            }
            for values in window.iter_mut() {
                values.sort_unstable();
                out.push(values[values.len() / 2]);
            }
        }
    }
    Ok(input.reshaped(out))
}

pub(crate) fn dilate(
    input: &PixelBuffer,
    element: &StructuringElement,
    stop: &dyn Stop,
) -> Result<PixelBuffer, RasterError> {
    morphology(input, element, stop, false)
}

pub(crate) fn erode(
    input: &PixelBuffer,
    element: &StructuringElement,
    stop: &dyn Stop,
) -> Result<PixelBuffer, RasterError> {
    morphology(input, element, stop, true)
}

/// Shared dilate/erode walk. Reads the first channel only — morphology is
/// meant for binary images where the channels are equal (e.g. after
/// [`Filter::Threshold`](crate::Filter::Threshold)) — and writes gray
/// triples.
fn morphology(
    input: &PixelBuffer,
    element: &StructuringElement,
    stop: &dyn Stop,
    erode: bool,
) -> Result<PixelBuffer, RasterError> {
    let w = i64::from(input.width());
    let h = i64::from(input.height());
    let maxval = input.maxval();
    let ew = element.width as i64;
    let eh = element.height as i64;
    let cx = ew / 2;
    let cy = eh / 2;
    let samples = input.samples();
    let mut out = Vec::with_capacity(samples.len());

    for y in 0..h {
        if y % STOP_STRIDE as i64 == 0 {
            stop.check()?;
        }
        for x in 0..w {
            let mut v: u16 = if erode { maxval } else { 0 };
            for ey in 0..eh {
                for ex in 0..ew {
                    if !element.mask[(ey * ew + ex) as usize] {
                        continue;
                    }
                    let ny = y + ey - cy;
                    let nx = x + ex - cx;
                    if ny < 0 || ny >= h || nx < 0 || nx >= w {
                        // An active cell hanging off the image erodes to
                        // background; dilation ignores it.
                        if erode {
                            v = 0;
                        }
                        continue;
                    }
                    let s = samples[((ny * w + nx) as usize) * CHANNELS];
                    v = if erode { v.min(s) } else { v.max(s) };
                }
            }
            out.extend_from_slice(&[v, v, v]);
        }
    }
    Ok(input.reshaped(out))
}
