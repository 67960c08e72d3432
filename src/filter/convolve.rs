//! Square-kernel convolution with selectable edge policy, plus the Sobel
//! gradient filter.

use alloc::format;
use alloc::vec;
use alloc::vec::Vec;
use enough::Stop;

use super::STOP_STRIDE;
use crate::buffer::{CHANNELS, PixelBuffer, bt601_luma};
use crate::error::RasterError;

/// How out-of-bounds neighbor reads resolve during convolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgePolicy {
    /// Read the nearest in-bounds pixel.
    #[default]
    Clamp,
    /// Wrap around toroidally.
    Wrap,
    /// Treat out-of-bounds as black.
    Zero,
}

/// A square convolution kernel: odd-sized weight matrix (row-major),
/// divisor, and additive offset.
///
/// Constructed values are always valid; [`Kernel::new`] rejects even sizes,
/// mismatched weight counts, and a zero divisor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Kernel {
    size: usize,
    weights: Vec<i32>,
    divisor: i32,
    offset: i32,
}

impl Kernel {
    pub fn new(
        size: usize,
        weights: Vec<i32>,
        divisor: i32,
        offset: i32,
    ) -> Result<Self, RasterError> {
        let kernel = Self {
            size,
            weights,
            divisor,
            offset,
        };
        kernel.validate()?;
        Ok(kernel)
    }

    pub(crate) fn validate(&self) -> Result<(), RasterError> {
        if self.size == 0 || self.size % 2 == 0 {
            return Err(RasterError::InvalidParameter(format!(
                "kernel size {} must be odd",
                self.size
            )));
        }
        if self.weights.len() != self.size * self.size {
            return Err(RasterError::InvalidParameter(format!(
                "kernel needs {} weights, got {}",
                self.size * self.size,
                self.weights.len()
            )));
        }
        if self.divisor == 0 {
            return Err(RasterError::InvalidParameter(
                "kernel divisor must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// 3x3 box blur: all weights 1, divisor 9.
    pub fn box_blur() -> Self {
        Self {
            size: 3,
            weights: vec![1; 9],
            divisor: 9,
            offset: 0,
        }
    }

    /// 3x3 sharpen: center 9, neighbors -1.
    pub fn sharpen() -> Self {
        Self {
            size: 3,
            weights: vec![-1, -1, -1, -1, 9, -1, -1, -1, -1],
            divisor: 1,
            offset: 0,
        }
    }

    /// 3x3 Laplacian edge detect: center 8, neighbors -1.
    pub fn edge_detect() -> Self {
        Self {
            size: 3,
            weights: vec![-1, -1, -1, -1, 8, -1, -1, -1, -1],
            divisor: 1,
            offset: 0,
        }
    }

    /// 3x3 directional emboss, biased to mid-gray.
    pub fn emboss(maxval: u16) -> Self {
        Self {
            size: 3,
            weights: vec![-2, -1, 0, -1, 1, 1, 0, 1, 2],
            divisor: 1,
            offset: i32::from(maxval / 2),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn weights(&self) -> &[i32] {
        &self.weights
    }

    pub fn divisor(&self) -> i32 {
        self.divisor
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }
}

/// Round-to-nearest signed division (ties away from zero).
fn div_round(n: i64, d: i64) -> i64 {
    if (n < 0) == (d < 0) {
        (n + d / 2) / d
    } else {
        (n - d / 2) / d
    }
}

fn resolve(coord: i64, len: i64, policy: EdgePolicy) -> Option<i64> {
    if 0 <= coord && coord < len {
        return Some(coord);
    }
    match policy {
        EdgePolicy::Clamp => Some(coord.clamp(0, len - 1)),
        EdgePolicy::Wrap => Some(coord.rem_euclid(len)),
        EdgePolicy::Zero => None,
    }
}

pub(crate) fn convolve(
    input: &PixelBuffer,
    kernel: &Kernel,
    edge: EdgePolicy,
    stop: &dyn Stop,
) -> Result<PixelBuffer, RasterError> {
    let w = i64::from(input.width());
    let h = i64::from(input.height());
    let maxval = i64::from(input.maxval());
    let size = kernel.size as i64;
    let r = size / 2;
    let samples = input.samples();
    // Double-buffered by construction: every read comes from the pre-filter
    // samples and every write goes to `out`, so no read-after-write hazard.
    let mut out = Vec::with_capacity(samples.len());

    for y in 0..h {
        if y % STOP_STRIDE as i64 == 0 {
            stop.check()?;
        }
        for x in 0..w {
            let mut acc = [0i64; CHANNELS];
            for ky in 0..size {
                for kx in 0..size {
                    let weight = i64::from(kernel.weights[(ky * size + kx) as usize]);
                    if weight == 0 {
                        continue;
                    }
                    let (Some(sy), Some(sx)) = (
                        resolve(y + ky - r, h, edge),
                        resolve(x + kx - r, w, edge),
                    ) else {
                        continue;
                    };
                    let off = ((sy * w + sx) as usize) * CHANNELS;
                    for (c, a) in acc.iter_mut().enumerate() {
                        *a += weight * i64::from(samples[off + c]);
                    }
                }
            }
            for a in acc {
                let v = div_round(a, i64::from(kernel.divisor)) + i64::from(kernel.offset);
                out.push(v.clamp(0, maxval) as u16);
            }
        }
    }
    Ok(input.reshaped(out))
}

const SOBEL_X: [i64; 9] = [-1, 0, 1, -2, 0, 2, -1, 0, 1];
const SOBEL_Y: [i64; 9] = [-1, -2, -1, 0, 0, 0, 1, 2, 1];

/// Sobel gradient magnitude over the BT.601 luma plane, replicated to all
/// three channels. Out-of-bounds neighbors contribute nothing.
pub(crate) fn sobel(input: &PixelBuffer, stop: &dyn Stop) -> Result<PixelBuffer, RasterError> {
    let w = i64::from(input.width());
    let h = i64::from(input.height());
    let maxval = i64::from(input.maxval());

    let mut luma = Vec::with_capacity((w * h) as usize);
    for px in input.samples().chunks_exact(CHANNELS) {
        luma.push(i64::from(bt601_luma(px[0], px[1], px[2])));
    }

    let mut out = Vec::with_capacity(input.samples().len());
    for y in 0..h {
        if y % STOP_STRIDE as i64 == 0 {
            stop.check()?;
        }
        for x in 0..w {
            let mut gx = 0i64;
            let mut gy = 0i64;
            for ky in -1..=1i64 {
                for kx in -1..=1i64 {
                    let sy = y + ky;
                    let sx = x + kx;
                    if sy < 0 || sy >= h || sx < 0 || sx >= w {
                        continue;
                    }
                    let v = luma[(sy * w + sx) as usize];
                    let i = ((ky + 1) * 3 + (kx + 1)) as usize;
                    gx += v * SOBEL_X[i];
                    gy += v * SOBEL_Y[i];
                }
            }
            let mag = (((gx * gx + gy * gy) as u64).isqrt() as i64).clamp(0, maxval) as u16;
            out.extend_from_slice(&[mag, mag, mag]);
        }
    }
    Ok(input.reshaped(out))
}
