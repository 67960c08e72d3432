//! Owned RGB raster buffer.

use alloc::vec::Vec;

use crate::error::RasterError;

/// Interleaved channels per pixel. Grayscale and bitmap inputs are promoted
/// to three channels on decode, so everything downstream sees RGB.
pub(crate) const CHANNELS: usize = 3;

/// Integer BT.601 luma, rounded to nearest.
pub(crate) fn bt601_luma(r: u16, g: u16, b: u16) -> u16 {
    ((u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114 + 500) / 1000) as u16
}

/// In-memory raster: interleaved RGB samples with an explicit maxval.
///
/// Samples are row-major, top-to-bottom, left-to-right, three per pixel.
/// `maxval` follows the PPM convention: it is both the largest legal sample
/// value and the value that renders at full intensity. Invariants held at
/// all times: `samples.len() == width * height * 3` and every sample is
/// `<= maxval`.
///
/// A `PixelBuffer` is a plain value: `clone` gives an independent copy with
/// no shared storage, and nothing in this crate aliases one across stages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    maxval: u16,
    samples: Vec<u16>,
}

impl PixelBuffer {
    /// Build a buffer from raw samples, validating every invariant.
    pub fn new(
        width: u32,
        height: u32,
        maxval: u16,
        samples: Vec<u16>,
    ) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidParameter(alloc::format!(
                "buffer dimensions must be positive, got {width}x{height}"
            )));
        }
        if maxval == 0 {
            return Err(RasterError::InvalidParameter(
                "maxval must be at least 1".into(),
            ));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(CHANNELS))
            .ok_or(RasterError::DimensionsTooLarge { width, height })?;
        if samples.len() != expected {
            return Err(RasterError::InvalidParameter(alloc::format!(
                "sample count {} does not match {width}x{height}x3",
                samples.len()
            )));
        }
        if let Some(&bad) = samples.iter().find(|&&s| s > maxval) {
            return Err(RasterError::InvalidParameter(alloc::format!(
                "sample value {bad} exceeds maxval {maxval}"
            )));
        }
        Ok(Self {
            width,
            height,
            maxval,
            samples,
        })
    }

    /// A buffer with every pixel set to `rgb`.
    pub fn filled(
        width: u32,
        height: u32,
        maxval: u16,
        rgb: [u16; 3],
    ) -> Result<Self, RasterError> {
        let px = (width as usize)
            .checked_mul(height as usize)
            .ok_or(RasterError::DimensionsTooLarge { width, height })?;
        let mut samples = Vec::with_capacity(px.saturating_mul(CHANNELS));
        for _ in 0..px {
            samples.extend_from_slice(&rgb);
        }
        Self::new(width, height, maxval, samples)
    }

    /// Construct without re-validating samples. Callers must guarantee the
    /// invariants (decode and filter paths produce clamped output by
    /// construction).
    pub(crate) fn from_raw(width: u32, height: u32, maxval: u16, samples: Vec<u16>) -> Self {
        debug_assert_eq!(
            samples.len(),
            width as usize * height as usize * CHANNELS,
            "sample count mismatch"
        );
        debug_assert!(samples.iter().all(|&s| s <= maxval));
        Self {
            width,
            height,
            maxval,
            samples,
        }
    }

    /// A fresh buffer with the same shape and maxval as `self`.
    pub(crate) fn reshaped(&self, samples: Vec<u16>) -> Self {
        Self::from_raw(self.width, self.height, self.maxval, samples)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn maxval(&self) -> u16 {
        self.maxval
    }

    /// Flat sample data, `width * height * 3` entries.
    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// Consume the buffer, returning its sample storage.
    pub fn into_samples(self) -> Vec<u16> {
        self.samples
    }

    pub(crate) fn pixel_offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    fn bounds_check(&self, x: u32, y: u32) -> Result<(), RasterError> {
        if x >= self.width || y >= self.height {
            return Err(RasterError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Read the pixel at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> Result<[u16; 3], RasterError> {
        self.bounds_check(x, y)?;
        let off = self.pixel_offset(x, y);
        Ok([
            self.samples[off],
            self.samples[off + 1],
            self.samples[off + 2],
        ])
    }

    /// Write the pixel at `(x, y)`. Channel values above maxval are rejected,
    /// not clamped: clamping is a filter-arithmetic concern, never a storage
    /// one.
    pub fn set(&mut self, x: u32, y: u32, rgb: [u16; 3]) -> Result<(), RasterError> {
        self.bounds_check(x, y)?;
        if let Some(&bad) = rgb.iter().find(|&&s| s > self.maxval) {
            return Err(RasterError::InvalidParameter(alloc::format!(
                "channel value {bad} exceeds maxval {}",
                self.maxval
            )));
        }
        let off = self.pixel_offset(x, y);
        self.samples[off..off + CHANNELS].copy_from_slice(&rgb);
        Ok(())
    }

    /// View sample data as typed RGB pixels.
    #[cfg(feature = "rgb")]
    pub fn as_rgb(&self) -> &[rgb::RGB<u16>] {
        use rgb::FromSlice;
        self.samples.as_rgb()
    }

    /// Zero-copy 2D view over typed RGB pixels.
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> imgref::ImgRef<'_, rgb::RGB<u16>> {
        imgref::ImgRef::new(self.as_rgb(), self.width as usize, self.height as usize)
    }
}
