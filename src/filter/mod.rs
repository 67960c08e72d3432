//! Pixel transforms: point-wise filters, convolutions, and rank filters.
//!
//! Every filter is a pure function from one [`PixelBuffer`] to a fresh one;
//! parameters live in the [`Filter`] descriptor, never in mutable state.
//! Shared numeric policy: intermediate arithmetic is widened (i64/f64),
//! results are rounded to nearest and clamped into `[0, maxval]` — never
//! wrapped.

mod convolve;
mod point;
mod rank;

pub use convolve::{EdgePolicy, Kernel};
pub use rank::StructuringElement;

use alloc::format;
use enough::Stop;

use crate::buffer::PixelBuffer;
use crate::error::RasterError;

/// Rows processed between cancellation checks.
pub(crate) const STOP_STRIDE: usize = 16;

/// A filter descriptor: variant tag plus parameters, no retained state.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// BT.601 luma replicated to all three channels.
    Grayscale,
    /// `contrast * (v - maxval/2) + maxval/2 + brightness`, clamped.
    /// `contrast` 1.0 and `brightness` 0.0 leave the image unchanged.
    BrightnessContrast { brightness: f32, contrast: f32 },
    /// Luma at or above `level` maps to maxval, everything else to 0.
    Threshold { level: u16 },
    /// Output channel `i` takes input channel `permutation[i]`.
    ChannelSwap { permutation: [usize; 3] },
    /// Square convolution kernel applied independently per channel.
    Convolution { kernel: Kernel, edge: EdgePolicy },
    /// Per-channel median over the in-bounds neighborhood.
    Median { size: usize },
    /// Sobel gradient magnitude over the luma plane.
    Sobel,
    /// Binary dilation: windowed maximum under the structuring element.
    Dilate { element: StructuringElement },
    /// Binary erosion: windowed minimum; out-of-bounds reads as background.
    Erode { element: StructuringElement },
}

impl Filter {
    /// Check parameters against their constraints and the target maxval.
    pub fn validate(&self, maxval: u16) -> Result<(), RasterError> {
        match self {
            Filter::Grayscale | Filter::Sobel => Ok(()),
            Filter::BrightnessContrast {
                brightness,
                contrast,
            } => {
                if !brightness.is_finite() || !contrast.is_finite() {
                    return Err(RasterError::InvalidParameter(
                        "brightness and contrast must be finite".into(),
                    ));
                }
                if *contrast < 0.0 {
                    return Err(RasterError::InvalidParameter(format!(
                        "contrast must be non-negative, got {contrast}"
                    )));
                }
                Ok(())
            }
            Filter::Threshold { level } => {
                if *level > maxval {
                    return Err(RasterError::InvalidParameter(format!(
                        "threshold level {level} exceeds maxval {maxval}"
                    )));
                }
                Ok(())
            }
            Filter::ChannelSwap { permutation } => {
                let mut seen = [false; 3];
                for &c in permutation {
                    if c > 2 || seen[c] {
                        return Err(RasterError::InvalidParameter(format!(
                            "channel permutation {permutation:?} is not a bijection on {{0, 1, 2}}"
                        )));
                    }
                    seen[c] = true;
                }
                Ok(())
            }
            Filter::Convolution { kernel, .. } => kernel.validate(),
            Filter::Median { size } => rank::validate_window(*size),
            Filter::Dilate { element } | Filter::Erode { element } => element.validate(),
        }
    }

    /// Apply this filter to `input`, producing a fresh buffer. The input is
    /// never mutated.
    pub fn apply(&self, input: &PixelBuffer, stop: impl Stop) -> Result<PixelBuffer, RasterError> {
        self.apply_with(input, &stop)
    }

    pub(crate) fn apply_with(
        &self,
        input: &PixelBuffer,
        stop: &dyn Stop,
    ) -> Result<PixelBuffer, RasterError> {
        self.validate(input.maxval())?;
        match self {
            Filter::Grayscale => point::grayscale(input, stop),
            Filter::BrightnessContrast {
                brightness,
                contrast,
            } => point::brightness_contrast(input, *brightness, *contrast, stop),
            Filter::Threshold { level } => point::threshold(input, *level, stop),
            Filter::ChannelSwap { permutation } => point::channel_swap(input, *permutation, stop),
            Filter::Convolution { kernel, edge } => convolve::convolve(input, kernel, *edge, stop),
            Filter::Median { size } => rank::median(input, *size, stop),
            Filter::Sobel => convolve::sobel(input, stop),
            Filter::Dilate { element } => rank::dilate(input, element, stop),
            Filter::Erode { element } => rank::erode(input, element, stop),
        }
    }
}
