use enough::Stop;

use crate::buffer::PixelBuffer;
use crate::error::RasterError;
use crate::limits::Limits;

/// Decode request builder.
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, limits: None }
    }

    /// Reject images whose declared dimensions exceed `limits` before any
    /// sample storage is allocated.
    #[must_use]
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Decode to an RGB [`PixelBuffer`]. Grayscale and bitmap variants are
    /// promoted to three identical channels.
    pub fn decode(self, stop: impl Stop) -> Result<PixelBuffer, RasterError> {
        crate::ppm::decode(self.data, self.limits, &stop)
    }
}
