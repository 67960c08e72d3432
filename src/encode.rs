use alloc::vec::Vec;
use enough::Stop;

use crate::buffer::PixelBuffer;
use crate::error::RasterError;
use crate::ppm::PpmFormat;

/// Encode request builder.
#[derive(Clone, Copy, Debug)]
pub struct EncodeRequest {
    format: PpmFormat,
}

impl EncodeRequest {
    /// Encode to the given PPM-family variant. P3 and P6 round-trip any
    /// buffer bit-exactly; P2/P5 reduce to luma; P1/P4 require
    /// binary-valued buffers.
    pub fn ppm(format: PpmFormat) -> Self {
        Self { format }
    }

    pub fn encode(&self, buffer: &PixelBuffer, stop: impl Stop) -> Result<Vec<u8>, RasterError> {
        crate::ppm::encode(buffer, self.format, &stop)
    }
}
