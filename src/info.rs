use crate::error::RasterError;
use crate::ppm::{self, PpmFormat};

/// Image metadata probed from the header, without decoding sample data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub maxval: u16,
    pub format: PpmFormat,
}

impl ImageInfo {
    /// Parse just the header of `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self, RasterError> {
        let header = ppm::parse_header(data)?;
        Ok(Self {
            width: header.width,
            height: header.height,
            maxval: header.maxval,
            format: header.format,
        })
    }
}
