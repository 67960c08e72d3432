//! PPM family: P1/P4 (PBM bitmap), P2/P5 (PGM grayscale), P3/P6 (PPM color).
//!
//! Plain variants (P1-P3) carry whitespace-separated ASCII samples; raw
//! variants (P4-P6) carry binary samples after a single whitespace byte.
//! Decode always yields an RGB [`PixelBuffer`](crate::PixelBuffer) —
//! grayscale and bitmap inputs are promoted to three identical channels.

mod decode;
mod encode;

pub(crate) use decode::parse_header;

use crate::buffer::PixelBuffer;
use crate::error::RasterError;
use crate::limits::Limits;
use alloc::vec::Vec;
use enough::Stop;

/// Which PPM-family variant.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PpmFormat {
    /// P1 — plain (ASCII) bitmap.
    PlainBitmap,
    /// P2 — plain (ASCII) grayscale.
    PlainGray,
    /// P3 — plain (ASCII) RGB.
    PlainPixmap,
    /// P4 — raw (binary, bit-packed) bitmap.
    RawBitmap,
    /// P5 — raw (binary) grayscale.
    RawGray,
    /// P6 — raw (binary) RGB.
    RawPixmap,
}

impl PpmFormat {
    /// The two-byte magic token for this variant.
    pub fn magic(self) -> &'static str {
        match self {
            PpmFormat::PlainBitmap => "P1",
            PpmFormat::PlainGray => "P2",
            PpmFormat::PlainPixmap => "P3",
            PpmFormat::RawBitmap => "P4",
            PpmFormat::RawGray => "P5",
            PpmFormat::RawPixmap => "P6",
        }
    }

    pub(crate) fn from_magic(magic: &[u8]) -> Option<Self> {
        match magic {
            b"P1" => Some(PpmFormat::PlainBitmap),
            b"P2" => Some(PpmFormat::PlainGray),
            b"P3" => Some(PpmFormat::PlainPixmap),
            b"P4" => Some(PpmFormat::RawBitmap),
            b"P5" => Some(PpmFormat::RawGray),
            b"P6" => Some(PpmFormat::RawPixmap),
            _ => None,
        }
    }

    /// Whether samples are ASCII decimals rather than binary.
    pub fn is_plain(self) -> bool {
        matches!(
            self,
            PpmFormat::PlainBitmap | PpmFormat::PlainGray | PpmFormat::PlainPixmap
        )
    }

    /// Whether this is a bitmap (PBM) variant with an implicit maxval of 1.
    pub fn is_bitmap(self) -> bool {
        matches!(self, PpmFormat::PlainBitmap | PpmFormat::RawBitmap)
    }

    /// Channels stored in the file (the decoded buffer is always 3).
    pub(crate) fn file_channels(self) -> usize {
        match self {
            PpmFormat::PlainPixmap | PpmFormat::RawPixmap => 3,
            _ => 1,
        }
    }
}

/// Parsed PPM header (internal).
pub(crate) struct PpmHeader {
    pub format: PpmFormat,
    pub width: u32,
    pub height: u32,
    pub maxval: u16,
    /// Byte offset of the first sample.
    pub data_offset: usize,
}

/// Decode PPM bytes (called from DecodeRequest).
pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<PixelBuffer, RasterError> {
    let header = decode::parse_header(data)?;

    if let Some(limits) = limits {
        limits.check(header.width, header.height)?;
    }

    stop.check()?;
    decode::decode_samples(data, &header, stop)
}

/// Encode a buffer to PPM bytes (called from EncodeRequest).
pub(crate) fn encode(
    buffer: &PixelBuffer,
    format: PpmFormat,
    stop: &dyn Stop,
) -> Result<Vec<u8>, RasterError> {
    encode::encode_ppm(buffer, format, stop)
}
