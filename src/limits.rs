use alloc::format;

use crate::buffer::CHANNELS;
use crate::error::RasterError;

/// Decoded storage cost per pixel: three u16 samples.
const BYTES_PER_PIXEL: u64 = CHANNELS as u64 * 2;

/// Resource limits for decode operations.
///
/// All fields default to `None` (no limit). Limits are checked against the
/// parsed header before any sample storage is allocated, so a hostile header
/// cannot trigger a large allocation. Every decoded image is stored as
/// width x height RGB pixels of u16 samples, so `max_memory_bytes` bounds
/// `width * height * 6`.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes of decoded sample storage.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Check declared dimensions against every configured limit, including
    /// the memory the decoded buffer would need.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), RasterError> {
        if let Some(max) = self.max_width {
            if u64::from(width) > max {
                return Err(exceeded("width", u64::from(width), max));
            }
        }
        if let Some(max) = self.max_height {
            if u64::from(height) > max {
                return Err(exceeded("height", u64::from(height), max));
            }
        }
        let pixels = u64::from(width) * u64::from(height);
        if let Some(max) = self.max_pixels {
            if pixels > max {
                return Err(exceeded("pixel count", pixels, max));
            }
        }
        if let Some(max) = self.max_memory_bytes {
            let bytes = pixels.saturating_mul(BYTES_PER_PIXEL);
            if bytes > max {
                return Err(exceeded("decoded sample storage bytes", bytes, max));
            }
        }
        Ok(())
    }
}

fn exceeded(what: &str, value: u64, max: u64) -> RasterError {
    RasterError::LimitExceeded(format!("{what} {value} exceeds limit {max}"))
}
