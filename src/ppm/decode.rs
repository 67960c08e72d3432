//! PPM header parsing and sample decoding.

use alloc::format;
use alloc::vec::Vec;
use enough::Stop;

use super::{PpmFormat, PpmHeader};
use crate::buffer::{CHANNELS, PixelBuffer};
use crate::error::RasterError;

fn is_ppm_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Cursor over header bytes and plain sample data. Skips comments (`#` to
/// end of line) wherever whitespace is permitted.
struct Scanner<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    fn skip_separators(&mut self) {
        while self.pos < self.data.len() {
            let b = self.data[self.pos];
            if is_ppm_whitespace(b) {
                self.pos += 1;
            } else if b == b'#' {
                while self.pos < self.data.len() && self.data[self.pos] != b'\n' {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    /// Next whitespace-delimited decimal, or `None` at end of input.
    fn next_u32(&mut self) -> Result<Option<u32>, RasterError> {
        self.skip_separators();
        if self.pos >= self.data.len() {
            return Ok(None);
        }
        let start = self.pos;
        let mut value: u32 = 0;
        while self.pos < self.data.len() {
            let b = self.data[self.pos];
            if is_ppm_whitespace(b) || b == b'#' {
                break;
            }
            if !b.is_ascii_digit() {
                return Err(RasterError::InvalidData(format!(
                    "expected decimal digit, got byte 0x{b:02x} at offset {}",
                    self.pos
                )));
            }
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(b - b'0')))
                .ok_or_else(|| {
                    RasterError::InvalidData(format!("numeric overflow at offset {start}"))
                })?;
            self.pos += 1;
        }
        Ok(Some(value))
    }

    /// Next single bitmap digit. Plain-PBM digits may abut ("0110"), so this
    /// consumes exactly one byte after separators.
    fn next_bit(&mut self) -> Result<Option<u32>, RasterError> {
        self.skip_separators();
        if self.pos >= self.data.len() {
            return Ok(None);
        }
        let b = self.data[self.pos];
        if !b.is_ascii_digit() {
            return Err(RasterError::InvalidData(format!(
                "expected bitmap digit, got byte 0x{b:02x} at offset {}",
                self.pos
            )));
        }
        self.pos += 1;
        Ok(Some(u32::from(b - b'0')))
    }
}

fn header_field(scanner: &mut Scanner<'_>, what: &str) -> Result<u32, RasterError> {
    match scanner.next_u32() {
        Ok(Some(v)) => Ok(v),
        Ok(None) => Err(RasterError::MalformedHeader(format!(
            "unexpected end of input reading {what}"
        ))),
        Err(_) => Err(RasterError::MalformedHeader(format!("unparseable {what}"))),
    }
}

/// Parse the header: magic, width, height, maxval (implicit 1 for bitmaps).
pub(crate) fn parse_header(data: &[u8]) -> Result<PpmHeader, RasterError> {
    if data.len() < 2 {
        return Err(RasterError::MalformedHeader("missing magic token".into()));
    }
    let format = PpmFormat::from_magic(&data[..2]).ok_or_else(|| {
        RasterError::MalformedHeader(format!(
            "unrecognized magic {:?}",
            alloc::string::String::from_utf8_lossy(&data[..2])
        ))
    })?;
    if data.len() > 2 && !is_ppm_whitespace(data[2]) && data[2] != b'#' {
        return Err(RasterError::MalformedHeader(
            "magic token not followed by whitespace".into(),
        ));
    }

    let mut scanner = Scanner::new(data, 2);
    let width = header_field(&mut scanner, "width")?;
    let height = header_field(&mut scanner, "height")?;
    if width == 0 || height == 0 {
        return Err(RasterError::MalformedHeader(format!(
            "dimensions must be positive, got {width}x{height}"
        )));
    }
    let maxval = if format.is_bitmap() {
        1
    } else {
        let mv = header_field(&mut scanner, "maxval")?;
        if mv == 0 || mv > 65535 {
            return Err(RasterError::MalformedHeader(format!(
                "maxval {mv} outside [1, 65535]"
            )));
        }
        mv as u16
    };

    let data_offset = if format.is_plain() {
        scanner.pos
    } else {
        // Raw variants: exactly one whitespace byte separates the last
        // header field from the binary sample data.
        if scanner.pos >= data.len() || !is_ppm_whitespace(data[scanner.pos]) {
            return Err(RasterError::MalformedHeader(
                "raw sample data must follow a single whitespace byte".into(),
            ));
        }
        scanner.pos + 1
    };

    Ok(PpmHeader {
        format,
        width,
        height,
        maxval,
        data_offset,
    })
}

/// Decode the sample body into an RGB buffer.
pub(crate) fn decode_samples(
    data: &[u8],
    header: &PpmHeader,
    stop: &dyn Stop,
) -> Result<PixelBuffer, RasterError> {
    let w = header.width as usize;
    let h = header.height as usize;
    let too_large = || RasterError::DimensionsTooLarge {
        width: header.width,
        height: header.height,
    };
    let pixels = w.checked_mul(h).ok_or_else(too_large)?;
    let file_channels = header.format.file_channels();
    let total = pixels.checked_mul(file_channels).ok_or_else(too_large)?;
    let body = data.get(header.data_offset..).unwrap_or(&[]);

    let flat = match header.format {
        PpmFormat::PlainBitmap => {
            decode_plain_bits(data, header.data_offset, total, w, stop)?
        }
        PpmFormat::PlainGray | PpmFormat::PlainPixmap => decode_plain(
            data,
            header.data_offset,
            total,
            header.maxval,
            w * file_channels,
            stop,
        )?,
        PpmFormat::RawBitmap => decode_raw_bits(body, w, h, stop)?,
        PpmFormat::RawGray | PpmFormat::RawPixmap => {
            decode_raw(body, total, header.maxval, w * file_channels, stop)?
        }
    };

    let samples = if file_channels == CHANNELS {
        flat
    } else {
        // Promote grayscale/bitmap to three identical channels.
        let mut rgb = Vec::with_capacity(pixels * CHANNELS);
        for g in flat {
            rgb.extend_from_slice(&[g, g, g]);
        }
        rgb
    };

    Ok(PixelBuffer::from_raw(
        header.width,
        header.height,
        header.maxval,
        samples,
    ))
}

fn decode_plain(
    data: &[u8],
    offset: usize,
    total: usize,
    maxval: u16,
    row_samples: usize,
    stop: &dyn Stop,
) -> Result<Vec<u16>, RasterError> {
    let mut scanner = Scanner::new(data, offset);
    let mut out = Vec::with_capacity(total);
    let check_every = row_samples.saturating_mul(16).max(1);
    for i in 0..total {
        if i % check_every == 0 {
            stop.check()?;
        }
        let value = scanner.next_u32()?.ok_or(RasterError::TruncatedData {
            needed: total,
            actual: i,
        })?;
        if value > u32::from(maxval) {
            return Err(RasterError::SampleOutOfRange { value, maxval });
        }
        out.push(value as u16);
    }
    Ok(out)
}

fn decode_plain_bits(
    data: &[u8],
    offset: usize,
    total: usize,
    row_samples: usize,
    stop: &dyn Stop,
) -> Result<Vec<u16>, RasterError> {
    let mut scanner = Scanner::new(data, offset);
    let mut out = Vec::with_capacity(total);
    let check_every = row_samples.saturating_mul(16).max(1);
    for i in 0..total {
        if i % check_every == 0 {
            stop.check()?;
        }
        let bit = scanner.next_bit()?.ok_or(RasterError::TruncatedData {
            needed: total,
            actual: i,
        })?;
        if bit > 1 {
            return Err(RasterError::SampleOutOfRange {
                value: bit,
                maxval: 1,
            });
        }
        // PBM stores 1 = black; sample space has maxval = full intensity.
        out.push(1 - bit as u16);
    }
    Ok(out)
}

fn decode_raw_bits(
    body: &[u8],
    w: usize,
    h: usize,
    stop: &dyn Stop,
) -> Result<Vec<u16>, RasterError> {
    // One bit per pixel, MSB first, each row padded to a byte boundary.
    let row_bytes = w.div_ceil(8);
    let needed = row_bytes * h;
    if body.len() < needed {
        return Err(RasterError::TruncatedData {
            needed,
            actual: body.len(),
        });
    }
    let mut out = Vec::with_capacity(w * h);
    for y in 0..h {
        if y % 16 == 0 {
            stop.check()?;
        }
        let row = &body[y * row_bytes..(y + 1) * row_bytes];
        for x in 0..w {
            let bit = (row[x / 8] >> (7 - (x % 8))) & 1;
            out.push(1 - u16::from(bit));
        }
    }
    Ok(out)
}

fn decode_raw(
    body: &[u8],
    total: usize,
    maxval: u16,
    row_samples: usize,
    stop: &dyn Stop,
) -> Result<Vec<u16>, RasterError> {
    let bytes_per_sample = if maxval > 255 { 2 } else { 1 };
    let needed = total * bytes_per_sample;
    if body.len() < needed {
        return Err(RasterError::TruncatedData {
            needed,
            actual: body.len(),
        });
    }

    let mut out = Vec::with_capacity(total);
    let check_every = row_samples.saturating_mul(16).max(1);
    if bytes_per_sample == 1 {
        for (i, &b) in body[..total].iter().enumerate() {
            if i % check_every == 0 {
                stop.check()?;
            }
            if u16::from(b) > maxval {
                return Err(RasterError::SampleOutOfRange {
                    value: u32::from(b),
                    maxval,
                });
            }
            out.push(u16::from(b));
        }
    } else {
        for (i, pair) in body[..needed].chunks_exact(2).enumerate() {
            if i % check_every == 0 {
                stop.check()?;
            }
            let v = u16::from_be_bytes([pair[0], pair[1]]);
            if v > maxval {
                return Err(RasterError::SampleOutOfRange {
                    value: u32::from(v),
                    maxval,
                });
            }
            out.push(v);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_with_comments_everywhere() {
        let data = b"P3 # plain pixmap\n# a comment line\n 2 #width\n2\n# before maxval\n255\n";
        let h = parse_header(data).unwrap();
        assert_eq!(h.format, PpmFormat::PlainPixmap);
        assert_eq!((h.width, h.height, h.maxval), (2, 2, 255));
    }

    #[test]
    fn bitmap_header_has_implicit_maxval() {
        let h = parse_header(b"P1\n3 2\n").unwrap();
        assert_eq!(h.format, PpmFormat::PlainBitmap);
        assert_eq!(h.maxval, 1);
    }

    #[test]
    fn undelimited_magic_rejected() {
        assert!(matches!(
            parse_header(b"P39 9 255 "),
            Err(RasterError::MalformedHeader(_))
        ));
    }

    #[test]
    fn zero_dimension_rejected() {
        assert!(matches!(
            parse_header(b"P3\n0 2\n255\n"),
            Err(RasterError::MalformedHeader(_))
        ));
    }

    #[test]
    fn maxval_out_of_range_rejected() {
        assert!(matches!(
            parse_header(b"P3\n2 2\n0\n"),
            Err(RasterError::MalformedHeader(_))
        ));
        assert!(matches!(
            parse_header(b"P3\n2 2\n70000\n"),
            Err(RasterError::MalformedHeader(_))
        ));
    }

    #[test]
    fn plain_bits_may_abut() {
        let mut scanner = Scanner::new(b"0110", 0);
        let mut bits = alloc::vec::Vec::new();
        while let Some(b) = scanner.next_bit().unwrap() {
            bits.push(b);
        }
        assert_eq!(bits, [0, 1, 1, 0]);
    }

    #[test]
    fn scanner_rejects_garbage_token() {
        let mut scanner = Scanner::new(b"12a", 0);
        assert!(matches!(
            scanner.next_u32(),
            Err(RasterError::InvalidData(_))
        ));
    }
}
