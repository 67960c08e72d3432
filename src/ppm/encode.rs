//! PPM encoders: P1-P6.
//!
//! P3 and P6 are lossless round-trip targets. P2/P5 reduce RGB to BT.601
//! luma; P1/P4 require binary-valued buffers (every sample 0 or maxval,
//! channels equal) and refuse anything else.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;
use enough::Stop;

use super::PpmFormat;
use crate::buffer::{CHANNELS, PixelBuffer, bt601_luma};
use crate::error::RasterError;

pub(crate) fn encode_ppm(
    buffer: &PixelBuffer,
    format: PpmFormat,
    stop: &dyn Stop,
) -> Result<Vec<u8>, RasterError> {
    stop.check()?;
    match format {
        PpmFormat::PlainPixmap => encode_p3(buffer, stop),
        PpmFormat::RawPixmap => encode_p6(buffer, stop),
        PpmFormat::PlainGray => encode_p2(buffer, stop),
        PpmFormat::RawGray => encode_p5(buffer, stop),
        PpmFormat::PlainBitmap => encode_p1(buffer, stop),
        PpmFormat::RawBitmap => encode_p4(buffer, stop),
    }
}

fn header(format: PpmFormat, buffer: &PixelBuffer) -> String {
    let magic = format.magic();
    let (w, h) = (buffer.width(), buffer.height());
    if format.is_bitmap() {
        format!("{magic}\n{w} {h}\n")
    } else {
        format!("{magic}\n{w} {h}\n{}\n", buffer.maxval())
    }
}

fn encode_p3(buffer: &PixelBuffer, stop: &dyn Stop) -> Result<Vec<u8>, RasterError> {
    let head = header(PpmFormat::PlainPixmap, buffer);
    let w = buffer.width() as usize;
    let row_samples = w * CHANNELS;
    // Worst case "65535 " per sample.
    let mut out = Vec::with_capacity(head.len() + buffer.samples().len() * 6);
    out.extend_from_slice(head.as_bytes());

    let mut line = String::with_capacity(row_samples * 6);
    for (y, row) in buffer.samples().chunks_exact(row_samples).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        line.clear();
        for (i, &s) in row.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            let _ = write!(line, "{s}");
        }
        line.push('\n');
        out.extend_from_slice(line.as_bytes());
    }
    Ok(out)
}

fn encode_p6(buffer: &PixelBuffer, stop: &dyn Stop) -> Result<Vec<u8>, RasterError> {
    let head = header(PpmFormat::RawPixmap, buffer);
    let row_samples = buffer.width() as usize * CHANNELS;
    let wide = buffer.maxval() > 255;
    let mut out =
        Vec::with_capacity(head.len() + buffer.samples().len() * if wide { 2 } else { 1 });
    out.extend_from_slice(head.as_bytes());

    for (y, row) in buffer.samples().chunks_exact(row_samples).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        if wide {
            for &s in row {
                out.extend_from_slice(&s.to_be_bytes());
            }
        } else {
            out.extend(row.iter().map(|&s| s as u8));
        }
    }
    Ok(out)
}

fn encode_p2(buffer: &PixelBuffer, stop: &dyn Stop) -> Result<Vec<u8>, RasterError> {
    let head = header(PpmFormat::PlainGray, buffer);
    let w = buffer.width() as usize;
    let mut out = Vec::with_capacity(head.len() + w * buffer.height() as usize * 6);
    out.extend_from_slice(head.as_bytes());

    let mut line = String::with_capacity(w * 6);
    for (y, row) in buffer.samples().chunks_exact(w * CHANNELS).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        line.clear();
        for (i, px) in row.chunks_exact(CHANNELS).enumerate() {
            if i > 0 {
                line.push(' ');
            }
            let _ = write!(line, "{}", bt601_luma(px[0], px[1], px[2]));
        }
        line.push('\n');
        out.extend_from_slice(line.as_bytes());
    }
    Ok(out)
}

fn encode_p5(buffer: &PixelBuffer, stop: &dyn Stop) -> Result<Vec<u8>, RasterError> {
    let head = header(PpmFormat::RawGray, buffer);
    let w = buffer.width() as usize;
    let wide = buffer.maxval() > 255;
    let pixels = buffer.samples().len() / CHANNELS;
    let mut out = Vec::with_capacity(head.len() + pixels * if wide { 2 } else { 1 });
    out.extend_from_slice(head.as_bytes());

    for (y, row) in buffer.samples().chunks_exact(w * CHANNELS).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        for px in row.chunks_exact(CHANNELS) {
            let luma = bt601_luma(px[0], px[1], px[2]);
            if wide {
                out.extend_from_slice(&luma.to_be_bytes());
            } else {
                out.push(luma as u8);
            }
        }
    }
    Ok(out)
}

/// PBM bit for a binary-valued pixel: sample 0 is black, which PBM stores
/// as 1. Returns `UnsupportedVariant` for anything not binary-valued.
fn bitmap_bit(px: &[u16], maxval: u16, format: PpmFormat) -> Result<u8, RasterError> {
    let (r, g, b) = (px[0], px[1], px[2]);
    if r != g || g != b || (r != 0 && r != maxval) {
        return Err(RasterError::UnsupportedVariant(format!(
            "{} requires binary-valued samples (0 or maxval, equal channels)",
            format.magic()
        )));
    }
    Ok(if r == 0 { 1 } else { 0 })
}

fn encode_p1(buffer: &PixelBuffer, stop: &dyn Stop) -> Result<Vec<u8>, RasterError> {
    let head = header(PpmFormat::PlainBitmap, buffer);
    let w = buffer.width() as usize;
    let maxval = buffer.maxval();
    let mut out = Vec::with_capacity(head.len() + buffer.height() as usize * (w * 2 + 1));
    out.extend_from_slice(head.as_bytes());

    for (y, row) in buffer.samples().chunks_exact(w * CHANNELS).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        for (i, px) in row.chunks_exact(CHANNELS).enumerate() {
            if i > 0 {
                out.push(b' ');
            }
            out.push(b'0' + bitmap_bit(px, maxval, PpmFormat::PlainBitmap)?);
        }
        out.push(b'\n');
    }
    Ok(out)
}

fn encode_p4(buffer: &PixelBuffer, stop: &dyn Stop) -> Result<Vec<u8>, RasterError> {
    let head = header(PpmFormat::RawBitmap, buffer);
    let w = buffer.width() as usize;
    let maxval = buffer.maxval();
    let row_bytes = w.div_ceil(8);
    let mut out = Vec::with_capacity(head.len() + buffer.height() as usize * row_bytes);
    out.extend_from_slice(head.as_bytes());

    for (y, row) in buffer.samples().chunks_exact(w * CHANNELS).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        let mut packed = 0u8;
        let mut used = 0;
        for px in row.chunks_exact(CHANNELS) {
            packed = (packed << 1) | bitmap_bit(px, maxval, PpmFormat::RawBitmap)?;
            used += 1;
            if used == 8 {
                out.push(packed);
                packed = 0;
                used = 0;
            }
        }
        if used > 0 {
            // Pad the final byte of the row, MSB-aligned.
            out.push(packed << (8 - used));
        }
    }
    Ok(out)
}
