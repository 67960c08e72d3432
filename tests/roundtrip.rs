use zenraster::ppm::PpmFormat;
use zenraster::*;

fn checkered(w: u32, h: u32, maxval: u16) -> PixelBuffer {
    let mut samples = Vec::with_capacity((w * h * 3) as usize);
    for y in 0..h {
        for x in 0..w {
            if (x + y) % 2 == 0 {
                samples.extend_from_slice(&[maxval, 0, maxval / 2]);
            } else {
                samples.extend_from_slice(&[0, maxval / 3, maxval]);
            }
        }
    }
    PixelBuffer::new(w, h, maxval, samples).unwrap()
}

#[test]
fn p3_decode_concrete() {
    let data = b"P3\n2 2\n255\n255 0 0  0 255 0  0 0 255  255 255 255\n";
    let buf = DecodeRequest::new(data).decode(Unstoppable).unwrap();
    assert_eq!((buf.width(), buf.height(), buf.maxval()), (2, 2, 255));
    assert_eq!(buf.get(0, 0).unwrap(), [255, 0, 0]);
    assert_eq!(buf.get(1, 0).unwrap(), [0, 255, 0]);
    assert_eq!(buf.get(0, 1).unwrap(), [0, 0, 255]);
    assert_eq!(buf.get(1, 1).unwrap(), [255, 255, 255]);
}

#[test]
fn p3_roundtrip() {
    let buf = checkered(4, 3, 255);
    let encoded = EncodeRequest::ppm(PpmFormat::PlainPixmap)
        .encode(&buf, Unstoppable)
        .unwrap();
    assert!(encoded.starts_with(b"P3"));
    let decoded = DecodeRequest::new(&encoded).decode(Unstoppable).unwrap();
    assert_eq!(decoded, buf);
}

#[test]
fn p6_roundtrip() {
    let buf = checkered(5, 4, 255);
    let encoded = EncodeRequest::ppm(PpmFormat::RawPixmap)
        .encode(&buf, Unstoppable)
        .unwrap();
    let decoded = DecodeRequest::new(&encoded).decode(Unstoppable).unwrap();
    assert_eq!(decoded, buf);
}

#[test]
fn p6_roundtrip_16bit() {
    let buf = checkered(3, 3, 65535);
    let encoded = EncodeRequest::ppm(PpmFormat::RawPixmap)
        .encode(&buf, Unstoppable)
        .unwrap();
    let decoded = DecodeRequest::new(&encoded).decode(Unstoppable).unwrap();
    assert_eq!(decoded, buf);
}

#[test]
fn p3_roundtrip_odd_maxval() {
    let buf = checkered(2, 2, 1000);
    let encoded = EncodeRequest::ppm(PpmFormat::PlainPixmap)
        .encode(&buf, Unstoppable)
        .unwrap();
    let decoded = DecodeRequest::new(&encoded).decode(Unstoppable).unwrap();
    assert_eq!(decoded, buf);
}

#[test]
fn p5_gray_promotes_to_rgb() {
    let data = b"P5\n3 1\n255\n\x00\x80\xff";
    let buf = DecodeRequest::new(data).decode(Unstoppable).unwrap();
    assert_eq!(buf.get(0, 0).unwrap(), [0, 0, 0]);
    assert_eq!(buf.get(1, 0).unwrap(), [128, 128, 128]);
    assert_eq!(buf.get(2, 0).unwrap(), [255, 255, 255]);
}

#[test]
fn p5_16bit_big_endian() {
    let data = b"P5\n1 1\n65535\n\x01\x02";
    let buf = DecodeRequest::new(data).decode(Unstoppable).unwrap();
    assert_eq!(buf.get(0, 0).unwrap(), [0x0102, 0x0102, 0x0102]);
}

#[test]
fn p2_plain_gray() {
    let data = b"P2\n2 2\n100\n0 25\n50 100\n";
    let buf = DecodeRequest::new(data).decode(Unstoppable).unwrap();
    assert_eq!(buf.maxval(), 100);
    assert_eq!(buf.get(1, 1).unwrap(), [100, 100, 100]);
}

#[test]
fn p1_inverts_pbm_bits() {
    // PBM stores 1 = black; decoded samples use maxval = full intensity.
    let data = b"P1\n2 2\n0 1\n1 0\n";
    let buf = DecodeRequest::new(data).decode(Unstoppable).unwrap();
    assert_eq!(buf.maxval(), 1);
    assert_eq!(buf.get(0, 0).unwrap(), [1, 1, 1]);
    assert_eq!(buf.get(1, 0).unwrap(), [0, 0, 0]);
    assert_eq!(buf.get(0, 1).unwrap(), [0, 0, 0]);
    assert_eq!(buf.get(1, 1).unwrap(), [1, 1, 1]);
}

#[test]
fn p1_digits_may_abut() {
    let data = b"P1\n4 1\n0110\n";
    let buf = DecodeRequest::new(data).decode(Unstoppable).unwrap();
    assert_eq!(buf.get(0, 0).unwrap(), [1, 1, 1]);
    assert_eq!(buf.get(1, 0).unwrap(), [0, 0, 0]);
}

#[test]
fn p4_rows_pad_to_byte_boundary() {
    // 10 pixels per row: 2 bytes per row, 6 trailing pad bits.
    // Row 0: all black (bits 1), row 1: all white (bits 0).
    let data = b"P4\n10 2\n\xff\xc0\x00\x00";
    let buf = DecodeRequest::new(data).decode(Unstoppable).unwrap();
    for x in 0..10 {
        assert_eq!(buf.get(x, 0).unwrap(), [0, 0, 0], "row 0 is black");
        assert_eq!(buf.get(x, 1).unwrap(), [1, 1, 1], "row 1 is white");
    }
}

#[test]
fn p4_roundtrip() {
    let data = b"P1\n9 3\n0 1 0 1 0 1 0 1 0\n1 1 1 0 0 0 1 1 1\n0 0 0 0 1 0 0 0 0\n";
    let buf = DecodeRequest::new(data).decode(Unstoppable).unwrap();
    let raw = EncodeRequest::ppm(PpmFormat::RawBitmap)
        .encode(&buf, Unstoppable)
        .unwrap();
    assert!(raw.starts_with(b"P4"));
    let decoded = DecodeRequest::new(&raw).decode(Unstoppable).unwrap();
    assert_eq!(decoded, buf);
}

#[test]
fn bitmap_encode_requires_binary_values() {
    let buf = checkered(2, 2, 255);
    let err = EncodeRequest::ppm(PpmFormat::PlainBitmap)
        .encode(&buf, Unstoppable)
        .unwrap_err();
    assert!(matches!(err, RasterError::UnsupportedVariant(_)));
}

#[test]
fn p5_encode_reduces_to_luma() {
    let buf = PixelBuffer::new(1, 1, 255, vec![255, 0, 0]).unwrap();
    let encoded = EncodeRequest::ppm(PpmFormat::RawGray)
        .encode(&buf, Unstoppable)
        .unwrap();
    assert_eq!(encoded, b"P5\n1 1\n255\n\x4c"); // round(0.299 * 255) = 76
}

#[test]
fn comments_allowed_between_header_tokens() {
    let data = b"P3 # format\n# dims next\n1 # width\n1\n255 # maxval\n10 20 30\n";
    let buf = DecodeRequest::new(data).decode(Unstoppable).unwrap();
    assert_eq!(buf.get(0, 0).unwrap(), [10, 20, 30]);
}

#[test]
fn unknown_magic_fails() {
    let err = DecodeRequest::new(b"PX\n2 2\n255\n")
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(err, RasterError::MalformedHeader(_)));
}

#[test]
fn ascii_sample_over_maxval_fails() {
    let err = DecodeRequest::new(b"P3\n1 1\n255\n300 0 0\n")
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(
        err,
        RasterError::SampleOutOfRange {
            value: 300,
            maxval: 255
        }
    ));
}

#[test]
fn binary_sample_over_maxval_fails() {
    let err = DecodeRequest::new(b"P5\n1 1\n100\n\xc8")
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(err, RasterError::SampleOutOfRange { value: 200, .. }));
}

#[test]
fn truncated_ascii_fails() {
    let err = DecodeRequest::new(b"P3\n2 2\n255\n1 2 3\n")
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(
        err,
        RasterError::TruncatedData {
            needed: 12,
            actual: 3
        }
    ));
}

#[test]
fn truncated_binary_fails() {
    let err = DecodeRequest::new(b"P6\n2 2\n255\n\x00\x01")
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(err, RasterError::TruncatedData { needed: 12, .. }));
}

#[test]
fn image_info_probe() {
    let info = ImageInfo::from_bytes(b"P6\n640 480\n255\n").unwrap();
    assert_eq!(info.width, 640);
    assert_eq!(info.height, 480);
    assert_eq!(info.maxval, 255);
    assert_eq!(info.format, PpmFormat::RawPixmap);

    let info = ImageInfo::from_bytes(b"P4\n8 8\n").unwrap();
    assert_eq!(info.maxval, 1);
    assert_eq!(info.format, PpmFormat::RawBitmap);
}

#[test]
fn limits_reject_large() {
    let limits = Limits {
        max_pixels: Some(1),
        ..Default::default()
    };
    let result = DecodeRequest::new(b"P3\n2 1\n255\n0 0 0 0 0 0\n")
        .with_limits(&limits)
        .decode(Unstoppable);
    assert!(matches!(result, Err(RasterError::LimitExceeded(_))));
}

#[test]
fn memory_limit_counts_decoded_storage() {
    // 2x1 decodes to 2 pixels of three u16 samples: 12 bytes.
    let data = b"P3\n2 1\n255\n0 0 0 0 0 0\n";

    let tight = Limits {
        max_memory_bytes: Some(11),
        ..Default::default()
    };
    let result = DecodeRequest::new(data).with_limits(&tight).decode(Unstoppable);
    assert!(matches!(result, Err(RasterError::LimitExceeded(_))));

    let exact = Limits {
        max_memory_bytes: Some(12),
        ..Default::default()
    };
    assert!(DecodeRequest::new(data).with_limits(&exact).decode(Unstoppable).is_ok());
}

/// Passes its first check and cancels every one after it.
struct CancelAfterFirst(core::sync::atomic::AtomicUsize);

impl Stop for CancelAfterFirst {
    fn check(&self) -> Result<(), StopReason> {
        use core::sync::atomic::Ordering;
        if self.0.fetch_add(1, Ordering::Relaxed) == 0 {
            Ok(())
        } else {
            Err(StopReason::Cancelled)
        }
    }
}

#[test]
fn every_encoder_honors_cancellation() {
    // White is binary-valued, so all six variants accept it.
    let buf = PixelBuffer::filled(2, 40, 255, [255, 255, 255]).unwrap();
    for format in [
        PpmFormat::PlainBitmap,
        PpmFormat::PlainGray,
        PpmFormat::PlainPixmap,
        PpmFormat::RawBitmap,
        PpmFormat::RawGray,
        PpmFormat::RawPixmap,
    ] {
        let stop = CancelAfterFirst(core::sync::atomic::AtomicUsize::new(0));
        let err = EncodeRequest::ppm(format).encode(&buf, &stop).unwrap_err();
        assert!(
            matches!(err, RasterError::Cancelled(_)),
            "{} encode ignored cancellation",
            format.magic()
        );
    }
}
