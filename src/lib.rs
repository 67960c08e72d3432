//! # zenraster
//!
//! PPM-family (P1-P6) image codec and a pure pixel-filter pipeline.
//!
//! Decode turns PPM bytes into an RGB [`PixelBuffer`] (grayscale and bitmap
//! variants are promoted to three channels); a [`Pipeline`] of [`Filter`]
//! descriptors transforms buffers; encode writes any variant back out, with
//! P3 and P6 as bit-exact round-trip targets.
//!
//! ## Supported Formats
//!
//! - **P1/P4** — bitmap (PBM), plain and raw (bit-packed)
//! - **P2/P5** — grayscale (PGM), plain and raw, 8-bit and 16-bit
//! - **P3/P6** — RGB (PPM), plain and raw, 8-bit and 16-bit
//!
//! ## Filters
//!
//! Point-wise (grayscale, brightness/contrast, threshold, channel swap),
//! convolution (box blur, sharpen, edge detect, emboss, custom kernels with
//! clamp/wrap/zero edge policies), and rank filters (median, Sobel, binary
//! dilation and erosion). Filters never mutate their input; convolution is
//! always double-buffered.
//!
//! ## Non-Goals
//!
//! - Formats beyond the PPM family (no PAM, PFM, BMP, ...)
//! - Color management (ICC)
//! - Animated or multi-frame images
//!
//! ## Usage
//!
//! ```
//! use zenraster::{DecodeRequest, EncodeRequest, Filter, Pipeline, Unstoppable};
//! use zenraster::ppm::PpmFormat;
//!
//! let data = b"P3\n2 1\n255\n255 0 0  0 0 255\n";
//!
//! let buffer = DecodeRequest::new(data).decode(Unstoppable)?;
//! let gray = Pipeline::new()
//!     .with(Filter::Grayscale)
//!     .apply(buffer, Unstoppable)?;
//! let bytes = EncodeRequest::ppm(PpmFormat::RawPixmap).encode(&gray, Unstoppable)?;
//! assert!(bytes.starts_with(b"P6"));
//! # Ok::<(), zenraster::RasterError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod buffer;
mod decode;
mod encode;
mod error;
mod info;
mod limits;
mod pipeline;

pub mod filter;
pub mod ppm;

// Re-exports
pub use buffer::PixelBuffer;
pub use decode::DecodeRequest;
pub use encode::EncodeRequest;
pub use enough::{Stop, StopReason, Unstoppable};
pub use error::RasterError;
pub use filter::{EdgePolicy, Filter, Kernel, StructuringElement};
pub use info::ImageInfo;
pub use limits::Limits;
pub use pipeline::Pipeline;
