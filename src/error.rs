use alloc::string::String;
use enough::StopReason;

/// Errors from PPM decoding/encoding and filter application.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RasterError {
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("truncated pixel data: need {needed}, got {actual}")]
    TruncatedData { needed: usize, actual: usize },

    #[error("sample value {value} exceeds maxval {maxval}")]
    SampleOutOfRange { value: u32, maxval: u16 },

    #[error("invalid pixel data: {0}")]
    InvalidData(String),

    #[error("unsupported variant: {0}")]
    UnsupportedVariant(String),

    #[error("coordinates ({x}, {y}) outside {width}x{height} buffer")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for RasterError {
    fn from(r: StopReason) -> Self {
        RasterError::Cancelled(r)
    }
}
