use alloc::string::String;
use core::fmt::Display;

#[cfg(feature = "std")]
use std::error::Error;

use crate::huffman::CodingClass;

/// # The error type for encoding
#[derive(Debug)]
pub enum EncodingError {
    /// A huffman specification violates the constraints of ITU T.81 Annex C
    InvalidHuffmanSpec(&'static str),

    /// A base quantization table doesn't have exactly 64 entries
    InvalidQuantizationTable { length: usize },

    /// A coefficient needs more magnitude bits than a baseline scan can code
    CoefficientOverflow { class: CodingClass, value: i32 },

    /// The selected huffman table has no code for a symbol
    MissingHuffmanCode { class: CodingClass, symbol: u8 },

    /// An invalid app segment number has been used
    InvalidAppSegment(u8),

    /// App segment exceeds maximum allowed data length
    AppSegmentTooLarge(usize),

    /// Image data is too short
    BadImageData { length: usize, required: usize },

    /// Width or height is zero
    ZeroImageDimensions { width: u16, height: u16 },

    /// An io error occurred during writing
    #[cfg(feature = "std")]
    IoError(std::io::Error),

    /// An io error occurred during writing (Should be used in no_std cases instead of IoError)
    Write(String),
}

#[cfg(feature = "std")]
impl From<std::io::Error> for EncodingError {
    fn from(err: std::io::Error) -> EncodingError {
        EncodingError::IoError(err)
    }
}

impl Display for EncodingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use EncodingError::*;
        match self {
            InvalidHuffmanSpec(reason) => write!(f, "Invalid huffman specification: {}", reason),
            InvalidQuantizationTable { length } => write!(
                f,
                "Invalid quantization table: expected 64 entries but got {}",
                length
            ),
            CoefficientOverflow { class, value } => write!(
                f,
                "{:?} coefficient {} is out of range for a baseline scan",
                class, value
            ),
            MissingHuffmanCode { class, symbol } => write!(
                f,
                "{:?} huffman table has no code for symbol 0x{:02x}",
                class, symbol
            ),
            InvalidAppSegment(nr) => write!(f, "Invalid app segment number: {}", nr),
            AppSegmentTooLarge(length) => write!(
                f,
                "App segment exceeds maximum allowed data length of 65533: {}",
                length
            ),
            BadImageData { length, required } => write!(
                f,
                "Image data too small for dimensions and color_type: {} need at least {}",
                length, required
            ),
            ZeroImageDimensions { width, height } => {
                write!(f, "Image dimensions must be non zero: {}x{}", width, height)
            }
            #[cfg(feature = "std")]
            IoError(err) => err.fmt(f),
            Write(err) => write!(f, "{}", err),
        }
    }
}

#[cfg(feature = "std")]
impl Error for EncodingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EncodingError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

pub type EncoderResult<T> = Result<T, EncodingError>;
