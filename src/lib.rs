//! # Baseline JPEG block encoder
//!
//! Encodes 8 bit grayscale and color images into baseline (sequential, huffman coded) JFIF files.
//!
//! The core of the encoder is exposed as well:
//! quality scaled [quantization tables](QuantizationTable), the AAN float
//! [forward DCT](forward_dct), canonical [huffman tables](HuffmanTable) and the
//! [entropy coder](EncoderState) which are tied together by [BlockPipeline].
//!
//! ## Example
//! ```no_run
//! # use jpeg_block_encoder::EncodingError;
//! # pub fn main() -> Result<(), EncodingError> {
//! use jpeg_block_encoder::{ColorType, Encoder, SamplingFactor};
//!
//! // An 8x8 red image
//! let data = [255u8, 0, 0].repeat(64);
//!
//! let mut encoder = Encoder::new_file("out.jpg", 85)?;
//! encoder.set_sampling_factor(SamplingFactor::R_4_4_4);
//! encoder.encode(&data, 8, 8, ColorType::Rgb)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Block pipeline
//! ```
//! # use jpeg_block_encoder::EncodingError;
//! # pub fn main() -> Result<(), EncodingError> {
//! use jpeg_block_encoder::{
//!     BlockPipeline, ComponentTables, FlushPadding, HuffmanTable, QuantizationTable,
//! };
//!
//! let quantization = [
//!     QuantizationTable::new(&[16; 64], 75, true)?,
//!     QuantizationTable::new(&[17; 64], 75, true)?,
//! ];
//! let huffman = [
//!     (HuffmanTable::default_luma_dc(), HuffmanTable::default_luma_ac()),
//!     (HuffmanTable::default_chroma_dc(), HuffmanTable::default_chroma_ac()),
//! ];
//!
//! let mut pipeline = BlockPipeline::new(
//!     quantization,
//!     huffman,
//!     &[ComponentTables::with_id(0)],
//!     FlushPadding::Zeros,
//! );
//!
//! let mut scan = Vec::new();
//! pipeline.encode_block(&mut scan, 0, &[128.0; 64])?;
//! pipeline.finish(&mut scan)?;
//!
//! assert_eq!(scan, [0b0010_1000]);
//! # Ok(())
//! # }
//! ```

#![no_std]

#[cfg(any(feature = "std", test))]
extern crate std;

extern crate alloc;

mod encoder;
mod entropy;
mod error;
mod fdct;
mod huffman;
mod image_buffer;
mod marker;
mod pipeline;
mod quantization;
mod writer;
mod zigzag;

#[cfg(test)]
mod tests;

pub use encoder::{ColorType, Encoder, JpegColorType, SamplingFactor};
pub use entropy::{EncoderState, FlushPadding};
pub use error::{EncoderResult, EncodingError};
pub use fdct::{forward_dct, quantize_block};
pub use huffman::{CodingClass, HuffmanSpec, HuffmanTable};
pub use image_buffer::{
    rgb_to_ycbcr, BgrImage, BgraImage, GrayImage, ImageBuffer, RgbImage, RgbPixels, RgbaImage,
    YCbCrImage,
};
pub use pipeline::{BlockPipeline, ComponentTables};
pub use quantization::{QuantizationTable, QuantizationTableType};
pub use writer::{Density, JfifWrite};
pub use zigzag::ZIGZAG;

#[cfg(feature = "benchmark")]
pub use fdct::fdct_float;
