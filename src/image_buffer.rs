use alloc::vec::Vec;

use rgb::RGB8;

use crate::encoder::JpegColorType;
use crate::error::{EncoderResult, EncodingError};

/// Conversion from RGB to YCbCr
///
/// To avoid floating point math this scales everything by 2^16 which gives
/// a precision of approx 4 digits.
///
/// Non scaled conversion:
/// Y  =  0.29900 * R + 0.58700 * G + 0.11400 * B
/// Cb = -0.16874 * R - 0.33126 * G + 0.50000 * B  + 128
/// Cr =  0.50000 * R - 0.41869 * G - 0.08131 * B  + 128
#[inline]
pub fn rgb_to_ycbcr(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let r = r as i32;
    let g = g as i32;
    let b = b as i32;

    let y = 19595 * r + 38470 * g + 7471 * b;
    let cb = -11059 * r - 21709 * g + 32768 * b + (128 << 16);
    let cr = 32768 * r - 27439 * g - 5329 * b + (128 << 16);

    let y = (y + 0x7FFF) >> 16;
    let cb = (cb + 0x7FFF) >> 16;
    let cr = (cr + 0x7FFF) >> 16;

    (y as u8, cb as u8, cr as u8)
}

/// # Buffer used as input value for image encoding
///
/// Image encoding with [Encoder::encode_image](crate::Encoder::encode_image) needs an ImageBuffer
/// as input for the image data. For convenience the [Encoder::encode](crate::Encoder::encode)
/// function contains implementations for common byte based pixel formats.
/// Users that needs other pixel formats or don't have the data available as byte slices
/// can create their own buffer implementations.
pub trait ImageBuffer {
    /// The color type used in the image encoding
    fn get_jpeg_color_type(&self) -> JpegColorType;

    /// Width of the image
    fn width(&self) -> u16;

    /// Height of the image
    fn height(&self) -> u16;

    /// Add color values for the row to color component buffers
    fn fill_buffers(&self, y: u16, buffers: &mut [Vec<u8>; 4]);

    /// Checks that the backing data covers every row before encoding starts
    ///
    /// Buffers that produce rows on demand can keep the default.
    fn check_data_len(&self) -> EncoderResult<()> {
        Ok(())
    }
}

fn check_len(length: usize, width: u16, height: u16, per_pixel: usize) -> EncoderResult<()> {
    let required = usize::from(width) * usize::from(height) * per_pixel;

    if length < required {
        return Err(EncodingError::BadImageData { length, required });
    }

    Ok(())
}

fn get_line(data: &[u8], y: u16, width: u16, num_colors: usize) -> &[u8] {
    let width = usize::from(width);
    let y = usize::from(y);

    let start = y * width * num_colors;
    let end = start + width * num_colors;

    &data[start..end]
}

/// Grayscale image with 1 byte per pixel
pub struct GrayImage<'a>(pub &'a [u8], pub u16, pub u16);

impl<'a> ImageBuffer for GrayImage<'a> {
    fn get_jpeg_color_type(&self) -> JpegColorType {
        JpegColorType::Luma
    }

    fn width(&self) -> u16 {
        self.1
    }

    fn height(&self) -> u16 {
        self.2
    }

    fn fill_buffers(&self, y: u16, buffers: &mut [Vec<u8>; 4]) {
        let line = get_line(self.0, y, self.width(), 1);
        buffers[0].extend_from_slice(line);
    }

    fn check_data_len(&self) -> EncoderResult<()> {
        check_len(self.0.len(), self.1, self.2, 1)
    }
}

macro_rules! ycbcr_image {
    ($name:ident, $num_colors:expr, $o1:expr, $o2:expr, $o3:expr, $doc:expr) => {
        #[doc = $doc]
        pub struct $name<'a>(pub &'a [u8], pub u16, pub u16);

        impl<'a> ImageBuffer for $name<'a> {
            fn get_jpeg_color_type(&self) -> JpegColorType {
                JpegColorType::Ycbcr
            }

            fn width(&self) -> u16 {
                self.1
            }

            fn height(&self) -> u16 {
                self.2
            }

            #[inline(always)]
            fn fill_buffers(&self, y: u16, buffers: &mut [Vec<u8>; 4]) {
                let line = get_line(self.0, y, self.width(), $num_colors);

                for pixel in line.chunks_exact($num_colors) {
                    let (y, cb, cr) = rgb_to_ycbcr(pixel[$o1], pixel[$o2], pixel[$o3]);

                    buffers[0].push(y);
                    buffers[1].push(cb);
                    buffers[2].push(cr);
                }
            }

            fn check_data_len(&self) -> EncoderResult<()> {
                check_len(self.0.len(), self.1, self.2, $num_colors)
            }
        }
    };
}

ycbcr_image!(RgbImage, 3, 0, 1, 2, "RGB image with 3 bytes per pixel");
ycbcr_image!(
    RgbaImage,
    4,
    0,
    1,
    2,
    "RGBA image with 4 bytes per pixel, alpha is ignored"
);
ycbcr_image!(BgrImage, 3, 2, 1, 0, "BGR image with 3 bytes per pixel");
ycbcr_image!(
    BgraImage,
    4,
    2,
    1,
    0,
    "BGRA image with 4 bytes per pixel, alpha is ignored"
);

/// Image already converted to YCbCr with 3 bytes per pixel
pub struct YCbCrImage<'a>(pub &'a [u8], pub u16, pub u16);

impl<'a> ImageBuffer for YCbCrImage<'a> {
    fn get_jpeg_color_type(&self) -> JpegColorType {
        JpegColorType::Ycbcr
    }

    fn width(&self) -> u16 {
        self.1
    }

    fn height(&self) -> u16 {
        self.2
    }

    fn fill_buffers(&self, y: u16, buffers: &mut [Vec<u8>; 4]) {
        let line = get_line(self.0, y, self.width(), 3);

        for pixel in line.chunks_exact(3) {
            buffers[0].push(pixel[0]);
            buffers[1].push(pixel[1]);
            buffers[2].push(pixel[2]);
        }
    }

    fn check_data_len(&self) -> EncoderResult<()> {
        check_len(self.0.len(), self.1, self.2, 3)
    }
}

/// RGB image given as typed pixels
pub struct RgbPixels<'a>(pub &'a [RGB8], pub u16, pub u16);

impl<'a> ImageBuffer for RgbPixels<'a> {
    fn get_jpeg_color_type(&self) -> JpegColorType {
        JpegColorType::Ycbcr
    }

    fn width(&self) -> u16 {
        self.1
    }

    fn height(&self) -> u16 {
        self.2
    }

    fn fill_buffers(&self, y: u16, buffers: &mut [Vec<u8>; 4]) {
        let width = usize::from(self.1);
        let start = usize::from(y) * width;

        for pixel in &self.0[start..start + width] {
            let (y, cb, cr) = rgb_to_ycbcr(pixel.r, pixel.g, pixel.b);

            buffers[0].push(y);
            buffers[1].push(cb);
            buffers[2].push(cr);
        }
    }

    /// Length and requirement are counted in pixels
    fn check_data_len(&self) -> EncoderResult<()> {
        check_len(self.0.len(), self.1, self.2, 1)
    }
}
