use alloc::vec;
use alloc::vec::Vec;

use arrayref::{array_mut_ref, array_ref};

use crate::entropy::FlushPadding;
use crate::error::{EncoderResult, EncodingError};
use crate::huffman::{CodingClass, HuffmanTable};
use crate::image_buffer::*;
use crate::marker::Marker;
use crate::pipeline::{BlockPipeline, ComponentTables};
use crate::quantization::{QuantizationTable, QuantizationTableType};
use crate::writer::{Density, JfifWrite, JfifWriter};

#[cfg(feature = "std")]
use std::io::BufWriter;

#[cfg(feature = "std")]
use std::fs::File;

#[cfg(feature = "std")]
use std::path::Path;

/// # Color types used in encoding
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum JpegColorType {
    /// One component grayscale colorspace
    Luma,

    /// Three component YCbCr colorspace
    Ycbcr,
}

/// # Color types for input images
///
/// Available color input formats for [Encoder::encode]. Other types can be used
/// by implementing an [ImageBuffer](crate::ImageBuffer).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ColorType {
    /// Grayscale with 1 byte per pixel
    Luma,

    /// RGB with 3 bytes per pixel
    Rgb,

    /// Red, Green, Blue with 4 bytes per pixel. The alpha channel will be ignored during encoding.
    Rgba,

    /// RGB with 3 bytes per pixel
    Bgr,

    /// RGBA with 4 bytes per pixel. The alpha channel will be ignored during encoding.
    Bgra,

    /// YCbCr with 3 bytes per pixel.
    Ycbcr,
}

impl ColorType {
    pub(crate) fn get_bytes_per_pixel(self) -> usize {
        use ColorType::*;

        match self {
            Luma => 1,
            Rgb | Bgr | Ycbcr => 3,
            Rgba | Bgra => 4,
        }
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
/// # Sampling factors for chroma subsampling
///
/// The factors are the luma sampling factors, chroma components always use 1x1.
#[allow(non_camel_case_types)]
pub enum SamplingFactor {
    F_1_1 = 1 << 4 | 1,
    F_2_1 = 2 << 4 | 1,
    F_1_2 = 1 << 4 | 2,
    F_2_2 = 2 << 4 | 2,

    /// Alias for F_1_1
    R_4_4_4 = 0x80 | 1 << 4 | 1,

    /// Alias for F_1_2
    R_4_4_0 = 0x80 | 1 << 4 | 2,

    /// Alias for F_2_1
    R_4_2_2 = 0x80 | 2 << 4 | 1,

    /// Alias for F_2_2
    R_4_2_0 = 0x80 | 2 << 4 | 2,
}

impl SamplingFactor {
    /// Get variant for supplied factors or None if not supported
    pub fn from_factors(horizontal: u8, vertical: u8) -> Option<SamplingFactor> {
        use SamplingFactor::*;

        match (horizontal, vertical) {
            (1, 1) => Some(F_1_1),
            (1, 2) => Some(F_1_2),
            (2, 1) => Some(F_2_1),
            (2, 2) => Some(F_2_2),
            _ => None,
        }
    }

    pub(crate) fn get_sampling_factors(self) -> (u8, u8) {
        let value = self as u8;
        ((value >> 4) & 0x07, value & 0xf)
    }
}

pub(crate) struct Component {
    pub id: u8,
    pub tables: ComponentTables,
    pub horizontal_sampling_factor: u8,
    pub vertical_sampling_factor: u8,
}

macro_rules! add_component {
    ($components:expr, $id:expr, $dest:expr, $h_sample:expr, $v_sample:expr) => {
        $components.push(Component {
            id: $id,
            tables: ComponentTables::with_id($dest),
            horizontal_sampling_factor: $h_sample,
            vertical_sampling_factor: $v_sample,
        });
    };
}

fn clamp_quality(quality: u8) -> u8 {
    if !(1..=100).contains(&quality) {
        log::warn!("Quality {} is out of range and will be clamped", quality);
    }
    quality.clamp(1, 100)
}

/// # The JPEG encoder
pub struct Encoder<W: JfifWrite> {
    writer: JfifWriter<W>,
    density: Density,
    quality: u8,

    components: Vec<Component>,
    quantization_tables: [QuantizationTableType; 2],
    huffman_tables: [(HuffmanTable, HuffmanTable); 2],

    sampling_factor: SamplingFactor,
    force_baseline: bool,
    flush_padding: FlushPadding,

    app_segments: Vec<(u8, Vec<u8>)>,
    comments: Vec<Vec<u8>>,
}

impl<W: JfifWrite> Encoder<W> {
    /// Create a new encoder with the given quality
    ///
    /// The quality must be between 1 and 100 where 100 is the highest image quality,
    /// other values are clamped.<br>
    /// By default, quality settings below 90 use a chroma subsampling (2x2 / 4:2:0) which can
    /// be changed with [set_sampling_factor](Encoder::set_sampling_factor).
    pub fn new(w: W, quality: u8) -> Encoder<W> {
        let quality = clamp_quality(quality);

        let huffman_tables = [
            (
                HuffmanTable::default_luma_dc(),
                HuffmanTable::default_luma_ac(),
            ),
            (
                HuffmanTable::default_chroma_dc(),
                HuffmanTable::default_chroma_ac(),
            ),
        ];

        let quantization_tables = [
            QuantizationTableType::Default,
            QuantizationTableType::Default,
        ];

        let sampling_factor = if quality < 90 {
            SamplingFactor::R_4_2_0
        } else {
            SamplingFactor::R_4_4_4
        };

        Encoder {
            writer: JfifWriter::new(w),
            density: Density::None,
            quality,
            components: vec![],
            quantization_tables,
            huffman_tables,
            sampling_factor,
            force_baseline: true,
            flush_padding: FlushPadding::default(),
            app_segments: vec![],
            comments: vec![],
        }
    }

    /// Set the quality used to scale the quantization tables
    ///
    /// Values outside of 1..=100 are clamped.
    pub fn set_quality(&mut self, quality: u8) {
        self.quality = clamp_quality(quality);
    }

    /// Return the quality
    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Set pixel density for the image
    ///
    /// By default, this value is None which is equal to "1 pixel per pixel".
    pub fn set_density(&mut self, density: Density) {
        self.density = density;
    }

    /// Return pixel density
    pub fn density(&self) -> Density {
        self.density
    }

    /// Set chroma subsampling factor
    pub fn set_sampling_factor(&mut self, sampling: SamplingFactor) {
        self.sampling_factor = sampling;
    }

    /// Get chroma subsampling factor
    pub fn sampling_factor(&self) -> SamplingFactor {
        self.sampling_factor
    }

    /// Set quantization tables for luma and chroma components
    pub fn set_quantization_tables(
        &mut self,
        luma: QuantizationTableType,
        chroma: QuantizationTableType,
    ) {
        self.quantization_tables = [luma, chroma];
    }

    /// Get configured quantization tables
    pub fn quantization_tables(&self) -> &[QuantizationTableType; 2] {
        &self.quantization_tables
    }

    /// Set huffman tables as `(dc, ac)` pairs for luma and chroma components
    pub fn set_huffman_tables(
        &mut self,
        luma: (HuffmanTable, HuffmanTable),
        chroma: (HuffmanTable, HuffmanTable),
    ) {
        self.huffman_tables = [luma, chroma];
    }

    /// Controls if quantization values are limited to 255
    ///
    /// Enabled by default. If disabled, low qualities may produce values which need 16 bit
    /// precision and the frame is written as extended sequential (SOF1) instead of baseline.
    pub fn set_force_baseline(&mut self, force_baseline: bool) {
        self.force_baseline = force_baseline;
    }

    /// Returns if quantization values are limited to 255
    pub fn force_baseline(&self) -> bool {
        self.force_baseline
    }

    /// Set how the last byte of the entropy coded data is filled
    pub fn set_flush_padding(&mut self, padding: FlushPadding) {
        self.flush_padding = padding;
    }

    /// Return the flush padding mode
    pub fn flush_padding(&self) -> FlushPadding {
        self.flush_padding
    }

    /// Appends a custom app segment to the JFIF file
    ///
    /// Segment numbers need to be in the range between 1 and 15<br>
    /// The maximum allowed data length is 2^16 - 2 bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment number is invalid or data exceeds the allowed size
    pub fn add_app_segment(&mut self, segment_nr: u8, data: &[u8]) -> EncoderResult<()> {
        if segment_nr == 0 || segment_nr > 15 {
            Err(EncodingError::InvalidAppSegment(segment_nr))
        } else if data.len() > 65533 {
            Err(EncodingError::AppSegmentTooLarge(data.len()))
        } else {
            self.app_segments.push((segment_nr, data.to_vec()));
            Ok(())
        }
    }

    /// Add a COM segment
    ///
    /// # Errors
    ///
    /// Returns an error if data exceeds the allowed size
    pub fn add_comment(&mut self, data: &[u8]) -> EncoderResult<()> {
        if data.len() > 65533 {
            Err(EncodingError::AppSegmentTooLarge(data.len()))
        } else {
            self.comments.push(data.to_vec());
            Ok(())
        }
    }

    /// Encode an image
    ///
    /// Data format and length must conform to specified width, height and color type.
    pub fn encode(
        self,
        data: &[u8],
        width: u16,
        height: u16,
        color_type: ColorType,
    ) -> EncoderResult<()> {
        let required_data_len = width as usize * height as usize * color_type.get_bytes_per_pixel();

        if data.len() < required_data_len {
            return Err(EncodingError::BadImageData {
                length: data.len(),
                required: required_data_len,
            });
        }

        match color_type {
            ColorType::Luma => self.encode_image(GrayImage(data, width, height)),
            ColorType::Rgb => self.encode_image(RgbImage(data, width, height)),
            ColorType::Rgba => self.encode_image(RgbaImage(data, width, height)),
            ColorType::Bgr => self.encode_image(BgrImage(data, width, height)),
            ColorType::Bgra => self.encode_image(BgraImage(data, width, height)),
            ColorType::Ycbcr => self.encode_image(YCbCrImage(data, width, height)),
        }
    }

    /// Encode an image
    ///
    /// # Errors
    ///
    /// Returns [EncodingError::BadImageData] if the buffer holds fewer pixels than its dimensions need.
    pub fn encode_image<I: ImageBuffer>(mut self, image: I) -> EncoderResult<()> {
        let width = image.width();
        let height = image.height();

        if width == 0 || height == 0 {
            return Err(EncodingError::ZeroImageDimensions { width, height });
        }

        image.check_data_len()?;

        let color = image.get_jpeg_color_type();
        self.init_components(color);

        let q_tables = [
            QuantizationTable::with_type(
                &self.quantization_tables[0],
                self.quality,
                true,
                self.force_baseline,
            )?,
            QuantizationTable::with_type(
                &self.quantization_tables[1],
                self.quality,
                false,
                self.force_baseline,
            )?,
        ];

        let num_tables = if color == JpegColorType::Luma { 1 } else { 2 };
        let baseline = q_tables[..num_tables]
            .iter()
            .all(QuantizationTable::is_baseline);

        if !baseline {
            log::warn!("Quantization values above 255, writing extended sequential frame");
        }

        log::debug!(
            "Encoding {}x{} {:?} image with quality {} and sampling {:?}",
            width,
            height,
            color,
            self.quality,
            self.sampling_factor
        );

        self.write_headers(width, height, &q_tables[..num_tables], baseline)?;

        let planes = self.component_planes(&image);

        let tables: Vec<ComponentTables> = self.components.iter().map(|c| c.tables).collect();
        let mut pipeline = BlockPipeline::new(
            q_tables,
            self.huffman_tables.clone(),
            &tables,
            self.flush_padding,
        );

        let (max_h_sampling, max_v_sampling) = self.get_max_sampling_size();
        let num_cols = ceil_div(usize::from(width), max_h_sampling * 8);
        let num_rows = ceil_div(usize::from(height), max_v_sampling * 8);

        for mcu_y in 0..num_rows {
            for mcu_x in 0..num_cols {
                for (i, component) in self.components.iter().enumerate() {
                    let h = usize::from(component.horizontal_sampling_factor);
                    let v = usize::from(component.vertical_sampling_factor);
                    let plane_width = num_cols * h * 8;

                    for v_offset in 0..v {
                        for h_offset in 0..h {
                            let block = get_block(
                                &planes[i],
                                (mcu_x * h + h_offset) * 8,
                                (mcu_y * v + v_offset) * 8,
                                plane_width,
                            );
                            pipeline.encode_block(self.writer.get_mut(), i, &block)?;
                        }
                    }
                }
            }
        }

        log::trace!(
            "Encoded {} MCUs into {} bytes of scan data",
            num_cols * num_rows,
            pipeline.state().bytes_written()
        );

        pipeline.finish(self.writer.get_mut())?;

        self.writer.write_marker(Marker::EOI)?;

        Ok(())
    }

    fn init_components(&mut self, color: JpegColorType) {
        let (horizontal_sampling_factor, vertical_sampling_factor) =
            self.sampling_factor.get_sampling_factors();

        self.components.clear();

        match color {
            JpegColorType::Luma => {
                add_component!(self.components, 1, 0, 1, 1);
            }
            JpegColorType::Ycbcr => {
                add_component!(
                    self.components,
                    1,
                    0,
                    horizontal_sampling_factor,
                    vertical_sampling_factor
                );
                add_component!(self.components, 2, 1, 1, 1);
                add_component!(self.components, 3, 1, 1, 1);
            }
        }
    }

    fn get_max_sampling_size(&self) -> (usize, usize) {
        let max_h_sampling = self.components.iter().fold(1, |value, component| {
            value.max(component.horizontal_sampling_factor)
        });

        let max_v_sampling = self.components.iter().fold(1, |value, component| {
            value.max(component.vertical_sampling_factor)
        });

        (usize::from(max_h_sampling), usize::from(max_v_sampling))
    }

    fn write_headers(
        &mut self,
        width: u16,
        height: u16,
        q_tables: &[QuantizationTable],
        baseline: bool,
    ) -> EncoderResult<()> {
        self.writer.write_marker(Marker::SOI)?;
        self.writer.write_jfif_header(self.density)?;

        for (nr, data) in &self.app_segments {
            self.writer.write_app_segment(*nr, data)?;
        }

        for data in &self.comments {
            self.writer.write_comment(data)?;
        }

        self.writer.write_dqt(q_tables)?;
        self.writer
            .write_sof(width, height, &self.components, baseline)?;

        for (index, (dc, ac)) in self.huffman_tables[..q_tables.len()].iter().enumerate() {
            self.writer.write_dht(CodingClass::Dc, index as u8, dc)?;
            self.writer.write_dht(CodingClass::Ac, index as u8, ac)?;
        }

        self.writer.write_sos(&self.components)
    }

    /// Edge padded and downsampled sample planes, one per component
    ///
    /// Every plane covers whole MCUs. Pixels right and below the image repeat the last
    /// column and row, subsampled components average the covered full resolution samples.
    fn component_planes<I: ImageBuffer>(&self, image: &I) -> Vec<Vec<u8>> {
        let width = usize::from(image.width());
        let height = usize::from(image.height());

        let mut buffers: [Vec<u8>; 4] = Default::default();
        for y in 0..image.height() {
            image.fill_buffers(y, &mut buffers);
        }

        let (max_h_sampling, max_v_sampling) = self.get_max_sampling_size();
        let num_cols = ceil_div(width, max_h_sampling * 8);
        let num_rows = ceil_div(height, max_v_sampling * 8);

        self.components
            .iter()
            .zip(buffers.iter())
            .map(|(component, samples)| {
                let h = usize::from(component.horizontal_sampling_factor);
                let v = usize::from(component.vertical_sampling_factor);

                downsample_plane(
                    samples,
                    width,
                    height,
                    num_cols * h * 8,
                    num_rows * v * 8,
                    max_h_sampling / h,
                    max_v_sampling / v,
                )
            })
            .collect()
    }
}

#[cfg(feature = "std")]
impl Encoder<BufWriter<File>> {
    /// Create a new encoder that writes into a file
    ///
    /// See [new](Encoder::new) for further information.
    ///
    /// # Errors
    ///
    /// Returns an `IoError(std::io::Error)` if the file can't be created
    pub fn new_file<P: AsRef<Path>>(
        path: P,
        quality: u8,
    ) -> EncoderResult<Encoder<BufWriter<File>>> {
        let file = File::create(path)?;
        let buf = BufWriter::new(file);
        Ok(Self::new(buf, quality))
    }
}

fn downsample_plane(
    samples: &[u8],
    width: usize,
    height: usize,
    plane_width: usize,
    plane_height: usize,
    h_factor: usize,
    v_factor: usize,
) -> Vec<u8> {
    let count = (h_factor * v_factor) as u32;
    let mut plane = Vec::with_capacity(plane_width * plane_height);

    for py in 0..plane_height {
        for px in 0..plane_width {
            let mut sum = 0u32;

            for dy in 0..v_factor {
                let y = (py * v_factor + dy).min(height - 1);
                let row = &samples[y * width..(y + 1) * width];

                for dx in 0..h_factor {
                    let x = (px * h_factor + dx).min(width - 1);
                    sum += u32::from(row[x]);
                }
            }

            plane.push(((sum + count / 2) / count) as u8);
        }
    }

    plane
}

fn get_block(plane: &[u8], start_x: usize, start_y: usize, width: usize) -> [f32; 64] {
    let mut block = [0f32; 64];

    for y in 0..8 {
        let line = array_ref!(plane, (start_y + y) * width + start_x, 8);
        let row = array_mut_ref!(block, y * 8, 8);

        for (dst, &src) in row.iter_mut().zip(line.iter()) {
            *dst = f32::from(src);
        }
    }

    block
}

fn ceil_div(value: usize, div: usize) -> usize {
    value / div + usize::from(value % div != 0)
}
