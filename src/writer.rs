use alloc::vec::Vec;

use byteorder::{BigEndian, ByteOrder};

use crate::encoder::Component;
use crate::error::{EncoderResult, EncodingError};
use crate::huffman::{CodingClass, HuffmanTable};
use crate::marker::{Marker, SOFType};
use crate::quantization::QuantizationTable;

/// Represents the pixel density of an image
///
/// For example, a 300 DPI image is represented by:
///
/// ```rust
/// # use jpeg_block_encoder::Density;
/// let hdpi = Density::Inch { x: 300, y: 300 };
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Density {
    /// No pixel density is set, which means "1 pixel per pixel"
    None,

    /// Horizontal and vertical dots per inch (dpi)
    Inch { x: u16, y: u16 },

    /// Horizontal and vertical dots per centimeters
    Centimeter { x: u16, y: u16 },
}

impl Default for Density {
    fn default() -> Self {
        Density::None
    }
}

/// Byte sink the encoder writes to
pub trait JfifWrite {
    /// Writes the whole buffer or fails
    ///
    /// # Errors
    ///
    /// Errors of the underlying sink are returned unchanged
    fn write_all(&mut self, buf: &[u8]) -> EncoderResult<()>;
}

#[cfg(not(feature = "std"))]
impl<W: JfifWrite + ?Sized> JfifWrite for &mut W {
    fn write_all(&mut self, buf: &[u8]) -> EncoderResult<()> {
        (**self).write_all(buf)
    }
}

#[cfg(not(feature = "std"))]
impl JfifWrite for Vec<u8> {
    fn write_all(&mut self, buf: &[u8]) -> EncoderResult<()> {
        self.extend_from_slice(buf);
        Ok(())
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write + ?Sized> JfifWrite for W {
    #[inline(always)]
    fn write_all(&mut self, buf: &[u8]) -> EncoderResult<()> {
        std::io::Write::write_all(self, buf)?;
        Ok(())
    }
}

/// Writes JFIF markers and segments
pub(crate) struct JfifWriter<W: JfifWrite> {
    w: W,
}

impl<W: JfifWrite> JfifWriter<W> {
    pub fn new(w: W) -> Self {
        JfifWriter { w }
    }

    /// Sink for entropy coded data between SOS and EOI
    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.w
    }

    #[inline(always)]
    pub fn write(&mut self, buf: &[u8]) -> EncoderResult<()> {
        self.w.write_all(buf)
    }

    #[inline(always)]
    pub fn write_u8(&mut self, value: u8) -> EncoderResult<()> {
        self.w.write_all(&[value])
    }

    #[inline(always)]
    pub fn write_u16(&mut self, value: u16) -> EncoderResult<()> {
        let mut buf = [0u8; 2];
        BigEndian::write_u16(&mut buf, value);
        self.w.write_all(&buf)
    }

    pub fn write_marker(&mut self, marker: Marker) -> EncoderResult<()> {
        self.write(&[0xFF, marker.into()])
    }

    /// Writes a marker followed by the length field and `data`
    pub fn write_segment(&mut self, marker: Marker, data: &[u8]) -> EncoderResult<()> {
        if data.len() > 65533 {
            return Err(EncodingError::AppSegmentTooLarge(data.len()));
        }

        self.write_marker(marker)?;
        self.write_u16(data.len() as u16 + 2)?;
        self.write(data)
    }

    pub fn write_jfif_header(&mut self, density: Density) -> EncoderResult<()> {
        let (unit, x, y) = match density {
            Density::None => (0, 1, 1),
            Density::Inch { x, y } => (1, x, y),
            Density::Centimeter { x, y } => (2, x, y),
        };

        let mut data = [0u8; 14];
        data[..5].copy_from_slice(b"JFIF\0");
        // Version 1.2
        data[5] = 0x01;
        data[6] = 0x02;
        data[7] = unit;
        BigEndian::write_u16(&mut data[8..10], x);
        BigEndian::write_u16(&mut data[10..12], y);
        // No thumbnail

        self.write_segment(Marker::APP(0), &data)
    }

    pub fn write_app_segment(&mut self, segment_nr: u8, data: &[u8]) -> EncoderResult<()> {
        if segment_nr > 15 {
            return Err(EncodingError::InvalidAppSegment(segment_nr));
        }
        self.write_segment(Marker::APP(segment_nr), data)
    }

    pub fn write_comment(&mut self, data: &[u8]) -> EncoderResult<()> {
        self.write_segment(Marker::COM, data)
    }

    /// Writes all tables into one DQT segment
    ///
    /// Baseline tables use 8 bit entries, other tables 16 bit entries. Entries are in zigzag order.
    pub fn write_dqt(&mut self, tables: &[QuantizationTable]) -> EncoderResult<()> {
        let mut data = Vec::with_capacity(tables.len() * 129);

        for (index, table) in tables.iter().enumerate() {
            let values = table.zigzag_values();

            if table.is_baseline() {
                data.push(index as u8);
                data.extend(values.iter().map(|&v| v as u8));
            } else {
                data.push(0x10 | index as u8);
                for &v in values.iter() {
                    let mut buf = [0u8; 2];
                    BigEndian::write_u16(&mut buf, v);
                    data.extend_from_slice(&buf);
                }
            }
        }

        self.write_segment(Marker::DQT, &data)
    }

    /// Writes the frame header, SOF1 if any quantization table needs 16 bit precision
    pub fn write_sof(
        &mut self,
        width: u16,
        height: u16,
        components: &[Component],
        baseline: bool,
    ) -> EncoderResult<()> {
        let sof_type = if baseline {
            SOFType::BaselineDCT
        } else {
            SOFType::ExtendedSequentialDCT
        };

        let mut data = Vec::with_capacity(6 + components.len() * 3);

        // Sample precision
        data.push(8);

        let mut buf = [0u8; 4];
        BigEndian::write_u16(&mut buf[..2], height);
        BigEndian::write_u16(&mut buf[2..], width);
        data.extend_from_slice(&buf);

        data.push(components.len() as u8);

        for component in components {
            data.push(component.id);
            data.push(
                (component.horizontal_sampling_factor << 4) | component.vertical_sampling_factor,
            );
            data.push(component.tables.quantization_table);
        }

        self.write_segment(Marker::SOF(sof_type), &data)
    }

    pub fn write_dht(
        &mut self,
        class: CodingClass,
        destination: u8,
        table: &HuffmanTable,
    ) -> EncoderResult<()> {
        let spec = table.spec();

        let mut data = Vec::with_capacity(17 + spec.values().len());
        data.push(((class as u8) << 4) | destination);
        data.extend_from_slice(spec.bits());
        data.extend_from_slice(spec.values());

        self.write_segment(Marker::DHT, &data)
    }

    /// Writes the header of an interleaved baseline scan over all `components`
    pub fn write_sos(&mut self, components: &[Component]) -> EncoderResult<()> {
        let mut data = Vec::with_capacity(4 + components.len() * 2);

        data.push(components.len() as u8);

        for component in components {
            data.push(component.id);
            data.push((component.tables.dc_huffman_table << 4) | component.tables.ac_huffman_table);
        }

        // Spectral selection 0..63, no successive approximation
        data.push(0);
        data.push(63);
        data.push(0);

        self.write_segment(Marker::SOS, &data)
    }
}
