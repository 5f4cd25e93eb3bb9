use crate::error::{EncoderResult, EncodingError};
use crate::huffman::{CodingClass, HuffmanTable};
use crate::writer::JfifWrite;
use crate::zigzag::ZIGZAG;

const MAX_DC_BITS: u8 = 11;
const MAX_AC_BITS: u8 = 10;

const ZRL: u8 = 0xF0;
const EOB: u8 = 0x00;

/// Fill bits of the last entropy coded byte
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FlushPadding {
    /// Remaining low bits of the final byte are left at zero
    Zeros,

    /// Remaining low bits are set to 1 like libjpeg does
    Ones,
}

impl Default for FlushPadding {
    fn default() -> Self {
        FlushPadding::Zeros
    }
}

/// Number of magnitude bits of `value`; 0 for 0
#[inline]
pub(crate) fn nbits(value: i32) -> u8 {
    (32 - value.unsigned_abs().leading_zeros()) as u8
}

/// Figure F.12 extend value: negative values are stored as `value + 2^nbits - 1`
#[inline]
pub(crate) fn extend_bits(value: i32, nbits: u8) -> u16 {
    let value = if value < 0 {
        value + (1 << nbits) - 1
    } else {
        value
    };
    (value as u32 & ((1u32 << nbits) - 1)) as u16
}

/// # Entropy coder state of one scan
///
/// Holds the left-justified bit accumulator and the DC predictor of every component.
/// Blocks must be passed in scan order, the state can't be shared between scans.
#[derive(Debug)]
pub struct EncoderState {
    buffer: u32,
    bit_count: u8,
    prev_dc: [i32; 4],
    padding: FlushPadding,

    blocks: usize,
    bytes: usize,
}

impl EncoderState {
    pub fn new(padding: FlushPadding) -> EncoderState {
        EncoderState {
            buffer: 0,
            bit_count: 0,
            prev_dc: [0; 4],
            padding,
            blocks: 0,
            bytes: 0,
        }
    }

    /// Quantized DC value of the last block encoded for `component`
    pub fn prev_dc(&self, component: usize) -> i32 {
        self.prev_dc[component]
    }

    /// Number of entropy coded bytes written so far, stuffed zeros included
    pub fn bytes_written(&self) -> usize {
        self.bytes
    }

    /// Huffman codes one quantized block in natural order
    ///
    /// The DC value is coded as difference to the previous block of `component`.
    ///
    /// # Panics
    ///
    /// If `component` is 4 or larger
    pub fn encode_block<W: JfifWrite>(
        &mut self,
        sink: &mut W,
        block: &[i32; 64],
        component: usize,
        dc_table: &HuffmanTable,
        ac_table: &HuffmanTable,
    ) -> EncoderResult<()> {
        let dc = block[0];
        let diff = dc
            .checked_sub(self.prev_dc[component])
            .ok_or(EncodingError::CoefficientOverflow {
                class: CodingClass::Dc,
                value: dc,
            })?;

        let size = nbits(diff);
        if size > MAX_DC_BITS {
            return Err(EncodingError::CoefficientOverflow {
                class: CodingClass::Dc,
                value: diff,
            });
        }
        self.prev_dc[component] = dc;

        self.write_symbol(sink, dc_table, CodingClass::Dc, size)?;
        self.write_bits(sink, extend_bits(diff, size), size)?;

        let mut run = 0u8;

        for &index in &ZIGZAG[1..] {
            let value = block[index as usize];

            if value == 0 {
                run += 1;
                continue;
            }

            while run > 15 {
                self.write_symbol(sink, ac_table, CodingClass::Ac, ZRL)?;
                run -= 16;
            }

            let size = nbits(value);
            if size > MAX_AC_BITS {
                return Err(EncodingError::CoefficientOverflow {
                    class: CodingClass::Ac,
                    value,
                });
            }

            self.write_symbol(sink, ac_table, CodingClass::Ac, (run << 4) | size)?;
            self.write_bits(sink, extend_bits(value, size), size)?;

            run = 0;
        }

        if run > 0 {
            self.write_symbol(sink, ac_table, CodingClass::Ac, EOB)?;
        }

        self.blocks += 1;

        Ok(())
    }

    /// Writes the remaining bits as one final byte and resets the accumulator
    pub fn flush<W: JfifWrite>(&mut self, sink: &mut W) -> EncoderResult<()> {
        if self.bit_count > 0 {
            let mut byte = (self.buffer >> 24) as u8;
            if self.padding == FlushPadding::Ones {
                byte |= 0xFF >> self.bit_count;
            }
            self.emit_byte(sink, byte)?;
        }

        self.buffer = 0;
        self.bit_count = 0;

        log::trace!(
            "Flushed scan: {} blocks in {} bytes",
            self.blocks,
            self.bytes
        );

        Ok(())
    }

    #[inline]
    fn write_symbol<W: JfifWrite>(
        &mut self,
        sink: &mut W,
        table: &HuffmanTable,
        class: CodingClass,
        symbol: u8,
    ) -> EncoderResult<()> {
        let (size, code) = table
            .get_for_value(symbol)
            .ok_or(EncodingError::MissingHuffmanCode { class, symbol })?;
        self.write_bits(sink, code, size)
    }

    #[inline]
    fn write_bits<W: JfifWrite>(&mut self, sink: &mut W, value: u16, size: u8) -> EncoderResult<()> {
        if size == 0 {
            return Ok(());
        }

        // bit_count < 8 and size <= 16 so the value always fits
        let value = u32::from(value) & ((1 << size) - 1);
        self.buffer |= value << (32 - self.bit_count - size);
        self.bit_count += size;

        while self.bit_count >= 8 {
            let byte = (self.buffer >> 24) as u8;
            self.emit_byte(sink, byte)?;
            self.buffer <<= 8;
            self.bit_count -= 8;
        }

        Ok(())
    }

    #[inline]
    fn emit_byte<W: JfifWrite>(&mut self, sink: &mut W, byte: u8) -> EncoderResult<()> {
        if byte == 0xFF {
            sink.write_all(&[0xFF, 0x00])?;
            self.bytes += 2;
        } else {
            sink.write_all(&[byte])?;
            self.bytes += 1;
        }
        Ok(())
    }
}
