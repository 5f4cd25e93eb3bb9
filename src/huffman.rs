use alloc::vec::Vec;

use crate::error::{EncoderResult, EncodingError};

/// Coefficient class a huffman table codes
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CodingClass {
    Dc = 0,
    Ac = 1,
}

static DEFAULT_LUMA_DC_CODE_LENGTHS: [u8; 16] = [
    0x00, 0x01, 0x05, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

static DEFAULT_LUMA_DC_VALUES: [u8; 12] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B,
];

static DEFAULT_CHROMA_DC_CODE_LENGTHS: [u8; 16] = [
    0x00, 0x03, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00,
];

static DEFAULT_CHROMA_DC_VALUES: [u8; 12] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B,
];

static DEFAULT_LUMA_AC_CODE_LENGTHS: [u8; 16] = [
    0x00, 0x02, 0x01, 0x03, 0x03, 0x02, 0x04, 0x03, 0x05, 0x05, 0x04, 0x04, 0x00, 0x00, 0x01, 0x7D,
];

static DEFAULT_LUMA_AC_VALUES: [u8; 162] = [
    0x01, 0x02, 0x03, 0x00, 0x04, 0x11, 0x05, 0x12, 0x21, 0x31, 0x41, 0x06, 0x13, 0x51, 0x61, 0x07,
    0x22, 0x71, 0x14, 0x32, 0x81, 0x91, 0xA1, 0x08, 0x23, 0x42, 0xB1, 0xC1, 0x15, 0x52, 0xD1, 0xF0,
    0x24, 0x33, 0x62, 0x72, 0x82, 0x09, 0x0A, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x25, 0x26, 0x27, 0x28,
    0x29, 0x2A, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3A, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49,
    0x4A, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69,
    0x6A, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7A, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89,
    0x8A, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9A, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7,
    0xA8, 0xA9, 0xAA, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6, 0xB7, 0xB8, 0xB9, 0xBA, 0xC2, 0xC3, 0xC4, 0xC5,
    0xC6, 0xC7, 0xC8, 0xC9, 0xCA, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0xDA, 0xE1, 0xE2,
    0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0xEA, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8,
    0xF9, 0xFA,
];

static DEFAULT_CHROMA_AC_CODE_LENGTHS: [u8; 16] = [
    0x00, 0x02, 0x01, 0x02, 0x04, 0x04, 0x03, 0x04, 0x07, 0x05, 0x04, 0x04, 0x00, 0x01, 0x02, 0x77,
];

static DEFAULT_CHROMA_AC_VALUES: [u8; 162] = [
    0x00, 0x01, 0x02, 0x03, 0x11, 0x04, 0x05, 0x21, 0x31, 0x06, 0x12, 0x41, 0x51, 0x07, 0x61, 0x71,
    0x13, 0x22, 0x32, 0x81, 0x08, 0x14, 0x42, 0x91, 0xA1, 0xB1, 0xC1, 0x09, 0x23, 0x33, 0x52, 0xF0,
    0x15, 0x62, 0x72, 0xD1, 0x0A, 0x16, 0x24, 0x34, 0xE1, 0x25, 0xF1, 0x17, 0x18, 0x19, 0x1A, 0x26,
    0x27, 0x28, 0x29, 0x2A, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3A, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48,
    0x49, 0x4A, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68,
    0x69, 0x6A, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7A, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87,
    0x88, 0x89, 0x8A, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9A, 0xA2, 0xA3, 0xA4, 0xA5,
    0xA6, 0xA7, 0xA8, 0xA9, 0xAA, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6, 0xB7, 0xB8, 0xB9, 0xBA, 0xC2, 0xC3,
    0xC4, 0xC5, 0xC6, 0xC7, 0xC8, 0xC9, 0xCA, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0xDA,
    0xE2, 0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0xEA, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8,
    0xF9, 0xFA,
];

/// # Huffman table specification
///
/// Number of codes per bit length (`bits[i]` counts codes of length `i + 1`) and the symbols
/// ordered by code length, exactly as stored in a DHT segment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HuffmanSpec {
    bits: [u8; 16],
    values: Vec<u8>,
}

impl HuffmanSpec {
    /// Validates and creates a specification
    ///
    /// # Errors
    ///
    /// Returns [EncodingError::InvalidHuffmanSpec] if the symbol count doesn't match `bits`,
    /// exceeds 256, or the lengths can't be assigned canonical codes.
    pub fn new(bits: [u8; 16], values: Vec<u8>) -> EncoderResult<HuffmanSpec> {
        if values.len() > 256 {
            return Err(EncodingError::InvalidHuffmanSpec("more than 256 symbols"));
        }

        let total: usize = bits.iter().map(|&b| b as usize).sum();
        if total != values.len() {
            return Err(EncodingError::InvalidHuffmanSpec(
                "symbol count differs from the sum of code lengths",
            ));
        }

        for (i, &count) in bits.iter().enumerate() {
            if u32::from(count) > (1u32 << (i + 1)) - 1 {
                return Err(EncodingError::InvalidHuffmanSpec(
                    "too many codes for a code length",
                ));
            }
        }

        // Kraft inequality with the all ones code of each length reserved (Annex C)
        let mut code = 0u32;
        for (i, &count) in bits.iter().enumerate() {
            code += u32::from(count);
            if code >= 1 << (i + 1) {
                return Err(EncodingError::InvalidHuffmanSpec(
                    "code lengths overflow the code space",
                ));
            }
            code <<= 1;
        }

        Ok(HuffmanSpec { bits, values })
    }

    fn from_static(bits: &[u8; 16], values: &[u8]) -> HuffmanSpec {
        HuffmanSpec {
            bits: *bits,
            values: values.to_vec(),
        }
    }

    pub fn default_luma_dc() -> HuffmanSpec {
        Self::from_static(&DEFAULT_LUMA_DC_CODE_LENGTHS, &DEFAULT_LUMA_DC_VALUES)
    }

    pub fn default_luma_ac() -> HuffmanSpec {
        Self::from_static(&DEFAULT_LUMA_AC_CODE_LENGTHS, &DEFAULT_LUMA_AC_VALUES)
    }

    pub fn default_chroma_dc() -> HuffmanSpec {
        Self::from_static(&DEFAULT_CHROMA_DC_CODE_LENGTHS, &DEFAULT_CHROMA_DC_VALUES)
    }

    pub fn default_chroma_ac() -> HuffmanSpec {
        Self::from_static(&DEFAULT_CHROMA_AC_CODE_LENGTHS, &DEFAULT_CHROMA_AC_VALUES)
    }

    pub fn bits(&self) -> &[u8; 16] {
        &self.bits
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }
}

/// # Canonical huffman code table
///
/// Lookup from symbol to `(code length, code)`. A length of 0 marks a symbol without code.
#[derive(Clone, Debug)]
pub struct HuffmanTable {
    lookup_table: [(u8, u16); 256],
    spec: HuffmanSpec,
}

impl HuffmanTable {
    pub fn new(spec: &HuffmanSpec) -> HuffmanTable {
        let sizes = generate_size_table(&spec.bits);
        let codes = generate_code_table(&sizes);

        let mut lookup_table = [(0u8, 0u16); 256];
        for ((&value, &size), &code) in spec.values.iter().zip(sizes.iter()).zip(codes.iter()) {
            lookup_table[value as usize] = (size, code);
        }

        HuffmanTable {
            lookup_table,
            spec: spec.clone(),
        }
    }

    pub fn default_luma_dc() -> HuffmanTable {
        Self::new(&HuffmanSpec::default_luma_dc())
    }

    pub fn default_luma_ac() -> HuffmanTable {
        Self::new(&HuffmanSpec::default_luma_ac())
    }

    pub fn default_chroma_dc() -> HuffmanTable {
        Self::new(&HuffmanSpec::default_chroma_dc())
    }

    pub fn default_chroma_ac() -> HuffmanTable {
        Self::new(&HuffmanSpec::default_chroma_ac())
    }

    /// Returns `(code length, code)` or None if the symbol isn't part of the table
    #[inline]
    pub fn get_for_value(&self, value: u8) -> Option<(u8, u16)> {
        let entry = self.lookup_table[value as usize];
        if entry.0 == 0 {
            None
        } else {
            Some(entry)
        }
    }

    pub fn spec(&self) -> &HuffmanSpec {
        &self.spec
    }
}

/// Figure C.1: code length of every symbol in `values` order
fn generate_size_table(bits: &[u8; 16]) -> Vec<u8> {
    let mut sizes = Vec::with_capacity(256);
    for (i, &count) in bits.iter().enumerate() {
        for _ in 0..count {
            sizes.push(i as u8 + 1);
        }
    }
    sizes
}

/// Figure C.2: consecutive codes within a length, shifted left on every length step
fn generate_code_table(sizes: &[u8]) -> Vec<u16> {
    let mut codes = Vec::with_capacity(sizes.len());

    let mut code = 0u32;
    let mut size = match sizes.first() {
        Some(&size) => size,
        None => return codes,
    };

    for &next_size in sizes {
        while next_size > size {
            code <<= 1;
            size += 1;
        }
        codes.push(code as u16);
        code += 1;
    }

    codes
}
