use alloc::vec::Vec;

use crate::error::{EncoderResult, EncodingError};
use crate::zigzag::ZIGZAG;

/// # Quantization table used for encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantizationTableType {
    /// Sample quantization tables given in Annex K (Clause K.1) of Recommendation ITU-T T.81 (1992) | ISO/IEC 10918-1:1994.
    Default,

    /// Flat
    Flat,

    /// A user supplied base table in natural order.
    ///
    /// The table is scaled by the quality setting like the default tables and must contain
    /// exactly 64 entries.
    Custom(Vec<u16>),
}

static DEFAULT_LUMA_TABLE: [u16; 64] = [
    16, 11, 10, 16, 24, 40, 51, 61, 12, 12, 14, 19, 26, 58, 60, 55, 14, 13, 16, 24, 40, 57, 69, 56,
    14, 17, 22, 29, 51, 87, 80, 62, 18, 22, 37, 56, 68, 109, 103, 77, 24, 35, 55, 64, 81, 104, 113,
    92, 49, 64, 78, 87, 103, 121, 120, 101, 72, 92, 95, 98, 112, 100, 103, 99,
];

static DEFAULT_CHROMA_TABLE: [u16; 64] = [
    17, 18, 24, 47, 99, 99, 99, 99, 18, 21, 26, 66, 99, 99, 99, 99, 24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99,
];

static FLAT_TABLE: [u16; 64] = [16; 64];

/// Per axis scale factors of the AAN float DCT: `cos(k*PI/16) * sqrt(2)` for k > 0
pub(crate) const AAN_SCALE_FACTOR: [f64; 8] = [
    1.0,
    1.387039845,
    1.306562965,
    1.175875602,
    1.0,
    0.785694958,
    0.541196100,
    0.275899379,
];

const MAX_BASELINE_VALUE: u32 = 255;
const MAX_EXTENDED_VALUE: u32 = 32767;

/// A quality scaled quantization table together with its fast-quantize divisors
#[derive(Debug, Clone)]
pub struct QuantizationTable {
    table: [u16; 64],
    divisors: [f64; 64],
}

impl QuantizationTable {
    /// Converts a quality value to the libjpeg percentage scale
    ///
    /// Values outside of 1..=100 are clamped.
    pub fn scale_factor(quality: u8) -> u32 {
        let quality = quality.clamp(1, 100) as u32;

        if quality < 50 {
            5000 / quality
        } else {
            200 - quality * 2
        }
    }

    /// Scales a 64 entry base table in natural order by the given quality
    ///
    /// With `force_baseline` every value is limited to 255 so it fits into an 8 bit DQT entry,
    /// otherwise values up to 32767 are kept.
    pub fn new(base: &[u16], quality: u8, force_baseline: bool) -> EncoderResult<QuantizationTable> {
        if base.len() != 64 {
            return Err(EncodingError::InvalidQuantizationTable { length: base.len() });
        }

        let scale = Self::scale_factor(quality);
        let max = if force_baseline {
            MAX_BASELINE_VALUE
        } else {
            MAX_EXTENDED_VALUE
        };

        let mut table = [0u16; 64];
        let mut divisors = [0f64; 64];

        for (i, &v) in base.iter().enumerate() {
            let v = (u32::from(v) * scale + 50) / 100;
            let v = v.clamp(1, max) as u16;

            table[i] = v;
            divisors[i] = 1.0
                / (f64::from(v) * AAN_SCALE_FACTOR[i / 8] * AAN_SCALE_FACTOR[i % 8] * 8.0);
        }

        Ok(QuantizationTable { table, divisors })
    }

    pub(crate) fn with_type(
        q_type: &QuantizationTableType,
        quality: u8,
        is_luma: bool,
        force_baseline: bool,
    ) -> EncoderResult<QuantizationTable> {
        let base: &[u16] = match q_type {
            QuantizationTableType::Default if is_luma => &DEFAULT_LUMA_TABLE,
            QuantizationTableType::Default => &DEFAULT_CHROMA_TABLE,
            QuantizationTableType::Flat => &FLAT_TABLE,
            QuantizationTableType::Custom(table) => table.as_slice(),
        };

        Self::new(base, quality, force_baseline)
    }

    /// Returns the scaled value for a coefficient in natural order
    #[inline]
    pub fn get(&self, index: usize) -> u16 {
        self.table[index]
    }

    /// Reciprocal divisors used by [quantize_block](crate::fdct::quantize_block)
    #[inline]
    pub fn divisors(&self) -> &[f64; 64] {
        &self.divisors
    }

    /// True if every entry fits into an 8 bit DQT entry
    pub fn is_baseline(&self) -> bool {
        self.table.iter().all(|&v| u32::from(v) <= MAX_BASELINE_VALUE)
    }

    /// The scaled table in zigzag order as written into a DQT segment
    pub fn zigzag_values(&self) -> [u16; 64] {
        let mut values = [0u16; 64];
        for (j, value) in values.iter_mut().enumerate() {
            *value = self.table[ZIGZAG[j] as usize];
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_scale_factor_boundaries() {
        assert_eq!(QuantizationTable::scale_factor(50), 100);
        assert_eq!(QuantizationTable::scale_factor(1), 5000);
        assert_eq!(QuantizationTable::scale_factor(49), 102);
        assert_eq!(QuantizationTable::scale_factor(75), 50);
        assert_eq!(QuantizationTable::scale_factor(100), 0);

        // Clamped, not rejected
        assert_eq!(QuantizationTable::scale_factor(0), 5000);
        assert_eq!(QuantizationTable::scale_factor(200), 0);
    }

    #[test]
    fn test_quality_50_keeps_base_table() {
        let q = QuantizationTable::new(&DEFAULT_LUMA_TABLE, 50, true).unwrap();
        for i in 0..64 {
            assert_eq!(q.get(i), DEFAULT_LUMA_TABLE[i]);
        }
    }

    #[test]
    fn test_new_100() {
        for base in [&DEFAULT_LUMA_TABLE, &DEFAULT_CHROMA_TABLE] {
            let q = QuantizationTable::new(base, 100, true).unwrap();
            for i in 0..64 {
                assert_eq!(q.get(i), 1);
            }
        }
    }

    #[test]
    fn test_clamp_baseline_and_extended() {
        let baseline = QuantizationTable::new(&DEFAULT_CHROMA_TABLE, 1, true).unwrap();
        assert_eq!(baseline.get(63), 255);
        assert!(baseline.is_baseline());

        // 99 * 5000 / 100 = 4950
        let extended = QuantizationTable::new(&DEFAULT_CHROMA_TABLE, 1, false).unwrap();
        assert_eq!(extended.get(63), 4950);
        assert!(!extended.is_baseline());
    }

    #[test]
    fn test_divisors_fold_aan_scale() {
        let q = QuantizationTable::new(&DEFAULT_LUMA_TABLE, 50, true).unwrap();

        assert_relative_eq!(q.divisors()[0], 1.0 / (16.0 * 8.0));
        assert_relative_eq!(
            q.divisors()[9],
            1.0 / (12.0 * 1.387039845 * 1.387039845 * 8.0),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            q.divisors()[7],
            1.0 / (61.0 * 0.275899379 * 8.0),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_zigzag_values() {
        let q = QuantizationTable::new(&DEFAULT_LUMA_TABLE, 50, true).unwrap();
        let zz = q.zigzag_values();

        assert_eq!(
            &zz[..16],
            &[16, 11, 12, 14, 12, 10, 16, 14, 13, 14, 18, 17, 16, 19, 24, 40]
        );
        assert_eq!(zz[63], 99);
    }

    #[test]
    fn test_invalid_length() {
        let result = QuantizationTable::new(&[1u16; 63], 75, true);
        assert!(matches!(
            result,
            Err(EncodingError::InvalidQuantizationTable { length: 63 })
        ));

        let custom = QuantizationTableType::Custom(vec![8; 65]);
        assert!(QuantizationTable::with_type(&custom, 75, true, true).is_err());
    }

    #[test]
    fn test_custom_and_flat() {
        let custom = QuantizationTableType::Custom(vec![2; 64]);
        let q = QuantizationTable::with_type(&custom, 50, false, true).unwrap();
        assert_eq!(q.get(10), 2);

        let q = QuantizationTable::with_type(&QuantizationTableType::Flat, 75, true, true).unwrap();
        assert!((0..64).all(|i| q.get(i) == 8));
    }
}
