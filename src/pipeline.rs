use alloc::vec::Vec;

use crate::entropy::{EncoderState, FlushPadding};
use crate::error::EncoderResult;
use crate::fdct::{forward_dct, quantize_block};
use crate::huffman::HuffmanTable;
use crate::quantization::QuantizationTable;
use crate::writer::JfifWrite;

/// Table ids used by one component, each either 0 (luma) or 1 (chroma)
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ComponentTables {
    pub quantization_table: u8,
    pub dc_huffman_table: u8,
    pub ac_huffman_table: u8,
}

impl ComponentTables {
    /// All three tables share the same id
    pub fn with_id(id: u8) -> ComponentTables {
        ComponentTables {
            quantization_table: id,
            dc_huffman_table: id,
            ac_huffman_table: id,
        }
    }
}

/// # Block pipeline of one baseline scan
///
/// Runs forward DCT, quantization and entropy coding for 8x8 sample blocks.
///
/// [transform](BlockPipeline::transform) is a pure function of its input and may be computed
/// in any order. The entropy coding half ([encode_block](BlockPipeline::encode_block),
/// [encode_quantized](BlockPipeline::encode_quantized)) must see the blocks in scan order
/// because DC values are predicted from the previous block of the same component and all
/// components share one bitstream.
pub struct BlockPipeline {
    quantization_tables: [QuantizationTable; 2],
    huffman_tables: [(HuffmanTable, HuffmanTable); 2],
    components: Vec<ComponentTables>,
    state: EncoderState,
}

impl BlockPipeline {
    /// # Panics
    ///
    /// If more than 4 components are given or a component references a table id above 1
    pub fn new(
        quantization_tables: [QuantizationTable; 2],
        huffman_tables: [(HuffmanTable, HuffmanTable); 2],
        components: &[ComponentTables],
        padding: FlushPadding,
    ) -> BlockPipeline {
        assert!(
            components.len() <= 4,
            "Invalid number of components: {}",
            components.len()
        );
        for tables in components {
            assert!(
                tables.quantization_table < 2
                    && tables.dc_huffman_table < 2
                    && tables.ac_huffman_table < 2,
                "Invalid table ids: {:?}",
                tables
            );
        }

        BlockPipeline {
            quantization_tables,
            huffman_tables,
            components: components.to_vec(),
            state: EncoderState::new(padding),
        }
    }

    /// DCT and quantization of one block of `component`
    ///
    /// # Panics
    ///
    /// If `component` wasn't passed to [BlockPipeline::new]
    pub fn transform(&self, component: usize, samples: &[f32; 64]) -> [i32; 64] {
        let table = &self.quantization_tables
            [self.components[component].quantization_table as usize];

        let coefficients = forward_dct(samples);
        quantize_block(&coefficients, table.divisors())
    }

    /// Transforms and entropy codes the next block of `component`
    ///
    /// # Panics
    ///
    /// If `component` wasn't passed to [BlockPipeline::new]
    pub fn encode_block<W: JfifWrite>(
        &mut self,
        sink: &mut W,
        component: usize,
        samples: &[f32; 64],
    ) -> EncoderResult<()> {
        let quantized = self.transform(component, samples);
        self.encode_quantized(sink, component, &quantized)
    }

    /// Entropy codes an already quantized block of `component`
    ///
    /// # Panics
    ///
    /// If `component` wasn't passed to [BlockPipeline::new]
    pub fn encode_quantized<W: JfifWrite>(
        &mut self,
        sink: &mut W,
        component: usize,
        quantized: &[i32; 64],
    ) -> EncoderResult<()> {
        let tables = &self.components[component];
        let dc_table = &self.huffman_tables[tables.dc_huffman_table as usize].0;
        let ac_table = &self.huffman_tables[tables.ac_huffman_table as usize].1;

        self.state
            .encode_block(sink, quantized, component, dc_table, ac_table)
    }

    pub fn state(&self) -> &EncoderState {
        &self.state
    }

    /// Flushes the remaining bits of the scan
    pub fn finish<W: JfifWrite>(mut self, sink: &mut W) -> EncoderResult<()> {
        self.state.flush(sink)
    }
}
