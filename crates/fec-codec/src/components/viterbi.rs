use fec_core::{FecError, FecResult};

use super::interleaver::{self, BLOCK_LEN};
use super::trellis::{NUM_STATES, SOURCE_STATES, TRANSITION_INPUT, TRANSITION_OUTPUT};

/// Accumulated Hamming distance of a path. Saturates instead of wrapping.
type Metric = u8;

/// Decoded input bits along a path, most recent bit in the LSB
type PathReg = u32;

/// Encoder symbols carried by one interleaved block
const SYMBOLS_PER_BLOCK: usize = 16;

/// Number of path bits kept before the oldest byte is released
const PATH_DEPTH: u32 = PathReg::BITS;

/// Initial metric of every state except 0. The encoder always starts in state 0.
const UNLIKELY_STATE_METRIC: Metric = 100;

/// Bits of the trellis terminator the decoder waits for before flushing
const TERMINATOR_BITS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderStatus {
    /// Created, `init` not yet called
    Idle,
    /// Accepting blocks
    Running,
    /// End of frame reached; needs `init` before the next frame
    Finished,
}

/// Result of feeding one 4-byte block to the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockOutcome {
    /// Bytes appended to the output during this call
    pub decoded: usize,
    /// True once the whole frame has been emitted; no further blocks may be fed
    pub done: bool,
}

/// Streaming hard-decision Viterbi decoder for the CC1101 FEC mode.
///
/// Consumes interleaved 4-byte blocks and releases decoded bytes from the path ending in
/// state 0 once 32 bits of history are available. Each instance is one decode session,
/// so independent frames can be decoded concurrently with separate instances.
#[derive(Debug, Clone)]
pub struct ViterbiDecoder {
    /// Path metrics, double buffered (previous, current)
    cost: [[Metric; NUM_STATES]; 2],
    /// Path registers, double buffered like `cost`
    path: [[PathReg; NUM_STATES]; 2],
    /// Index of the buffer holding the metrics of the previous trellis step
    last: usize,
    /// Number of undecided bits in the path registers
    path_bits: u32,
    status: DecoderStatus,
}

impl Default for ViterbiDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ViterbiDecoder {
    pub fn new() -> Self {
        Self {
            cost: [[0; NUM_STATES]; 2],
            path: [[0; NUM_STATES]; 2],
            last: 0,
            path_bits: 0,
            status: DecoderStatus::Idle,
        }
    }

    /// Reset all state for the start of a new frame.
    pub fn init(&mut self) {
        self.cost = [[0; NUM_STATES]; 2];
        self.cost[0][1..].fill(UNLIKELY_STATE_METRIC);
        self.path = [[0; NUM_STATES]; 2];
        self.last = 0;
        self.path_bits = 0;
        self.status = DecoderStatus::Running;
        tracing::debug!("viterbi: init");
    }

    pub fn status(&self) -> DecoderStatus {
        self.status
    }

    /// De-interleave and decode one 4-byte block, appending decoded bytes to `out`.
    ///
    /// `remaining` is the number of decoded bytes the caller still expects for this frame.
    /// Once fewer than four remain and the trellis holds exactly the terminator's extra bits,
    /// all remaining bytes are flushed and `done` is set.
    pub fn decode_block(&mut self, block: &[u8], remaining: usize, out: &mut Vec<u8>) -> FecResult<BlockOutcome> {
        self.decode_block_with(block, remaining, |b| out.push(b))
    }

    /// Same as `decode_block`, handing each decoded byte to `emit` instead of a `Vec`.
    pub fn decode_block_with<F: FnMut(u8)>(&mut self, block: &[u8], remaining: usize, mut emit: F) -> FecResult<BlockOutcome> {
        match self.status {
            DecoderStatus::Idle => return Err(FecError::DecoderNotInitialized),
            DecoderStatus::Finished => return Err(FecError::DecoderFinished),
            DecoderStatus::Running => {}
        }
        let block: &[u8; BLOCK_LEN] = block
            .try_into()
            .map_err(|_| FecError::InvalidBlockSize { expected: BLOCK_LEN, found: block.len() })?;

        let symbols = interleaver::deinterleave_block(block);
        tracing::trace!(
            "viterbi: block {:02X?} deinterleaved {:02X?} remaining {}",
            block,
            symbols,
            remaining
        );

        let mut remaining = remaining;
        let mut decoded = 0;
        let mut min_cost = Metric::MAX;

        for i in 0..SYMBOLS_PER_BLOCK {
            let symbol = (symbols[i / 4] >> (6 - 2 * (i % 4))) & 0x03;
            let last = self.last;
            let curr = last ^ 1;

            // Only the minimum of the final step is used for normalization
            min_cost = Metric::MAX;

            for dest in 0..NUM_STATES {
                let [src0, src1] = SOURCE_STATES[dest];
                let cost0 = self.cost[last][src0].saturating_add(hamming_weight(symbol ^ TRANSITION_OUTPUT[dest][0]));
                let cost1 = self.cost[last][src1].saturating_add(hamming_weight(symbol ^ TRANSITION_OUTPUT[dest][1]));

                // Ties go to the first source
                let (cost, src) = if cost0 <= cost1 { (cost0, src0) } else { (cost1, src1) };
                self.cost[curr][dest] = cost;
                self.path[curr][dest] = (self.path[last][src] << 1) | TRANSITION_INPUT[dest] as PathReg;
                min_cost = min_cost.min(cost);
            }

            self.path_bits += 1;
            if self.path_bits == PATH_DEPTH {
                emit((self.path[curr][0] >> (PATH_DEPTH - 8)) as u8);
                decoded += 1;
                self.path_bits -= 8;
                remaining = remaining.saturating_sub(1);
            }

            // Terminator processed, flush what is left in the state 0 path
            if remaining <= 3 && self.path_bits as usize == 8 * remaining + TERMINATOR_BITS {
                while self.path_bits >= 8 {
                    emit((self.path[curr][0] >> (self.path_bits - 8)) as u8);
                    decoded += 1;
                    self.path_bits -= 8;
                }
                self.status = DecoderStatus::Finished;
                tracing::debug!("viterbi: end of frame, {} bytes in final block", decoded);
                return Ok(BlockOutcome { decoded, done: true });
            }

            self.last = curr;
        }

        // Metrics are only renormalized once per block
        for c in self.cost[self.last].iter_mut() {
            *c -= min_cost;
        }

        Ok(BlockOutcome { decoded, done: false })
    }
}

#[inline]
fn hamming_weight(v: u8) -> Metric {
    v.count_ones() as Metric
}
