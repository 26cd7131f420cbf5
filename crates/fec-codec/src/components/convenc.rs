// Convolutional encoder for the CC1101 FEC mode

use fec_core::{FecError, FecResult};

/// 2-bit encoder output, indexed by the top 4 bits of the shift register
/// (three previous input bits followed by the current one).
pub const ENCODE_TABLE: [u8; 16] = [
    0, 3, 1, 2,
    3, 0, 2, 1,
    3, 0, 2, 1,
    0, 3, 1, 2,
];

/// Shift register of the rate-1/2 encoder.
/// The top 3 bits carry the trellis state across bytes; the low 8 bits hold the byte being encoded.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConvEncState {
    reg: u16,
}

impl ConvEncState {
    const REG_MASK: u16 = 0x7FF;
    const STATE_MASK: u16 = 0x700;

    /// Create a new encoder state (all zeros).
    #[inline]
    pub fn new() -> Self {
        Self { reg: 0 }
    }

    /// Reset to all-zero state.
    #[inline]
    pub fn reset(&mut self) {
        self.reg = 0;
    }

    /// Current trellis state (three most recent input bits)
    #[inline]
    pub fn state(&self) -> u8 {
        (self.reg >> 8) as u8
    }

    /// Encode one byte into 8 symbols of 2 bits, packed MSB first.
    #[inline]
    pub fn encode_byte(&mut self, byte: u8) -> u16 {
        self.reg = (self.reg & Self::STATE_MASK) | byte as u16;
        let mut out = 0u16;
        for _ in 0..8 {
            out = (out << 2) | ENCODE_TABLE[(self.reg >> 7) as usize] as u16;
            self.reg = (self.reg << 1) & Self::REG_MASK;
        }
        out
    }

    /// Encode `input` into `2 * input.len()` bytes of `output`.
    /// Returns the number of bytes written.
    pub fn encode(&mut self, input: &[u8], output: &mut [u8]) -> FecResult<usize> {
        let needed = input.len() * 2;
        if output.len() < needed {
            return Err(FecError::BufferTooSmall { needed, available: output.len() });
        }
        for (&byte, out) in input.iter().zip(output.chunks_exact_mut(2)) {
            out.copy_from_slice(&self.encode_byte(byte).to_be_bytes());
        }
        Ok(needed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_input_stays_zero() {
        let mut ces = ConvEncState::new();
        assert_eq!(ces.encode_byte(0x00), 0x0000);
        assert_eq!(ces.state(), 0);
    }

    #[test]
    fn test_state_carried_across_bytes() {
        let mut ces = ConvEncState::new();
        // 0x07 leaves its last three bits (111) in the state
        ces.encode_byte(0x07);
        assert_eq!(ces.state(), 0b111);

        // Same byte encodes differently depending on the carried state
        let after_ones = ces.encode_byte(0x00);
        ces.reset();
        let after_zeros = ces.encode_byte(0x00);
        assert_ne!(after_ones, after_zeros);
    }

    #[test]
    fn test_reference_frame() {
        // Output before interleaving for the start of the reference frame
        let mut ces = ConvEncState::new();
        let mut out = [0u8; 8];
        let n = ces.encode(&[0x06, 0x03, 0x01, 0x00], &mut out).unwrap();
        assert_eq!(n, 8);
        assert_eq!(out, [0x00, 0x3A, 0x30, 0x0E, 0x8C, 0x03, 0x7C, 0x00]);
    }

    #[test]
    fn test_output_too_small() {
        let mut ces = ConvEncState::new();
        let mut out = [0u8; 3];
        assert_eq!(
            ces.encode(&[1, 2], &mut out),
            Err(FecError::BufferTooSmall { needed: 4, available: 3 })
        );
    }
}
