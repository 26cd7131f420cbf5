use std::fmt;

use crate::fec_error::{FecError, FecResult};

/// Growable MSB-first bit container used to move captured bitstreams in and out of the codec.
///
/// Bits are written at `pos`. `end` marks the number of valid bits,
/// which does not need to be a multiple of 8 (captures often carry a few stray trailing bits).
pub struct BitBuffer {
    buffer: Vec<u8>,
    pos: usize,         // next bit offset for writing
    end: usize,         // bits at or after this are not valid
}

impl BitBuffer {
    /// Create an empty buffer with room for `initial_cap_bits` bits before reallocating.
    pub fn new(initial_cap_bits: usize) -> Self {
        BitBuffer {
            buffer: Vec::with_capacity(initial_cap_bits.div_ceil(8)),
            pos: 0,
            end: 0,
        }
    }

    /// Wrap a byte slice; all bits are readable, pos is at 0.
    pub fn from_bytes(data: &[u8]) -> Self {
        BitBuffer {
            buffer: data.to_vec(),
            pos: 0,
            end: data.len() * 8,
        }
    }

    /// Parse a string of '0'/'1' characters. Pos is left at 0.
    pub fn from_bitstr(bitstr: &str) -> FecResult<Self> {
        let mut buf = BitBuffer::new(bitstr.len());
        for (pos, c) in bitstr.chars().enumerate() {
            match c {
                '0' => buf.write_bit(0),
                '1' => buf.write_bit(1),
                found => return Err(FecError::InvalidBitChar { found, pos }),
            }
        }
        buf.pos = 0;
        Ok(buf)
    }

    /// Render all valid bits as '0'/'1' characters.
    pub fn to_bitstr(&self) -> String {
        let mut s = String::with_capacity(self.end);
        for i in 0..self.end {
            s.push(if self.bit_at(i) == 1 { '1' } else { '0' });
        }
        s
    }

    /// Render a byte slice as '0'/'1' characters, 8 per byte.
    pub fn bytes_to_bitstr(data: &[u8]) -> String {
        BitBuffer::from_bytes(data).to_bitstr()
    }

    /// Returns the complete bytes held by the buffer. Trailing bits that do not
    /// fill a whole byte are dropped.
    pub fn to_bytes(&self) -> Vec<u8> {
        let full = self.end / 8;
        let stray = self.end % 8;
        if stray != 0 {
            tracing::warn!("to_bytes: dropping {} trailing bits that do not complete a byte", stray);
        }
        self.buffer[..full].to_vec()
    }

    /// Write a single bit at pos, growing the buffer when needed
    pub fn write_bit(&mut self, value: u8) {
        assert!(value == 0 || value == 1, "write_bit: value must be 0 or 1");
        let index = self.pos / 8;
        if index >= self.buffer.len() {
            self.buffer.resize(index + 1, 0);
        }
        let shift = 7 - (self.pos % 8) as u8;
        self.buffer[index] = (self.buffer[index] & !(1 << shift)) | (value << shift);
        self.pos += 1;
        self.end = self.end.max(self.pos);
    }

    /// Number of valid bits
    pub fn len_bits(&self) -> usize {
        self.end
    }

    #[inline]
    fn bit_at(&self, bit: usize) -> u8 {
        (self.buffer[bit / 8] >> (7 - (bit % 8))) & 1
    }
}

impl fmt::Debug for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitBuffer {{ len: {}, pos: {}, bits: {} }}", self.end, self.pos, self.to_bitstr())
    }
}
