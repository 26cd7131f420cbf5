#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fec_codec::components::frame;
use fec_codec::{BlockOutcome, ViterbiDecoder};

/// Reproducible source of test payloads
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn random_payload(rng: &mut StdRng, len: usize) -> Vec<u8> {
    let mut payload = vec![0u8; len];
    rng.fill(&mut payload[..]);
    payload
}

/// Decoded frame expected for `payload`: the framed sequence without its last byte
pub fn expected_decoded(payload: &[u8]) -> Vec<u8> {
    let mut framed = frame::build(payload).unwrap();
    framed.pop();
    framed
}

/// Flip bit `bit` (MSB first) of `data`
pub fn flip_bit(data: &mut [u8], bit: usize) {
    data[bit / 8] ^= 0x80 >> (bit % 8);
}

/// Step-by-step decode session, for driving several sessions side by side
pub struct Session<'a> {
    pub decoder: ViterbiDecoder,
    pub encoded: &'a [u8],
    pub out: Vec<u8>,
    pub remaining: usize,
    pub offset: usize,
    pub done: bool,
}

impl<'a> Session<'a> {
    pub fn new(encoded: &'a [u8]) -> Self {
        let mut decoder = ViterbiDecoder::new();
        decoder.init();
        Self {
            decoder,
            encoded,
            out: Vec::new(),
            remaining: fec_codec::decoded_len(encoded.len()).unwrap(),
            offset: 0,
            done: false,
        }
    }

    /// Feed the next block. Returns false once the frame is complete.
    pub fn step(&mut self) -> bool {
        if self.done {
            return false;
        }
        let block = &self.encoded[self.offset..self.offset + 4];
        let BlockOutcome { decoded, done } = self.decoder.decode_block(block, self.remaining, &mut self.out).unwrap();
        self.offset += 4;
        self.remaining -= decoded;
        self.done = done;
        !done
    }

    pub fn run(mut self) -> Vec<u8> {
        while self.step() {}
        self.out
    }
}
