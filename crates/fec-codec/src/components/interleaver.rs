use fec_core::{FecError, FecResult};

/// Interleaver window in bytes (16 encoder symbols)
pub const BLOCK_LEN: usize = 4;

/// Interleave one window of encoder output.
/// Output symbol j (MSB first) is taken from byte 3 - (j % 4), symbol position j / 4 counted from the LSB.
pub fn interleave_block(input: &[u8; BLOCK_LEN]) -> [u8; BLOCK_LEN] {
    let mut v = 0u32;
    for j in 0..16 {
        let src = input[3 - (j & 0x03)];
        let sym = (src >> (2 * (j >> 2))) & 0x03;
        v = (v << 2) | sym as u32;
    }
    v.to_be_bytes()
}

/// Inverse of `interleave_block`.
pub fn deinterleave_block(input: &[u8; BLOCK_LEN]) -> [u8; BLOCK_LEN] {
    let mut out = [0u8; BLOCK_LEN];
    for (i_out, byte) in out.iter_mut().enumerate() {
        for i_in in (0..BLOCK_LEN).rev() {
            *byte = (*byte << 2) | ((input[i_in] >> (2 * i_out)) & 0x03);
        }
    }
    out
}

/// Interleave every 4-byte window of `buf` in place.
/// `buf.len()` must be a multiple of BLOCK_LEN, which holds for any encoded frame.
pub fn interleave(buf: &mut [u8]) -> FecResult<()> {
    if buf.len() % BLOCK_LEN != 0 {
        return Err(FecError::InvalidBlockSize { expected: BLOCK_LEN, found: buf.len() % BLOCK_LEN });
    }
    for chunk in buf.chunks_exact_mut(BLOCK_LEN) {
        let block: [u8; BLOCK_LEN] = [chunk[0], chunk[1], chunk[2], chunk[3]];
        chunk.copy_from_slice(&interleave_block(&block));
    }
    Ok(())
}
