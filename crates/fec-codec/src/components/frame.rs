use fec_core::{FecError, FecResult};

use super::crc16;

/// Largest payload the single length byte can describe
pub const MAX_PAYLOAD_LEN: usize = 255;

/// Byte appended after the CRC to drive the encoder back towards state 0
pub const TRELLIS_TERMINATOR: u8 = 0x0B;

/// Length byte plus CRC
const FRAME_OVERHEAD: usize = 3;

/// Number of bytes fed to the convolutional encoder for a payload of `payload_len` bytes.
/// Always even: two terminator bytes when length byte + payload + CRC is even, one otherwise.
pub const fn framed_len(payload_len: usize) -> usize {
    2 * ((payload_len + FRAME_OVERHEAD) / 2 + 1)
}

/// Write the framed sequence for `payload` into `out`:
/// [len][payload][crc_hi][crc_lo][0x0B (0x0B)]
/// Returns the number of bytes written, which is `framed_len(payload.len())`.
pub fn build_into(payload: &[u8], out: &mut [u8]) -> FecResult<usize> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(FecError::PayloadTooLong { len: payload.len(), max: MAX_PAYLOAD_LEN });
    }
    let total = framed_len(payload.len());
    if out.len() < total {
        return Err(FecError::BufferTooSmall { needed: total, available: out.len() });
    }

    let len_byte = payload.len() as u8;
    out[0] = len_byte;
    out[1..=payload.len()].copy_from_slice(payload);

    let crc = crc16::checksum(&out[..=payload.len()]);
    let crc_pos = payload.len() + 1;
    out[crc_pos] = (crc >> 8) as u8;
    out[crc_pos + 1] = (crc & 0xFF) as u8;

    // Either one or two terminator bytes, depending on parity
    for b in out[crc_pos + 2..total].iter_mut() {
        *b = TRELLIS_TERMINATOR;
    }

    tracing::trace!("frame: len {} crc {:04X} framed {} bytes", len_byte, crc, total);
    Ok(total)
}

/// Allocating variant of `build_into`
pub fn build(payload: &[u8]) -> FecResult<Vec<u8>> {
    let mut out = vec![0u8; framed_len(payload.len().min(MAX_PAYLOAD_LEN))];
    let n = build_into(payload, &mut out)?;
    out.truncate(n);
    Ok(out)
}
