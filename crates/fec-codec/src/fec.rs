use fec_core::{FecError, FecResult};

use crate::components::convenc::ConvEncState;
use crate::components::frame::{self, MAX_PAYLOAD_LEN};
use crate::components::interleaver::{self, BLOCK_LEN};
use crate::components::viterbi::ViterbiDecoder;
use crate::decoded_frame::DecodedFrame;

const MAX_FRAMED_LEN: usize = frame::framed_len(MAX_PAYLOAD_LEN);

/// Number of encoded bytes produced for a payload of `payload_len` bytes
pub const fn encoded_len(payload_len: usize) -> usize {
    2 * frame::framed_len(payload_len)
}

/// Number of bytes the decoder emits for an encoded stream of `encoded_len` bytes.
/// This is the framed sequence minus its last terminator byte, so odd-length payloads
/// come back with one trailing terminator byte after the CRC.
pub fn decoded_len(encoded_len: usize) -> FecResult<usize> {
    if encoded_len < BLOCK_LEN {
        return Err(FecError::StreamTooShort { len: encoded_len, min: BLOCK_LEN });
    }
    Ok((encoded_len - BLOCK_LEN) / 2 + 1)
}

/// Frame, convolutionally encode and interleave `payload` into `out`.
/// Returns the number of bytes written.
pub fn encode_into(payload: &[u8], out: &mut [u8]) -> FecResult<usize> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(FecError::PayloadTooLong { len: payload.len(), max: MAX_PAYLOAD_LEN });
    }
    let needed = encoded_len(payload.len());
    if out.len() < needed {
        return Err(FecError::BufferTooSmall { needed, available: out.len() });
    }

    let mut framed = [0u8; MAX_FRAMED_LEN];
    let framed_len = frame::build_into(payload, &mut framed)?;
    tracing::trace!("encode: framed {:02X?}", &framed[..framed_len]);

    let out = &mut out[..needed];
    let mut ces = ConvEncState::new();
    ces.encode(&framed[..framed_len], out)?;
    interleaver::interleave(out)?;
    tracing::trace!("encode: interleaved {:02X?}", out);

    Ok(needed)
}

/// Allocating variant of `encode_into`
pub fn encode(payload: &[u8]) -> FecResult<Vec<u8>> {
    let mut out = vec![0u8; encoded_len(payload.len().min(MAX_PAYLOAD_LEN))];
    let n = encode_into(payload, &mut out)?;
    out.truncate(n);
    tracing::debug!("encode: {} payload bytes -> {} encoded bytes", payload.len(), n);
    Ok(out)
}

/// Decode a complete encoded stream and return the payload carried in the frame.
/// Fails with `FrameTooShort` when the decoded length byte does not fit the stream.
pub fn decode(encoded: &[u8]) -> FecResult<Vec<u8>> {
    let decoded = decode_frame(encoded)?;
    let payload = DecodedFrame::parse(&decoded)?.payload().to_vec();
    Ok(payload)
}

/// Decode a complete encoded stream into the decoded frame: length byte, payload, CRC and,
/// for odd payload lengths, one terminator byte. The number of decoded bytes is derived
/// from the stream length, see `decoded_len`.
pub fn decode_frame(encoded: &[u8]) -> FecResult<Vec<u8>> {
    let expected = decoded_len(encoded.len())?;
    let mut out = Vec::with_capacity(expected);
    decode_expecting(encoded, expected, |b| out.push(b))?;
    Ok(out)
}

/// Decode the frame of a stream carrying a payload of known length. Fails if the stream
/// ends before the whole frame has been decoded.
pub fn decode_frame_expecting(encoded: &[u8], payload_len: usize) -> FecResult<Vec<u8>> {
    if payload_len > MAX_PAYLOAD_LEN {
        return Err(FecError::PayloadTooLong { len: payload_len, max: MAX_PAYLOAD_LEN });
    }
    let expected = frame::framed_len(payload_len) - 1;
    let mut out = Vec::with_capacity(expected);
    decode_expecting(encoded, expected, |b| out.push(b))?;
    Ok(out)
}

/// Decode the payload of `encoded` into `out` without allocating. The whole frame is
/// staged in `out` first, so it must hold `decoded_len(encoded.len())` bytes.
/// Returns the payload length.
pub fn decode_into(encoded: &[u8], out: &mut [u8]) -> FecResult<usize> {
    let needed = decoded_len(encoded.len())?;
    if out.len() < needed {
        return Err(FecError::BufferTooSmall { needed, available: out.len() });
    }

    let mut written = 0;
    decode_expecting(encoded, needed, |b| {
        if let Some(slot) = out.get_mut(written) {
            *slot = b;
        }
        written += 1;
    })?;
    if written > out.len() {
        return Err(FecError::BufferTooSmall { needed: written, available: out.len() });
    }

    let len = DecodedFrame::parse(&out[..written])?.length();
    out.copy_within(1..=len, 0);
    Ok(len)
}

/// Feed `encoded` to a fresh decoder session 4 bytes at a time until `expected` bytes
/// have been emitted. Bytes after the block that completes the frame are ignored.
/// Returns the number of bytes handed to `emit`.
fn decode_expecting<F: FnMut(u8)>(encoded: &[u8], expected: usize, mut emit: F) -> FecResult<usize> {
    let mut decoder = ViterbiDecoder::new();
    decoder.init();

    let mut remaining = expected;
    let mut consumed = 0;
    let mut total = 0;

    for block in encoded.chunks(BLOCK_LEN) {
        let outcome = decoder.decode_block_with(block, remaining, &mut emit)?;
        consumed += block.len();
        total += outcome.decoded;
        remaining = remaining.saturating_sub(outcome.decoded);

        if outcome.done {
            if consumed < encoded.len() {
                tracing::debug!("decode: ignoring {} bytes after end of frame", encoded.len() - consumed);
            }
            tracing::debug!("decode: {} encoded bytes -> {} decoded bytes", consumed, total);
            return Ok(total);
        }
    }

    tracing::warn!("decode: stream ended after {} bytes, {} decoded bytes missing", consumed, remaining);
    Err(FecError::TruncatedStream { consumed, remaining })
}
