mod common;

use fec_codec::{DecoderStatus, ViterbiDecoder, decode, decode_frame_expecting, decode_into, encode, encode_into};
use fec_core::FecError;

use common::Session;

const REFERENCE_ENCODED: [u8; 20] = [
    0x88, 0xC8, 0x3C, 0x00, 0x0C, 0x33, 0x30, 0x12, 0x4C, 0xF0,
    0x30, 0x10, 0xB8, 0xDC, 0xA3, 0x53, 0x40, 0x34, 0x7F, 0xE3,
];

#[test]
fn test_uninitialized_session() {
    let mut dec = ViterbiDecoder::new();
    let mut out = Vec::new();
    assert_eq!(dec.decode_block(&REFERENCE_ENCODED[..4], 9, &mut out), Err(FecError::DecoderNotInitialized));
    assert!(out.is_empty());
}

#[test]
fn test_block_after_done() {
    let mut session = Session::new(&REFERENCE_ENCODED);
    while session.step() {}
    assert_eq!(session.decoder.status(), DecoderStatus::Finished);

    let mut out = Vec::new();
    assert_eq!(
        session.decoder.decode_block(&REFERENCE_ENCODED[..4], 1, &mut out),
        Err(FecError::DecoderFinished)
    );
}

#[test]
fn test_wrong_block_size() {
    let mut dec = ViterbiDecoder::new();
    dec.init();
    let mut out = Vec::new();
    assert_eq!(
        dec.decode_block(&REFERENCE_ENCODED[..2], 9, &mut out),
        Err(FecError::InvalidBlockSize { expected: 4, found: 2 })
    );
}

#[test]
fn test_truncated_stream() {
    assert_eq!(
        decode_frame_expecting(&REFERENCE_ENCODED[..12], 6),
        Err(FecError::TruncatedStream { consumed: 12, remaining: 6 })
    );
}

#[test]
fn test_stream_too_short() {
    assert_eq!(decode(&[0x88, 0xC8]), Err(FecError::StreamTooShort { len: 2, min: 4 }));
    assert_eq!(decode(&[]), Err(FecError::StreamTooShort { len: 0, min: 4 }));
}

#[test]
fn test_undersized_buffers() {
    let mut out = [0u8; 10];
    assert_eq!(
        encode_into(&[0x03, 0x01, 0x00, 0x01, 0x02, 0x03], &mut out),
        Err(FecError::BufferTooSmall { needed: 20, available: 10 })
    );
    assert_eq!(
        decode_into(&REFERENCE_ENCODED, &mut out[..4]),
        Err(FecError::BufferTooSmall { needed: 9, available: 4 })
    );
}

#[test]
fn test_oversized_payload() {
    let payload = vec![0u8; 300];
    assert_eq!(encode(&payload), Err(FecError::PayloadTooLong { len: 300, max: 255 }));
    assert_eq!(decode_frame_expecting(&REFERENCE_ENCODED, 256), Err(FecError::PayloadTooLong { len: 256, max: 255 }));
}
