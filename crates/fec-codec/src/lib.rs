//! Forward error correction for the TI CC1101 transceiver
//!
//! Frames a payload with a length byte, CRC-16 and trellis terminator, then applies the
//! rate-1/2 K=4 convolutional code and 4-byte interleaving used by the CC1101 FEC mode.
//! Decoding runs a streaming hard-decision Viterbi decoder over 4-byte blocks.

pub mod components;
pub mod decoded_frame;
pub mod fec;
pub mod packet;

pub use components::viterbi::{BlockOutcome, DecoderStatus, ViterbiDecoder};
pub use decoded_frame::DecodedFrame;
pub use fec::{decode, decode_frame, decode_frame_expecting, decode_into, decoded_len, encode, encode_into, encoded_len};
pub use packet::{PacketLayout, PacketMode};
