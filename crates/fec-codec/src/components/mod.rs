pub mod convenc;
pub mod crc16;
pub mod frame;
pub mod interleaver;
pub mod trellis;
pub mod viterbi;
