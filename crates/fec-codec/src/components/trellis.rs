//! Trellis of the CC1101 rate 1/2, K=4 convolutional code.
//!
//! A state is the last three encoder input bits. Each destination state can be reached from
//! two source states; the input bit that leads into a state is its least significant bit.

pub const NUM_STATES: usize = 8;

/// Source states for each destination state
pub const SOURCE_STATES: [[usize; 2]; NUM_STATES] = [
    [0, 4],
    [0, 4],
    [1, 5],
    [1, 5],
    [2, 6],
    [2, 6],
    [3, 7],
    [3, 7],
];

/// Expected 2-bit encoder output on each transition, indexed like SOURCE_STATES
pub const TRANSITION_OUTPUT: [[u8; 2]; NUM_STATES] = [
    [0b00, 0b11],
    [0b11, 0b00],
    [0b01, 0b10],
    [0b10, 0b01],
    [0b11, 0b00],
    [0b00, 0b11],
    [0b10, 0b01],
    [0b01, 0b10],
];

/// Encoder input bit that leads into each destination state
pub const TRANSITION_INPUT: [u8; NUM_STATES] = [0, 1, 0, 1, 0, 1, 0, 1];
