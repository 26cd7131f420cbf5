mod frames;

pub use frames::*;
