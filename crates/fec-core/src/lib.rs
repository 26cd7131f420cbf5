//! Core utilities for the CC1101 FEC codec
//!
//! This crate provides the fundamental types shared by the codec, its configuration and the tool:
//! - BitBuffer for moving '0'/'1' bitstreams in and out of byte buffers
//! - FecError, the single error type of the codec
//! - Logging setup

pub mod bitbuffer;
pub mod debug;
pub mod fec_error;

pub use bitbuffer::BitBuffer;
pub use fec_error::{FecError, FecResult};
