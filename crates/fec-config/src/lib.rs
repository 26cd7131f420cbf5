//! CC1101 FEC tool configuration
//!
//! This crate provides configuration loading and parsing:
//! - TOML configuration file parsing
//! - Packet framing settings (preamble byte, sync word detection)

pub mod fec_config;
pub mod toml_config;

pub use fec_config::*;
pub use toml_config::*;
