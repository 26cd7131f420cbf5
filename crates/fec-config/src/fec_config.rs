use serde::Deserialize;

/// Default preamble byte sent by the CC1101 (alternating 1010...)
pub const DEFAULT_PREAMBLE_BYTE: u8 = 0xAA;

/// How the sync word following the preamble is located
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum SyncWordMode {
    /// Detect 0, 2 or 4 sync bytes from the captured data
    Auto,
    /// No sync word present
    None,
    /// 16-bit sync word
    Short,
    /// 32-bit sync word (16-bit word sent twice)
    Long,
}

impl SyncWordMode {
    /// Fixed sync word length in bytes, or None when it has to be detected
    pub fn fixed_len(&self) -> Option<usize> {
        match self {
            SyncWordMode::Auto => None,
            SyncWordMode::None => Some(0),
            SyncWordMode::Short => Some(2),
            SyncWordMode::Long => Some(4),
        }
    }
}

/// Layout of the packet header surrounding the FEC-coded data
#[derive(Debug, Clone)]
pub struct CfgFraming {
    /// Value of each preamble byte
    pub preamble_byte: u8,
    pub sync_word: SyncWordMode,
}

impl Default for CfgFraming {
    fn default() -> Self {
        Self {
            preamble_byte: DEFAULT_PREAMBLE_BYTE,
            sync_word: SyncWordMode::Auto,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FecConfig {
    /// Optional verbose log file
    pub debug_log: Option<String>,
    /// Log whether the CRC of decoded frames matches. Never alters the output.
    pub check_crc: bool,
    pub framing: CfgFraming,
}

impl FecConfig {
    /// Validate that the combination of settings is usable.
    pub fn validate(&self) -> Result<(), &str> {
        // Sync detection reads zeros past the end of a capture, which would be
        // indistinguishable from a zero preamble
        if self.framing.sync_word == SyncWordMode::Auto && self.framing.preamble_byte == 0x00 {
            return Err("automatic sync word detection requires a non-zero preamble_byte");
        }
        Ok(())
    }
}
