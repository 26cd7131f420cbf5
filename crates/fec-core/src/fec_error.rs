use thiserror::Error;

/// Result type for codec operations
pub type FecResult<T> = Result<T, FecError>;

/// Errors returned by the codec and its adapters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FecError {
    /// Caller-provided output buffer cannot hold the result
    #[error("output buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Payload does not fit the 1-byte length field
    #[error("payload of {len} bytes exceeds maximum of {max}")]
    PayloadTooLong { len: usize, max: usize },

    /// Encoded stream ran out of blocks before the decoder signalled end of frame
    #[error("encoded stream truncated: {remaining} decoded bytes still expected after {consumed} bytes")]
    TruncatedStream { consumed: usize, remaining: usize },

    /// Encoded stream too short to contain a single frame
    #[error("encoded stream of {len} bytes is shorter than one {min}-byte block")]
    StreamTooShort { len: usize, min: usize },

    /// Decoded frame is shorter than its length byte claims
    #[error("decoded frame declares {declared} payload bytes, only {available} available")]
    FrameTooShort { declared: usize, available: usize },

    /// Bitstring contains something other than '0' or '1'
    #[error("invalid character {found:?} at bit {pos}; only '0' or '1' allowed")]
    InvalidBitChar { found: char, pos: usize },

    /// Preamble and sync word run past the end of the packet
    #[error("header of {header} bytes does not fit packet of {len} bytes")]
    HeaderTooLong { header: usize, len: usize },

    /// Captured packet lacks the length byte and trailing bytes around its payload
    #[error("packet data of {len} bytes is shorter than the {min} bytes of length and trailer")]
    PacketTooShort { len: usize, min: usize },

    /// decode_block called before init
    #[error("decoder not initialized")]
    DecoderNotInitialized,

    /// decode_block called after end of frame was signalled
    #[error("decoder already finished this frame")]
    DecoderFinished,

    /// decode_block called with a block of the wrong size
    #[error("invalid block size {found}, expected {expected}")]
    InvalidBlockSize { expected: usize, found: usize },
}
