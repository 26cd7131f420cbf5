use fec_core::{FecError, FecResult};

use crate::components::crc16;

/// Length byte plus CRC
const HEADER_AND_CRC_LEN: usize = 3;

/// Borrowed view on the output of the decoder: [len][payload][crc_hi][crc_lo][trailing..]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedFrame<'a> {
    bytes: &'a [u8],
}

impl<'a> DecodedFrame<'a> {
    /// Check that the declared length and CRC fit in `bytes`
    pub fn parse(bytes: &'a [u8]) -> FecResult<Self> {
        let Some(&len) = bytes.first() else {
            return Err(FecError::FrameTooShort { declared: 0, available: 0 });
        };
        let needed = len as usize + HEADER_AND_CRC_LEN;
        if bytes.len() < needed {
            return Err(FecError::FrameTooShort { declared: len as usize, available: bytes.len() });
        }
        Ok(Self { bytes })
    }

    /// Payload length as declared by the length byte
    pub fn length(&self) -> usize {
        self.bytes[0] as usize
    }

    pub fn payload(&self) -> &'a [u8] {
        &self.bytes[1..=self.length()]
    }

    /// Received CRC, big endian
    pub fn crc(&self) -> u16 {
        let pos = self.length() + 1;
        u16::from_be_bytes([self.bytes[pos], self.bytes[pos + 1]])
    }

    /// CRC over the length byte and payload
    pub fn computed_crc(&self) -> u16 {
        crc16::checksum(&self.bytes[..=self.length()])
    }

    pub fn crc_ok(&self) -> bool {
        self.crc() == self.computed_crc()
    }

    /// Bytes following the CRC, typically a single trellis terminator
    pub fn trailing(&self) -> &'a [u8] {
        &self.bytes[self.length() + HEADER_AND_CRC_LEN..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_frame() {
        let bytes = [0x06, 0x03, 0x01, 0x00, 0x01, 0x02, 0x03, 0xDA, 0x05];
        let frame = DecodedFrame::parse(&bytes).unwrap();
        assert_eq!(frame.length(), 6);
        assert_eq!(frame.payload(), &[0x03, 0x01, 0x00, 0x01, 0x02, 0x03]);
        assert_eq!(frame.crc(), 0xDA05);
        assert_eq!(frame.computed_crc(), 0xDA05);
        assert!(frame.crc_ok());
        assert!(frame.trailing().is_empty());
    }

    #[test]
    fn test_empty_payload_with_terminator() {
        let bytes = [0x00, 0xFD, 0x02];
        let frame = DecodedFrame::parse(&bytes).unwrap();
        assert!(frame.payload().is_empty());
        assert!(frame.crc_ok());

        // Odd-length payloads come out of the decoder with a terminator byte appended
        let bytes = [0x01, 0x42, 0x00, 0x00, 0x0B];
        let frame = DecodedFrame::parse(&bytes).unwrap();
        assert_eq!(frame.payload(), &[0x42]);
        assert_eq!(frame.trailing(), &[0x0B]);
    }

    #[test]
    fn test_crc_mismatch() {
        let bytes = [0x06, 0x03, 0x01, 0x00, 0x01, 0x02, 0x04, 0xDA, 0x05];
        let frame = DecodedFrame::parse(&bytes).unwrap();
        assert!(!frame.crc_ok());
        assert_eq!(frame.crc(), 0xDA05);
    }

    #[test]
    fn test_too_short() {
        assert_eq!(
            DecodedFrame::parse(&[]),
            Err(FecError::FrameTooShort { declared: 0, available: 0 })
        );
        assert_eq!(
            DecodedFrame::parse(&[0x06, 0x03, 0x01, 0x00, 0x01, 0x02, 0x03, 0xDA]),
            Err(FecError::FrameTooShort { declared: 6, available: 8 })
        );
    }
}
