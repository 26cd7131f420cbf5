use fec_config::{CfgFraming, FecConfig};
use fec_core::{FecError, FecResult};

use crate::decoded_frame::DecodedFrame;
use crate::fec;

/// Length byte before and two status/CRC bytes after the payload of a captured packet
const CAPTURE_LEN_BYTES: usize = 1;
const CAPTURE_TRAILER_BYTES: usize = 2;

/// What to do with a captured packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketMode {
    /// Re-encode the payload of a packet captured without FEC; header is kept
    Encode,
    /// Decode an FEC-coded packet, optionally dropping preamble and sync word from the output
    Decode { keep_header: bool },
}

/// Preamble and sync word lengths found at the start of a captured packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PacketLayout {
    pub preamble_len: usize,
    pub sync_len: usize,
}

impl PacketLayout {
    /// Count leading preamble bytes and work out the sync word length, either fixed by
    /// the configuration or detected from the bytes following the preamble.
    pub fn detect(data: &[u8], cfg: &CfgFraming) -> Self {
        let preamble_len = data.iter().take_while(|&&b| b == cfg.preamble_byte).count();
        let sync_len = match cfg.sync_word.fixed_len() {
            Some(len) => len,
            None => detect_sync_len(data, preamble_len),
        };
        tracing::debug!("packet: preamble {} bytes, sync word {} bytes", preamble_len, sync_len);
        Self { preamble_len, sync_len }
    }

    pub fn header_len(&self) -> usize {
        self.preamble_len + self.sync_len
    }

    /// Split `data` into header and body
    pub fn split<'a>(&self, data: &'a [u8]) -> FecResult<(&'a [u8], &'a [u8])> {
        let header = self.header_len();
        if header > data.len() {
            return Err(FecError::HeaderTooLong { header, len: data.len() });
        }
        Ok(data.split_at(header))
    }

    /// Prepend the header of `packet` to `body`
    pub fn assemble(&self, packet: &[u8], body: &[u8]) -> FecResult<Vec<u8>> {
        let (header, _) = self.split(packet)?;
        let mut out = Vec::with_capacity(header.len() + body.len());
        out.extend_from_slice(header);
        out.extend_from_slice(body);
        Ok(out)
    }
}

/// Sync word length following a preamble of `p` bytes.
/// A 32-bit sync word repeats its 16-bit half; bytes past the end of `data` read as zero.
fn detect_sync_len(data: &[u8], p: usize) -> usize {
    if p == 0 {
        return 0;
    }
    let b = |i: usize| data.get(i).copied().unwrap_or(0);
    let first_same = b(p) == b(p + 2);
    let second_same = b(p + 1) == b(p + 3);
    match (first_same, second_same) {
        (true, true) => 4,
        (false, false) => 2,
        _ => 0,
    }
}

/// Payload of a packet captured before encoding: [len][payload][2 trailing bytes].
/// The length byte and trailer are dropped, the frame builder recomputes them.
pub fn capture_payload(data: &[u8]) -> FecResult<&[u8]> {
    let min = CAPTURE_LEN_BYTES + CAPTURE_TRAILER_BYTES;
    if data.len() < min {
        return Err(FecError::PacketTooShort { len: data.len(), min });
    }
    Ok(&data[CAPTURE_LEN_BYTES..data.len() - CAPTURE_TRAILER_BYTES])
}

/// Encode or decode one captured packet, including preamble and sync word handling
pub fn process(packet: &[u8], mode: PacketMode, cfg: &FecConfig) -> FecResult<Vec<u8>> {
    let layout = PacketLayout::detect(packet, &cfg.framing);
    let (_, body) = layout.split(packet)?;

    match mode {
        PacketMode::Encode => {
            let payload = capture_payload(body)?;
            let encoded = fec::encode(payload)?;
            tracing::info!("packet: encoded {} payload bytes into {} bytes", payload.len(), encoded.len());
            layout.assemble(packet, &encoded)
        }
        PacketMode::Decode { keep_header } => {
            let decoded = fec::decode_frame(body)?;
            tracing::info!("packet: decoded {} bytes into {} bytes", body.len(), decoded.len());
            if cfg.check_crc {
                log_crc_status(&decoded);
            }
            if keep_header {
                layout.assemble(packet, &decoded)
            } else {
                Ok(decoded)
            }
        }
    }
}

fn log_crc_status(decoded: &[u8]) {
    match DecodedFrame::parse(decoded) {
        Ok(frame) if frame.crc_ok() => {
            tracing::info!("packet: CRC ok ({:04X}), payload {} bytes", frame.crc(), frame.length());
        }
        Ok(frame) => {
            tracing::warn!(
                "packet: CRC mismatch, received {:04X} computed {:04X}",
                frame.crc(),
                frame.computed_crc()
            );
        }
        Err(e) => tracing::warn!("packet: cannot check CRC: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use fec_config::SyncWordMode;

    use super::*;

    const REFERENCE_CAPTURE: [u8; 17] = [
        0xAA, 0xAA, 0xAA, 0xAA, 0x57, 0x43, 0x57, 0x43,
        0x06, 0x03, 0x01, 0x00, 0x01, 0x02, 0x03, 0xDA, 0x05,
    ];
    const REFERENCE_ENCODED: [u8; 20] = [
        0x88, 0xC8, 0x3C, 0x00, 0x0C, 0x33, 0x30, 0x12, 0x4C, 0xF0,
        0x30, 0x10, 0xB8, 0xDC, 0xA3, 0x53, 0x40, 0x34, 0x7F, 0xE3,
    ];

    fn layout(preamble_len: usize, sync_len: usize) -> PacketLayout {
        PacketLayout { preamble_len, sync_len }
    }

    #[test]
    fn test_detect_long_sync() {
        let l = PacketLayout::detect(&REFERENCE_CAPTURE, &CfgFraming::default());
        assert_eq!(l, layout(4, 4));
        assert_eq!(l.header_len(), 8);
    }

    #[test]
    fn test_detect_short_sync() {
        let data = [0xAA, 0xAA, 0xD3, 0x91, 0x06, 0x03, 0x01];
        assert_eq!(PacketLayout::detect(&data, &CfgFraming::default()), layout(2, 2));
    }

    #[test]
    fn test_detect_no_sync() {
        let data = [0xAA, 0x12, 0x34, 0x12, 0x99];
        assert_eq!(PacketLayout::detect(&data, &CfgFraming::default()), layout(1, 0));
    }

    #[test]
    fn test_detect_no_preamble() {
        let data = [0x06, 0x03, 0x01, 0x06, 0x03];
        assert_eq!(PacketLayout::detect(&data, &CfgFraming::default()), layout(0, 0));
    }

    #[test]
    fn test_detect_reads_zero_past_end() {
        let data = [0xAA, 0xAA, 0x00];
        let l = PacketLayout::detect(&data, &CfgFraming::default());
        assert_eq!(l, layout(2, 4));
        assert_eq!(l.split(&data), Err(FecError::HeaderTooLong { header: 6, len: 3 }));
    }

    #[test]
    fn test_fixed_sync_and_preamble_byte() {
        let cfg = CfgFraming { preamble_byte: 0x55, sync_word: SyncWordMode::Short };
        let data = [0x55, 0x55, 0x55, 0x57, 0x43, 0x57, 0x43];
        assert_eq!(PacketLayout::detect(&data, &cfg), layout(3, 2));
    }

    #[test]
    fn test_split_and_assemble() {
        let l = layout(4, 4);
        let (header, body) = l.split(&REFERENCE_CAPTURE).unwrap();
        assert_eq!(header, &REFERENCE_CAPTURE[..8]);
        assert_eq!(body, &REFERENCE_CAPTURE[8..]);
        let out = l.assemble(&REFERENCE_CAPTURE, &[0x01, 0x02]).unwrap();
        assert_eq!(out, vec![0xAA, 0xAA, 0xAA, 0xAA, 0x57, 0x43, 0x57, 0x43, 0x01, 0x02]);
    }

    #[test]
    fn test_capture_payload() {
        assert_eq!(capture_payload(&REFERENCE_CAPTURE[8..]), Ok(&[0x03, 0x01, 0x00, 0x01, 0x02, 0x03][..]));
        assert_eq!(capture_payload(&[0x00, 0x01, 0x02]), Ok(&[][..]));
        assert_eq!(capture_payload(&[0x00, 0x01]), Err(FecError::PacketTooShort { len: 2, min: 3 }));
    }

    #[test]
    fn test_reference_capture_roundtrip() {
        let cfg = FecConfig { check_crc: true, ..Default::default() };

        let encoded = process(&REFERENCE_CAPTURE, PacketMode::Encode, &cfg).unwrap();
        assert_eq!(&encoded[..8], &REFERENCE_CAPTURE[..8]);
        assert_eq!(&encoded[8..], &REFERENCE_ENCODED);

        let decoded = process(&encoded, PacketMode::Decode { keep_header: true }, &cfg).unwrap();
        assert_eq!(decoded, REFERENCE_CAPTURE.to_vec());

        let stripped = process(&encoded, PacketMode::Decode { keep_header: false }, &cfg).unwrap();
        assert_eq!(stripped, REFERENCE_CAPTURE[8..].to_vec());
    }

    #[test]
    fn test_decode_without_header() {
        let cfg = FecConfig::default();
        let decoded = process(&REFERENCE_ENCODED, PacketMode::Decode { keep_header: true }, &cfg).unwrap();
        assert_eq!(decoded, REFERENCE_CAPTURE[8..].to_vec());
    }
}
