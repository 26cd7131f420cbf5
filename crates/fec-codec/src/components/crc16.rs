/// CRC-16 as computed by the CC1101 packet handler (poly 0x8005, init 0xffff, no reflection, no final xor).
pub const GEN_POLY: u16 = 0x8005;
pub const CRC_INIT: u16 = 0xFFFF;

/// Feed one byte (MSB first) into the running CRC register `crc`.
/// Returns the updated register.
pub fn update(mut crc: u16, mut data: u8) -> u16 {
    for _ in 0..8 {
        let feedback = ((crc >> 8) as u8 ^ data) & 0x80;
        crc = if feedback != 0 { (crc << 1) ^ GEN_POLY } else { crc << 1 };
        data <<= 1;
    }
    crc
}

/// CRC over a byte stream, starting from `CRC_INIT`.
pub fn checksum(data: &[u8]) -> u16 {
    data.iter().fold(CRC_INIT, |crc, &b| update(crc, b))
}
