/// Protocol toolkit: checksum, bit-order fix-up and field combines
use crate::models::PACKET_LEN;

const CRC16_CCITT_POLY: u16 = 0x1021;

/// Bit-wise CRC16-CCITT, initial value 0, MSB first
///
/// Each byte is XORed into the high byte of the accumulator and shifted
/// through eight rounds. A packet whose trailing checksum bytes are included
/// in `buf` yields zero when intact.
pub fn crc16_ccitt(buf: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &b in buf {
        crc ^= u16::from(b) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ CRC16_CCITT_POLY;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// Reverse the order of the 8 bits within a byte
///
/// The ISS transmits each byte least significant bit first; front ends that
/// hand over bytes as received on air need this applied before decoding.
pub fn reverse_bits(b: u8) -> u8 {
    let b = ((b & 0xF0) >> 4) | ((b & 0x0F) << 4);
    let b = ((b & 0xCC) >> 2) | ((b & 0x33) << 2);
    ((b & 0xAA) >> 1) | ((b & 0x55) << 1)
}

/// Apply `reverse_bits` to every byte of a packet in place
pub fn reverse_packet_bits(bytes: &mut [u8; PACKET_LEN]) {
    for b in bytes.iter_mut() {
        *b = reverse_bits(*b);
    }
}

/// Generic 12-bit field from bytes 3 and 4: all of `b1`, high nibble of `b2`
pub fn decode_12(b1: u8, b2: u8) -> u16 {
    (u16::from(b1) << 4) | u16::from(b2 >> 4)
}
