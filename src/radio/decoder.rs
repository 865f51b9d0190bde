/// Davis ISS packet validation and field decoding
use log::debug;

use crate::error::DecodeError;
use crate::models::{ChecksumSpan, DecodedPacket, PacketKind, RawPacket, SensorReading, Wind};
use crate::radio::bits::{crc16_ccitt, decode_12};

// Unit conversion constants
const WIND_SPEED_DIVISOR: f64 = 2.6; // byte 1 counts to m/s
const TEMPERATURE_DIVISOR: f64 = 160.0; // bytes 3-4 counts to °F
const RAIN_TICK_MASK: u8 = 0x7F; // rain counter is 7 bits
const UV_OFFSET: f64 = 4.0;
const UV_DIVISOR: f64 = 200.0;
const SOLAR_OFFSET: f64 = 4.0;
const SOLAR_DIVISOR: f64 = 2.27;

/// Validates packets and decodes them according to their type tag
///
/// The decoder holds no state between packets. Its settings are which bytes
/// the checksum covers and whether temperature bytes are read as signed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PacketDecoder {
    span: ChecksumSpan,
    signed_temperature: bool,
}

impl PacketDecoder {
    pub fn new(span: ChecksumSpan) -> Self {
        Self {
            span,
            signed_temperature: false,
        }
    }

    /// Read temperature bytes as a signed 16-bit value, as the receiver firmware does
    pub fn with_signed_temperature(mut self, signed: bool) -> Self {
        self.signed_temperature = signed;
        self
    }

    pub fn span(&self) -> ChecksumSpan {
        self.span
    }

    pub fn signed_temperature(&self) -> bool {
        self.signed_temperature
    }

    /// CRC16-CCITT over the configured span of the packet
    pub fn checksum(&self, packet: &RawPacket) -> u16 {
        crc16_ccitt(&packet.bytes[..self.span.byte_count()])
    }

    /// Validate and decode one packet
    ///
    /// The packet is accepted only if the checksum over the configured span
    /// is zero. With the default span that is the first 8 bytes, whose last
    /// two carry the transmitted CRC of bytes 0-5; bytes 8 and 9 are not
    /// validated.
    ///
    /// Packet layout (0-indexed):
    /// - Byte 0: type tag (high nibble), transmitter id (low 3 bits)
    /// - Byte 1: wind speed
    /// - Byte 2: wind direction
    /// - Bytes 3-4: type-specific value
    /// - Bytes 6-7: CRC16 of bytes 0-5
    ///
    /// # Returns
    /// The decoded packet, or `DecodeError::BadChecksum` carrying the rejected packet
    pub fn decode(&self, packet: &RawPacket) -> Result<DecodedPacket, DecodeError> {
        let checksum = self.checksum(packet);
        if checksum != 0 {
            debug!("BADCRC {:04x} for {}", checksum, packet);
            return Err(DecodeError::BadChecksum {
                checksum,
                packet: *packet,
            });
        }

        let b = &packet.bytes;
        let kind = PacketKind::from_tag(packet.type_tag());
        let reading = match kind {
            PacketKind::Temperature if self.signed_temperature => SensorReading::Temperature {
                celsius: temperature_c_signed(b[3], b[4]),
            },
            _ => decode_reading(kind, b[3], b[4]),
        };

        Ok(DecodedPacket {
            raw: *packet,
            type_tag: packet.type_tag(),
            transmitter_id: packet.transmitter_id(),
            checksum,
            wind: Wind {
                speed_ms: wind_speed(b[1]),
                direction_deg: wind_direction(b[2]),
            },
            reading,
        })
    }
}

/// Decode a packet with the default checksum span
pub fn decode_packet(packet: &RawPacket) -> Result<DecodedPacket, DecodeError> {
    PacketDecoder::default().decode(packet)
}

/// Extract the type-specific value from bytes 3 and 4
pub fn decode_reading(kind: PacketKind, b3: u8, b4: u8) -> SensorReading {
    match kind {
        PacketKind::Temperature => SensorReading::Temperature {
            celsius: temperature_c(b3, b4),
        },
        PacketKind::Humidity => SensorReading::Humidity {
            raw: humidity(b3, b4),
        },
        PacketKind::Rain => SensorReading::Rain {
            ticks: rain_ticks(b3),
        },
        PacketKind::UvIndex => {
            let raw = decode_12(b3, b4);
            SensorReading::UvIndex {
                raw,
                index: ((f64::from(raw) - UV_OFFSET) / UV_DIVISOR).max(0.0),
            }
        }
        PacketKind::Solar => {
            let raw = decode_12(b3, b4);
            SensorReading::Solar {
                raw,
                watts_per_m2: ((f64::from(raw) - SOLAR_OFFSET) / SOLAR_DIVISOR).max(0.0),
            }
        }
        PacketKind::Light => SensorReading::Light {
            raw: decode_12(b3, b4),
        },
        PacketKind::Unclassified(tag) => SensorReading::Unclassified {
            tag,
            raw: decode_12(b3, b4),
        },
    }
}

/// Wind speed in m/s from byte 1
pub fn wind_speed(b: u8) -> f64 {
    f64::from(b) / WIND_SPEED_DIVISOR
}

/// Wind direction in degrees (0-360) from byte 2
pub fn wind_direction(b: u8) -> f64 {
    f64::from(b) * 360.0 / 255.0
}

/// Temperature in °C from bytes 3-4 (unsigned, 1/160 °F)
pub fn temperature_c(b3: u8, b4: u8) -> f64 {
    fahrenheit_to_celsius(f64::from(u16::from_be_bytes([b3, b4])) / TEMPERATURE_DIVISOR)
}

/// Temperature in °C from bytes 3-4 read as two's complement
pub fn temperature_c_signed(b3: u8, b4: u8) -> f64 {
    fahrenheit_to_celsius(f64::from(i16::from_be_bytes([b3, b4])) / TEMPERATURE_DIVISOR)
}

fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Raw humidity composite: byte 3 low, high nibble of byte 4 as bits 8-11
pub fn humidity(b3: u8, b4: u8) -> u16 {
    u16::from(b3) | (u16::from(b4 >> 4) << 8)
}

pub fn rain_ticks(b3: u8) -> u8 {
    b3 & RAIN_TICK_MASK
}
