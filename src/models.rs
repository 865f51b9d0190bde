use serde::Serialize;
use std::fmt;

/// Length of one ISS radio transmission in bytes
pub const PACKET_LEN: usize = 10;

/// Value substituted for a byte token that is not valid hex
pub const INVALID_BYTE: u8 = 0xFF;

/// One framed packet as captured by the receiver
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawPacket {
    pub bytes: [u8; PACKET_LEN],
    /// Capture time, seconds since the Unix epoch
    pub timestamp: f64,
}

impl RawPacket {
    pub fn new(bytes: [u8; PACKET_LEN], timestamp: f64) -> Self {
        Self { bytes, timestamp }
    }

    /// Packet type tag: top 4 bits of byte 0
    pub fn type_tag(&self) -> u8 {
        self.bytes[0] >> 4
    }

    /// Transmitter id: low 3 bits of byte 0
    pub fn transmitter_id(&self) -> u8 {
        self.bytes[0] & 0x07
    }
}

impl fmt::Display for RawPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}

/// Which bytes the checksum is run over before testing for zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumSpan {
    /// First 8 bytes only, as the receiver firmware validates
    #[default]
    Leading,
    /// All 10 bytes
    Full,
}

impl ChecksumSpan {
    pub fn byte_count(self) -> usize {
        match self {
            ChecksumSpan::Leading => 8,
            ChecksumSpan::Full => PACKET_LEN,
        }
    }

    pub fn from_byte_count(count: usize) -> Option<Self> {
        match count {
            8 => Some(ChecksumSpan::Leading),
            PACKET_LEN => Some(ChecksumSpan::Full),
            _ => None,
        }
    }
}

/// Field layout selected by the packet type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketKind {
    UvIndex,
    Solar,
    Light,
    Temperature,
    Humidity,
    Rain,
    /// Tag with no established layout
    Unclassified(u8),
}

impl PacketKind {
    pub fn from_tag(tag: u8) -> Self {
        match tag & 0x0F {
            0x4 => PacketKind::UvIndex,
            0x6 => PacketKind::Solar,
            0x7 => PacketKind::Light,
            0x8 => PacketKind::Temperature,
            0xA => PacketKind::Humidity,
            0xE => PacketKind::Rain,
            other => PacketKind::Unclassified(other),
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            PacketKind::UvIndex => 0x4,
            PacketKind::Solar => 0x6,
            PacketKind::Light => 0x7,
            PacketKind::Temperature => 0x8,
            PacketKind::Humidity => 0xA,
            PacketKind::Rain => 0xE,
            PacketKind::Unclassified(tag) => tag,
        }
    }
}

/// The type-specific value carried by bytes 3 and 4
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SensorReading {
    Temperature { celsius: f64 },
    /// Raw composite value; `percent()` applies the firmware's 0.1 scaling
    Humidity { raw: u16 },
    /// 7-bit wrapping rain counter
    Rain { ticks: u8 },
    UvIndex { raw: u16, index: f64 },
    Solar { raw: u16, watts_per_m2: f64 },
    Light { raw: u16 },
    Unclassified { tag: u8, raw: u16 },
}

impl SensorReading {
    pub fn kind(&self) -> PacketKind {
        match self {
            SensorReading::Temperature { .. } => PacketKind::Temperature,
            SensorReading::Humidity { .. } => PacketKind::Humidity,
            SensorReading::Rain { .. } => PacketKind::Rain,
            SensorReading::UvIndex { .. } => PacketKind::UvIndex,
            SensorReading::Solar { .. } => PacketKind::Solar,
            SensorReading::Light { .. } => PacketKind::Light,
            SensorReading::Unclassified { tag, .. } => PacketKind::Unclassified(*tag),
        }
    }

    /// Relative humidity in percent, for humidity readings
    pub fn percent(&self) -> Option<f64> {
        match self {
            SensorReading::Humidity { raw } => Some(f64::from(*raw) * 0.1),
            _ => None,
        }
    }
}

/// Wind channels present in every packet
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Wind {
    pub speed_ms: f64,
    /// 0° is the vane arrow pointing at the front of the unit, away from the solar panel
    pub direction_deg: f64,
}

/// A packet that passed checksum validation, with its fields in engineering units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecodedPacket {
    pub raw: RawPacket,
    pub type_tag: u8,
    pub transmitter_id: u8,
    pub checksum: u16,
    pub wind: Wind,
    pub reading: SensorReading,
}

impl DecodedPacket {
    pub fn timestamp(&self) -> f64 {
        self.raw.timestamp
    }

    pub fn kind(&self) -> PacketKind {
        self.reading.kind()
    }

    pub fn temperature_c(&self) -> Option<f64> {
        match self.reading {
            SensorReading::Temperature { celsius } => Some(celsius),
            _ => None,
        }
    }

    pub fn humidity_raw(&self) -> Option<u16> {
        match self.reading {
            SensorReading::Humidity { raw } => Some(raw),
            _ => None,
        }
    }

    pub fn rain_ticks(&self) -> Option<u8> {
        match self.reading {
            SensorReading::Rain { ticks } => Some(ticks),
            _ => None,
        }
    }

    /// Generic 12-bit field, for the types that carry one
    pub fn raw_12(&self) -> Option<u16> {
        match self.reading {
            SensorReading::UvIndex { raw, .. }
            | SensorReading::Solar { raw, .. }
            | SensorReading::Light { raw }
            | SensorReading::Unclassified { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tag_and_transmitter() {
        let packet = RawPacket::new([0xA2, 0, 0, 0, 0, 0, 0, 0, 0, 0], 0.0);
        assert_eq!(packet.type_tag(), 0xA);
        assert_eq!(packet.transmitter_id(), 2);
    }

    #[test]
    fn test_packet_kind_tags() {
        for tag in 0..16u8 {
            assert_eq!(PacketKind::from_tag(tag).tag(), tag);
        }
        assert_eq!(PacketKind::from_tag(0x8), PacketKind::Temperature);
        assert_eq!(PacketKind::from_tag(0x5), PacketKind::Unclassified(0x5));
    }

    #[test]
    fn test_raw_packet_display() {
        let packet = RawPacket::new([0x80, 0x0D, 0xFF, 0, 1, 2, 3, 4, 5, 0xAB], 1.5);
        assert_eq!(packet.to_string(), "80 0D FF 00 01 02 03 04 05 AB");
    }

    #[test]
    fn test_checksum_span_counts() {
        assert_eq!(ChecksumSpan::default(), ChecksumSpan::Leading);
        assert_eq!(ChecksumSpan::from_byte_count(8), Some(ChecksumSpan::Leading));
        assert_eq!(ChecksumSpan::from_byte_count(10), Some(ChecksumSpan::Full));
        assert_eq!(ChecksumSpan::from_byte_count(9), None);
    }

    #[test]
    fn test_humidity_percent() {
        let reading = SensorReading::Humidity { raw: 523 };
        assert!((reading.percent().unwrap() - 52.3).abs() < 1e-9);
        assert_eq!(SensorReading::Rain { ticks: 3 }.percent(), None);
    }
}
