//! Decoder for Davis ISS weather-station radio packets captured in receiver logs.
//!
//! The [`radio`] module frames log lines into packets and decodes them; the
//! decoder is stateless. Stateful consumer concerns (rain counter unwrap,
//! wind vane calibration) live in [`utils`], and [`replay`] drives whole logs.

pub mod config;
pub mod error;
pub mod models;
pub mod radio;
pub mod replay;
pub mod utils;

pub use config::{OutputFormat, ReplayConfig};
pub use error::{ConfigError, DecodeError, ScanError};
pub use models::{
    ChecksumSpan, DecodedPacket, PacketKind, RawPacket, SensorReading, Wind, INVALID_BYTE,
    PACKET_LEN,
};
pub use radio::{
    crc16_ccitt, decode_12, decode_packet, reverse_bits, reverse_packet_bits, scan_line,
    PacketDecoder, ScannedFrame,
};
pub use replay::{process_bytes, process_line, replay_lines, LineOutcome, ReplayStats, Reporter};
pub use utils::{corrected_direction, RainAccumulator};
