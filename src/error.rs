/// Error types for line scanning, packet decoding and configuration
use thiserror::Error;

use crate::models::RawPacket;

/// Reasons a log line could not be framed into a packet
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    /// Fewer than ten byte tokens plus a timestamp on the line
    #[error("expected 11 tokens, found {found}")]
    TooFewTokens { found: usize },

    /// The eleventh token is not a decimal timestamp
    #[error("invalid timestamp token '{token}'")]
    BadTimestamp { token: String },
}

/// Reasons a framed packet was rejected by the decoder
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Checksum over the validated span was not zero (BADCRC)
    #[error("bad checksum {checksum:04x} for packet {packet}")]
    BadChecksum { checksum: u16, packet: RawPacket },
}

impl DecodeError {
    /// The rejected packet, so callers can still report its bytes and timestamp
    pub fn packet(&self) -> &RawPacket {
        match self {
            DecodeError::BadChecksum { packet, .. } => packet,
        }
    }
}

/// Configuration loading errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("invalid value '{value}' for {var}")]
    Invalid { var: &'static str, value: String },
}
