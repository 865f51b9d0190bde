/// Receiver log line scanning into candidate packets
use log::{debug, warn};

use crate::error::ScanError;
use crate::models::{RawPacket, INVALID_BYTE, PACKET_LEN};

// Receiver log conventions
const DEBUG_PREFIX: char = '.'; // Trace characters the receiver may prepend to a data line
const DIAGNOSTIC_MARKER: &str = "Search"; // "Searching <secs> at <freq> Hz" while hunting for the ISS

/// A packet framed from one log line
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedFrame {
    pub packet: RawPacket,
    /// Positions of byte tokens that were not valid hex and now hold `INVALID_BYTE`
    pub invalid_tokens: Vec<usize>,
}

/// Frame one receiver log line
///
/// The expected shape is ten hex byte tokens followed by a decimal capture
/// timestamp, optionally prefixed with `.` debug markers:
///
/// ```text
/// ..80 0D 80 0C 80 05 16 3E 00 00 1381234567.25
/// ```
///
/// A byte token that is not valid hex is replaced with `0xFF` and its
/// position is recorded; the line is still framed. Tokens after the
/// timestamp are ignored.
///
/// # Returns
/// * `Ok(Some(frame))` for a data line
/// * `Ok(None)` for a receiver diagnostic line
/// * `Err(ScanError)` when the line cannot yield a packet
pub fn scan_line(line: &str) -> Result<Option<ScannedFrame>, ScanError> {
    let line = line.trim_start_matches(DEBUG_PREFIX).trim_end();

    if line.starts_with(DIAGNOSTIC_MARKER) {
        debug!("Skipping receiver diagnostic: {}", line);
        return Ok(None);
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() <= PACKET_LEN {
        return Err(ScanError::TooFewTokens {
            found: tokens.len(),
        });
    }

    let mut bytes = [INVALID_BYTE; PACKET_LEN];
    let mut invalid_tokens = Vec::new();
    for (i, token) in tokens.iter().take(PACKET_LEN).enumerate() {
        match u8::from_str_radix(token, 16) {
            Ok(b) => bytes[i] = b,
            Err(_) => {
                warn!("Invalid byte token '{}' at position {}", token, i);
                invalid_tokens.push(i);
            }
        }
    }

    let timestamp_token = tokens[PACKET_LEN];
    let timestamp = match timestamp_token.parse::<f64>() {
        Ok(t) if t.is_finite() => t,
        _ => {
            return Err(ScanError::BadTimestamp {
                token: timestamp_token.to_string(),
            })
        }
    };

    Ok(Some(ScannedFrame {
        packet: RawPacket::new(bytes, timestamp),
        invalid_tokens,
    }))
}
