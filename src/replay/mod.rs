/// Per-line replay pipeline: scan, decode, count
pub mod reader;
pub mod report;

use log::debug;

use crate::error::{DecodeError, ScanError};
use crate::models::DecodedPacket;
use crate::radio::{scan_line, PacketDecoder};

pub use reader::replay_file;
pub use report::Reporter;

/// What became of one log line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Receiver diagnostic, not data
    Diagnostic,
    /// Line could not be framed into a packet
    Malformed(ScanError),
    /// Framed, but the checksum failed
    Rejected {
        error: DecodeError,
        invalid_tokens: Vec<usize>,
    },
    Decoded {
        packet: DecodedPacket,
        invalid_tokens: Vec<usize>,
    },
}

/// Outcome counts over a replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub lines: usize,
    pub decoded: usize,
    pub rejected: usize,
    pub malformed: usize,
    pub diagnostics: usize,
    /// Byte tokens replaced with 0xFF across all framed lines
    pub invalid_tokens: usize,
}

impl ReplayStats {
    pub fn record(&mut self, outcome: &LineOutcome) {
        self.lines += 1;
        match outcome {
            LineOutcome::Diagnostic => self.diagnostics += 1,
            LineOutcome::Malformed(_) => self.malformed += 1,
            LineOutcome::Rejected { invalid_tokens, .. } => {
                self.rejected += 1;
                self.invalid_tokens += invalid_tokens.len();
            }
            LineOutcome::Decoded { invalid_tokens, .. } => {
                self.decoded += 1;
                self.invalid_tokens += invalid_tokens.len();
            }
        }
    }
}

/// Scan and decode one text line
pub fn process_line(line: &str, decoder: &PacketDecoder) -> LineOutcome {
    let frame = match scan_line(line) {
        Ok(Some(frame)) => frame,
        Ok(None) => return LineOutcome::Diagnostic,
        Err(e) => {
            debug!("Skipping malformed line: {}", e);
            return LineOutcome::Malformed(e);
        }
    };

    match decoder.decode(&frame.packet) {
        Ok(packet) => LineOutcome::Decoded {
            packet,
            invalid_tokens: frame.invalid_tokens,
        },
        Err(error) => LineOutcome::Rejected {
            error,
            invalid_tokens: frame.invalid_tokens,
        },
    }
}

/// Scan and decode one raw line of bytes; invalid UTF-8 is replaced, not fatal
pub fn process_bytes(line: &[u8], decoder: &PacketDecoder) -> LineOutcome {
    process_line(&String::from_utf8_lossy(line), decoder)
}

/// Run every line through the pipeline, handing each outcome to `sink`
///
/// No line aborts the replay; the returned counts cover every line seen.
pub fn replay_lines<I, S, F>(lines: I, decoder: &PacketDecoder, mut sink: F) -> ReplayStats
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: FnMut(&LineOutcome),
{
    let mut stats = ReplayStats::default();
    for line in lines {
        let outcome = process_line(line.as_ref(), decoder);
        stats.record(&outcome);
        sink(&outcome);
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChecksumSpan;

    const GOOD: &str = "80 0D 80 0C 80 05 16 3E 00 00 1381234567.5";
    const BAD_CRC: &str = "80 0D 80 0C 80 05 16 3F 00 00 1381234567.5";

    #[test]
    fn test_process_line_outcomes() {
        let decoder = PacketDecoder::default();

        assert!(matches!(
            process_line(GOOD, &decoder),
            LineOutcome::Decoded { .. }
        ));
        assert!(matches!(
            process_line(BAD_CRC, &decoder),
            LineOutcome::Rejected { .. }
        ));
        assert_eq!(
            process_line("Search for station...", &decoder),
            LineOutcome::Diagnostic
        );
        assert_eq!(
            process_line("garbage", &decoder),
            LineOutcome::Malformed(ScanError::TooFewTokens { found: 1 })
        );
    }

    #[test]
    fn test_invalid_token_reaches_decoder() {
        let decoder = PacketDecoder::default();
        match process_line("80 ZZ 80 0C 80 05 16 3E 00 00 1", &decoder) {
            LineOutcome::Rejected {
                error,
                invalid_tokens,
            } => {
                assert_eq!(invalid_tokens, vec![1]);
                assert_eq!(error.packet().bytes[1], 0xFF);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_process_bytes_tolerates_invalid_utf8() {
        let decoder = PacketDecoder::default();
        let outcome = process_bytes(b"\xff\xfe garbage", &decoder);
        assert!(matches!(outcome, LineOutcome::Malformed(_)));

        let outcome = process_bytes(GOOD.as_bytes(), &decoder);
        assert!(matches!(outcome, LineOutcome::Decoded { .. }));
    }

    #[test]
    fn test_replay_lines_counts() {
        let decoder = PacketDecoder::new(ChecksumSpan::Leading);
        let lines = [
            GOOD,
            BAD_CRC,
            "Searching 3 at 902355835 Hz",
            "",
            "80 0D 80 0C 80 05 16 3E 00 QQ 12",
        ];
        let mut seen = 0;
        let stats = replay_lines(lines, &decoder, |_| seen += 1);

        assert_eq!(seen, 5);
        assert_eq!(
            stats,
            ReplayStats {
                lines: 5,
                decoded: 2,
                rejected: 1,
                malformed: 1,
                diagnostics: 1,
                invalid_tokens: 1,
            }
        );
    }
}
