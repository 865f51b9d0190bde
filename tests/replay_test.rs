use davis_iss::{
    crc16_ccitt, process_line, replay_lines, ChecksumSpan, LineOutcome, PacketDecoder,
    ReplayStats, SensorReading,
};

/// Hex log line for a packet whose bytes 6-7 carry the CRC of bytes 0-5
fn sealed_line(head: [u8; 6], timestamp: f64) -> String {
    let crc = crc16_ccitt(&head).to_be_bytes();
    let mut bytes = head.to_vec();
    bytes.extend_from_slice(&crc);
    bytes.extend_from_slice(&[0x00, 0x00]);
    to_line(&bytes, timestamp)
}

fn to_line(bytes: &[u8], timestamp: f64) -> String {
    let hex: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{} {}", hex.join(" "), timestamp)
}

#[test]
fn test_thousand_line_replay_counts() {
    let heads = [
        [0x80, 0x0D, 0x80, 0x0C, 0x80, 0x05],
        [0xA1, 0x04, 0x20, 0x32, 0x05, 0x00],
        [0xE2, 0x00, 0xFF, 0x7F, 0x00, 0x00],
        [0x50, 0x1A, 0x40, 0x12, 0x34, 0x00],
    ];

    let mut lines = Vec::new();
    for i in 0..1000usize {
        let timestamp = 1381234567.0 + i as f64;
        let line = match i % 10 {
            // garbage
            9 => format!("##### receiver noise {}", i),
            // checksum failures: corrupt byte 3 after sealing
            3 | 7 => {
                let mut line = sealed_line(heads[i % heads.len()], timestamp);
                line.replace_range(9..11, "ee");
                line
            }
            // debug-prefixed good packet
            5 => format!("..{}", sealed_line(heads[i % heads.len()], timestamp)),
            _ => sealed_line(heads[i % heads.len()], timestamp),
        };
        lines.push(line);
    }

    let decoder = PacketDecoder::default();
    let mut temperatures = 0;
    let stats = replay_lines(&lines, &decoder, |outcome| {
        if let LineOutcome::Decoded { packet, .. } = outcome {
            if let SensorReading::Temperature { celsius } = packet.reading {
                assert!((celsius - (-6.67)).abs() < 0.01);
                temperatures += 1;
            }
        }
    });

    assert_eq!(
        stats,
        ReplayStats {
            lines: 1000,
            decoded: 700,
            rejected: 200,
            malformed: 100,
            diagnostics: 0,
            invalid_tokens: 0,
        }
    );
    assert!(temperatures > 0);
}

#[test]
fn test_invalid_hex_token_is_not_fatal() {
    let decoder = PacketDecoder::default();
    let outcome = process_line("80 0D ZZ 0C 80 05 16 3E 00 00 1381234567", &decoder);

    match outcome {
        LineOutcome::Rejected {
            error,
            invalid_tokens,
        } => {
            assert_eq!(invalid_tokens, vec![2]);
            assert_eq!(error.packet().bytes[2], 0xFF);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_checksum_span_switch() {
    // Valid over all 10 bytes, not over the first 8
    let line = "80 0D 80 0C 80 05 FF 00 7D B7 1381234567";

    let leading = PacketDecoder::new(ChecksumSpan::Leading);
    assert!(matches!(
        process_line(line, &leading),
        LineOutcome::Rejected { .. }
    ));

    let full = PacketDecoder::new(ChecksumSpan::Full);
    assert!(matches!(
        process_line(line, &full),
        LineOutcome::Decoded { .. }
    ));
}

#[test]
fn test_diagnostics_are_counted_separately() {
    let packet = sealed_line([0x80, 0x0D, 0x80, 0x0C, 0x80, 0x05], 1.0);
    let lines = [
        "Search for station...",
        ".Searching 4 at 902355835 Hz",
        packet.as_str(),
    ];
    let stats = replay_lines(lines, &PacketDecoder::default(), |_| {});
    assert_eq!(stats.diagnostics, 2);
    assert_eq!(stats.decoded, 1);
    assert_eq!(stats.malformed, 0);
}
