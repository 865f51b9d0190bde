/// Asynchronous replay of a captured receiver log file
use log::{debug, info};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{sleep, Duration};

use crate::radio::PacketDecoder;
use crate::replay::{process_bytes, LineOutcome, ReplayStats};

const FOLLOW_POLL_MILLIS: u64 = 100; // wait before re-reading at end of file

/// Replay a receiver log file line by line
///
/// Every complete line is run through the scan/decode pipeline and counted
/// in `stats`. Invalid UTF-8 inside a line does not stop the replay. In
/// follow mode the reader waits at end of file for the receiver to append
/// more lines and only returns on an I/O error, so the caller is expected to
/// cancel it.
///
/// # Arguments
/// * `path` - Log file written by the receiver
/// * `decoder` - Decoder with the checksum span to validate with
/// * `follow` - Keep polling for appended lines instead of stopping at EOF
/// * `stats` - Outcome counters, updated as lines are processed
/// * `sink` - Receives every line outcome in file order
pub async fn replay_file<F>(
    path: &Path,
    decoder: &PacketDecoder,
    follow: bool,
    stats: &mut ReplayStats,
    mut sink: F,
) -> std::io::Result<()>
where
    F: FnMut(&LineOutcome),
{
    let file = File::open(path).await?;
    let mut reader = BufReader::new(file);
    let mut pending: Vec<u8> = Vec::new();

    info!("Reading {}", path.display());

    loop {
        let read = reader.read_until(b'\n', &mut pending).await?;
        let complete = pending.last() == Some(&b'\n');

        if read == 0 || !complete {
            if follow {
                // Keep any partial line until the rest of it is written
                sleep(Duration::from_millis(FOLLOW_POLL_MILLIS)).await;
                continue;
            }
            if !pending.is_empty() {
                let outcome = process_bytes(&pending, decoder);
                stats.record(&outcome);
                sink(&outcome);
            }
            break;
        }

        let outcome = process_bytes(&pending, decoder);
        stats.record(&outcome);
        sink(&outcome);
        pending.clear();
    }

    debug!("Reached end of {}", path.display());
    Ok(())
}
