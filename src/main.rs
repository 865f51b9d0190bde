use log::{error, info, warn};

use davis_iss::replay::{replay_file, Reporter};
use davis_iss::{ReplayConfig, ReplayStats};

fn log_summary(stats: &ReplayStats) {
    info!("Replay summary:");
    info!("  Lines read: {}", stats.lines);
    info!("  Decoded packets: {}", stats.decoded);
    info!("  Checksum failures: {}", stats.rejected);
    info!("  Malformed lines: {}", stats.malformed);
    info!("  Receiver diagnostics: {}", stats.diagnostics);
    info!("  Invalid byte tokens: {}", stats.invalid_tokens);

    if stats.decoded == 0 {
        warn!("No packets decoded!");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match ReplayConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle Ctrl+C gracefully
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        let _ = tx.send(());
    });

    let decoder = config.decoder();
    let mut reporter = Reporter::new(&config);
    let mut stats = ReplayStats::default();

    // Run the replay or wait for shutdown signal
    let result = tokio::select! {
        result = replay_file(&config.log_file, &decoder, config.follow, &mut stats, |outcome| {
            if let Some(line) = reporter.report(outcome) {
                println!("{}", line);
            }
        }) => result,
        Ok(()) = &mut rx => {
            info!("Replay interrupted by user. Exiting gracefully.");
            Ok(())
        }
    };

    log_summary(&stats);

    if let Err(e) = result {
        error!("Failed to read {}: {}", config.log_file.display(), e);
        return Err(e.into());
    }

    Ok(())
}
