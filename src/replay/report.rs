/// Rendering of replay outcomes as text, wind-speed or JSON lines
use log::error;
use serde::Serialize;
use std::collections::HashMap;

use crate::config::{OutputFormat, ReplayConfig};
use crate::error::DecodeError;
use crate::models::{DecodedPacket, RawPacket, SensorReading};
use crate::radio::decoder::wind_speed;
use crate::replay::LineOutcome;
use crate::utils::{corrected_direction, format_capture_time, rain_amount, RainAccumulator};

/// Decoded packet plus the installation-specific values derived from it
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    packet: &'a DecodedPacket,
    time: String,
    wind_direction_corrected: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    rain: Option<f64>,
}

#[derive(Debug, Serialize)]
struct JsonRejected {
    bad_crc: String,
    raw: String,
    timestamp: f64,
}

/// Turns line outcomes into output lines, applying per-installation calibration
///
/// Holds one rain accumulator per transmitter id so rain packets can be
/// reported as volume since the previous packet.
#[derive(Debug, Clone)]
pub struct Reporter {
    output: OutputFormat,
    type_filter: Option<u8>,
    wind_offset: f64,
    rain_per_tick: f64,
    rain: HashMap<u8, RainAccumulator>,
}

impl Reporter {
    pub fn new(config: &ReplayConfig) -> Self {
        Self {
            output: config.output,
            type_filter: config.type_filter,
            wind_offset: config.wind_offset,
            rain_per_tick: config.rain_per_tick,
            rain: HashMap::new(),
        }
    }

    /// Render one outcome, or `None` if nothing should be printed for it
    pub fn report(&mut self, outcome: &LineOutcome) -> Option<String> {
        match outcome {
            LineOutcome::Decoded { packet, .. } => {
                let rain = self.rain_since_last(packet);
                if self.output == OutputFormat::Speed {
                    return Some(render_speed(&packet.raw));
                }
                if let Some(tag) = self.type_filter {
                    if packet.type_tag != tag {
                        return None;
                    }
                }
                match self.output {
                    OutputFormat::Json => self.render_json(packet, rain),
                    _ => Some(self.render_text(packet, rain)),
                }
            }
            LineOutcome::Rejected { error, .. } => match self.output {
                OutputFormat::Speed => Some(render_speed(error.packet())),
                OutputFormat::Json => render_rejected_json(error),
                OutputFormat::Text => Some(format!("BADCRC {}", error.packet())),
            },
            LineOutcome::Diagnostic | LineOutcome::Malformed(_) => None,
        }
    }

    fn rain_since_last(&mut self, packet: &DecodedPacket) -> Option<f64> {
        let ticks = packet.rain_ticks()?;
        let accumulator = self.rain.remove(&packet.transmitter_id).unwrap_or_default();
        let (delta, next) = accumulator.advance(ticks);
        self.rain.insert(packet.transmitter_id, next);
        Some(rain_amount(delta, self.rain_per_tick))
    }

    fn render_text(&self, packet: &DecodedPacket, rain: Option<f64>) -> String {
        let value = match packet.reading {
            SensorReading::Temperature { celsius } => format!("temp={:.2}C", celsius),
            SensorReading::Humidity { raw } => format!("humidity={}", raw),
            SensorReading::Rain { ticks } => {
                format!("rain_ticks={} rain={:.2}", ticks, rain.unwrap_or(0.0))
            }
            SensorReading::UvIndex { index, .. } => format!("uv={:.2}", index),
            SensorReading::Solar { watts_per_m2, .. } => format!("solar={:.1}", watts_per_m2),
            SensorReading::Light { raw } => format!("light={}", raw),
            SensorReading::Unclassified { raw, .. } => format!("raw12={}", raw),
        };

        format!(
            "{} {:04x} tx={} {} {} speed={:.1} wdirection={:.0}",
            packet.raw,
            packet.checksum,
            packet.transmitter_id,
            value,
            format_capture_time(packet.timestamp()),
            packet.wind.speed_ms,
            corrected_direction(packet.wind.direction_deg, self.wind_offset)
        )
    }

    fn render_json(&self, packet: &DecodedPacket, rain: Option<f64>) -> Option<String> {
        let report = JsonReport {
            packet,
            time: format_capture_time(packet.timestamp()),
            wind_direction_corrected: corrected_direction(
                packet.wind.direction_deg,
                self.wind_offset,
            ),
            rain,
        };
        match serde_json::to_string(&report) {
            Ok(line) => Some(line),
            Err(e) => {
                error!("Failed to serialize packet {}: {}", packet.raw, e);
                None
            }
        }
    }
}

/// Capture time in whole seconds and wind speed, printed for every framed packet
fn render_speed(raw: &RawPacket) -> String {
    format!("{:.0} {:.2}", raw.timestamp.trunc(), wind_speed(raw.bytes[1]))
}

fn render_rejected_json(error: &DecodeError) -> Option<String> {
    let DecodeError::BadChecksum { checksum, packet } = error;
    let rejected = JsonRejected {
        bad_crc: format!("{:04x}", checksum),
        raw: packet.to_string(),
        timestamp: packet.timestamp,
    };
    match serde_json::to_string(&rejected) {
        Ok(line) => Some(line),
        Err(e) => {
            error!("Failed to serialize rejected packet {}: {}", packet, e);
            None
        }
    }
}
