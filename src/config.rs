use log::info;
use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::models::ChecksumSpan;
use crate::radio::PacketDecoder;

const DEFAULT_RAIN_PER_TICK: f64 = 0.01;

/// How replayed packets are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// Timestamp and wind speed for every framed packet, checksum not required
    Speed,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayConfig {
    pub log_file: PathBuf,
    pub checksum_span: ChecksumSpan,
    /// Only report packets with this type tag
    pub type_filter: Option<u8>,
    pub output: OutputFormat,
    pub wind_offset: f64,
    pub rain_per_tick: f64,
    pub follow: bool,
    /// Read temperature bytes as signed, as the receiver firmware does
    pub signed_temperature: bool,
}

impl ReplayConfig {
    pub fn new() -> Result<Self, ConfigError> {
        // Load environment variables
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_file = lookup("DAVIS_LOG_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("DAVIS_LOG_FILE"))?;

        let checksum_span = match lookup("DAVIS_CHECKSUM_SPAN") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(ChecksumSpan::from_byte_count)
                .ok_or(ConfigError::Invalid {
                    var: "DAVIS_CHECKSUM_SPAN",
                    value,
                })?,
            None => ChecksumSpan::default(),
        };

        let type_filter = match lookup("DAVIS_TYPE_FILTER") {
            Some(value) => parse_type_filter(&value).ok_or(ConfigError::Invalid {
                var: "DAVIS_TYPE_FILTER",
                value,
            })?,
            None => None,
        };

        let output = match lookup("DAVIS_OUTPUT") {
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "text" => OutputFormat::Text,
                "speed" => OutputFormat::Speed,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "DAVIS_OUTPUT",
                        value,
                    })
                }
            },
            None => OutputFormat::default(),
        };

        let wind_offset = parse_f64(&lookup, "DAVIS_WIND_OFFSET")?.unwrap_or(0.0);
        let rain_per_tick =
            parse_f64(&lookup, "DAVIS_RAIN_PER_TICK")?.unwrap_or(DEFAULT_RAIN_PER_TICK);

        let follow = parse_bool(&lookup, "DAVIS_FOLLOW")?.unwrap_or(false);
        let signed_temperature =
            parse_bool(&lookup, "DAVIS_SIGNED_TEMPERATURE")?.unwrap_or(false);

        info!(
            "Replaying {} (checksum over {} bytes, output {:?}, follow {})",
            log_file.display(),
            checksum_span.byte_count(),
            output,
            follow
        );

        Ok(ReplayConfig {
            log_file,
            checksum_span,
            type_filter,
            output,
            wind_offset,
            rain_per_tick,
            follow,
            signed_temperature,
        })
    }

    pub fn decoder(&self) -> PacketDecoder {
        PacketDecoder::new(self.checksum_span).with_signed_temperature(self.signed_temperature)
    }
}

/// `all` means no filter; otherwise a single hex digit type tag
fn parse_type_filter(value: &str) -> Option<Option<u8>> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("all") {
        return Some(None);
    }
    match u8::from_str_radix(value, 16) {
        Ok(tag) if tag <= 0x0F => Some(Some(tag)),
        _ => None,
    }
}

fn parse_f64<F>(lookup: &F, var: &'static str) -> Result<Option<f64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) => match value.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(ConfigError::Invalid { var, value }),
        },
        None => Ok(None),
    }
}

fn parse_bool<F>(lookup: &F, var: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(Some(true)),
            "0" | "false" | "no" => Ok(Some(false)),
            _ => Err(ConfigError::Invalid { var, value }),
        },
        None => Ok(None),
    }
}
