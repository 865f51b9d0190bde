/// Consumer-side helpers applied after decoding: rain unwrap, wind calibration, time formatting
use time::{format_description, OffsetDateTime};

const RAIN_COUNTER_MASK: u8 = 0x7F; // rain counter wraps from 127 to 0

/// Format a capture timestamp for human-readable output
///
/// Converts seconds since the epoch to DD.MM.YYYY - HH:MM:SS (UTC).
/// Falls back to the plain number if the timestamp is out of range.
pub fn format_capture_time(timestamp: f64) -> String {
    let nanos = (timestamp * 1e9) as i128;
    let dt = match OffsetDateTime::from_unix_timestamp_nanos(nanos) {
        Ok(dt) => dt,
        Err(_) => return format!("{:.2}", timestamp),
    };
    format_datetime(&dt)
}

fn format_datetime(dt: &OffsetDateTime) -> String {
    match format_description::parse("[day].[month].[year] - [hour]:[minute]:[second]") {
        Ok(format) => dt.format(&format).unwrap_or_else(|_| dt.to_string()),
        Err(_) => dt.to_string(),
    }
}

/// Running state for turning the wrapping rain counter into per-packet deltas
///
/// The accumulator is a plain value: `advance` consumes it and hands back the
/// next one, so the caller owns the state for each sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RainAccumulator {
    previous: Option<u8>,
}

impl RainAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last counter value seen, if any
    pub fn previous(&self) -> Option<u8> {
        self.previous
    }

    /// Feed the current counter value
    ///
    /// The first observation reports zero; afterwards the delta is
    /// `(current - previous) mod 128`.
    ///
    /// # Returns
    /// Ticks since the previous observation, and the updated accumulator
    pub fn advance(self, current: u8) -> (u8, RainAccumulator) {
        let current = current & RAIN_COUNTER_MASK;
        let delta = match self.previous {
            Some(previous) => current.wrapping_sub(previous) & RAIN_COUNTER_MASK,
            None => 0,
        };
        (
            delta,
            RainAccumulator {
                previous: Some(current),
            },
        )
    }
}

/// Rain volume for a number of ticks, given the gauge's volume per tick
pub fn rain_amount(ticks: u8, per_tick: f64) -> f64 {
    f64::from(ticks) * per_tick
}

/// Apply an installation angle to a decoded wind direction
pub fn corrected_direction(direction: f64, offset: f64) -> f64 {
    (direction + offset).rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rain_first_observation_is_zero() {
        let (delta, acc) = RainAccumulator::new().advance(42);
        assert_eq!(delta, 0);
        assert_eq!(acc.previous(), Some(42));
    }

    #[test]
    fn test_rain_counter_unwrap() {
        let acc = RainAccumulator::new();
        let (_, acc) = acc.advance(126);
        let (delta, acc) = acc.advance(2);
        assert_eq!(delta, 4);
        assert_eq!(acc.previous(), Some(2));

        let (delta, _) = acc.advance(2);
        assert_eq!(delta, 0);
    }

    #[test]
    fn test_rain_accumulator_is_a_value() {
        let start = RainAccumulator::new().advance(10).1;
        let (a, _) = start.advance(15);
        let (b, _) = start.advance(15);
        assert_eq!(a, 5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_rain_amount() {
        assert!((rain_amount(4, 0.01) - 0.04).abs() < 1e-12);
        assert!((rain_amount(3, 0.1) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_corrected_direction() {
        assert!((corrected_direction(350.0, 20.0) - 10.0).abs() < 1e-9);
        assert!((corrected_direction(10.0, -20.0) - 350.0).abs() < 1e-9);
        assert_eq!(corrected_direction(90.0, 0.0), 90.0);
    }

    #[test]
    fn test_format_capture_time() {
        assert_eq!(format_capture_time(0.0), "01.01.1970 - 00:00:00");
        assert_eq!(format_capture_time(1381234567.75), "08.10.2013 - 12:16:07");
    }
}
