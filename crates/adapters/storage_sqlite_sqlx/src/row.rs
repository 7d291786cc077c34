//! Row mapping shared by the repositories.
//!
//! Wrappers convert database rows into domain types without polluting
//! domain structs with database concerns.

use chrono::SecondsFormat;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use ledbridge_domain::actuator::{ActuatorState, ChannelState};
use ledbridge_domain::sensor::SensorSample;
use ledbridge_domain::time::Timestamp;

/// Fixed-width text form, sortable as plain text.
pub(crate) fn encode_timestamp(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(row: &SqliteRow, column: &str) -> Result<Timestamp, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    chrono::DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.to_utc())
        .map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

fn decode_channel(row: &SqliteRow, column: &str) -> Result<ChannelState, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    raw.parse()
        .map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

pub(crate) struct SampleRow(pub SensorSample);

impl<'r> FromRow<'r, SqliteRow> for SampleRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(SensorSample {
            temperature: row.try_get("temperature")?,
            humidity: row.try_get("humidity")?,
            illuminance: row.try_get("lux")?,
            observed_at: decode_timestamp(row, "timestamp")?,
        }))
    }
}

pub(crate) struct StateRow(pub ActuatorState);

impl<'r> FromRow<'r, SqliteRow> for StateRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(ActuatorState {
            led1: decode_channel(row, "led1")?,
            led2: decode_channel(row, "led2")?,
            recorded_at: decode_timestamp(row, "timestamp")?,
        }))
    }
}

pub(crate) const INSERT_SAMPLE: &str = r"
    INSERT INTO sensor_data (temperature, humidity, lux, timestamp)
    VALUES (?, ?, ?, ?)
";

pub(crate) const INSERT_STATE: &str = r"
    INSERT INTO led_status (led1, led2, timestamp)
    VALUES (?, ?, ?)
";

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use ledbridge_domain::time::now;

    #[test]
    fn should_encode_timestamps_with_fixed_width() {
        let ts = Timestamp::UNIX_EPOCH;
        assert_eq!(encode_timestamp(ts), "1970-01-01T00:00:00.000000Z");
    }

    #[test]
    fn should_sort_encoded_timestamps_as_text() {
        let t0 = now();
        let earlier = encode_timestamp(t0);
        let later = encode_timestamp(t0 + TimeDelta::microseconds(1));
        assert!(earlier < later);
    }
}
