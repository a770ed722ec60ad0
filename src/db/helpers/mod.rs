use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Fixed-width RFC 3339 so stored timestamps sort correctly as text.
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

/// Lenient timestamp parsing for exported spreadsheets.
///
/// Accepts RFC 3339, naive date-times and bare dates. Naive values are taken as
/// UTC; timezone normalisation is the exporter's job.
pub fn parse_flexible_datetime(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }

    Err(anyhow!("unrecognised timestamp '{value}'"))
}

/// Epoch milliseconds, as written by most dataframe JSON exporters.
pub fn datetime_from_millis(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| anyhow!("epoch milliseconds {millis} out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_layouts() {
        let expected = Utc.with_ymd_and_hms(2024, 2, 29, 13, 45, 0).unwrap();
        for raw in [
            "2024-02-29T13:45:00Z",
            "2024-02-29T15:45:00+02:00",
            "2024-02-29 13:45:00",
            "2024-02-29T13:45:00.000",
            "2024-02-29 13:45",
            " 2024-02-29 13:45:00 ",
        ] {
            assert_eq!(parse_flexible_datetime(raw).unwrap(), expected, "{raw}");
        }
        assert_eq!(
            parse_flexible_datetime("2024-02-29").unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_flexible_datetime("yesterday").is_err());
        assert!(parse_flexible_datetime("2024-13-01").is_err());
    }

    #[test]
    fn stored_format_round_trips() {
        let ts = Utc.with_ymd_and_hms(2021, 7, 4, 6, 30, 15).unwrap();
        let text = format_datetime(&ts);
        assert_eq!(text, "2021-07-04T06:30:15.000Z");
        assert_eq!(parse_datetime(&text, "timestamp").unwrap(), ts);
    }

    #[test]
    fn converts_epoch_millis() {
        assert_eq!(
            datetime_from_millis(1_577_836_800_000).unwrap(),
            Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
        );
    }
}
