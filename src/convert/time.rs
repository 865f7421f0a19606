use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::common::constants::YELP_TIMEZONE;

const ISO_8601_UTC: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Unix seconds (Google reviews) to ISO 8601 in UTC
pub fn unix_to_iso8601(seconds: i64) -> String {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .map(|time| time.format(ISO_8601_UTC).to_string())
        .unwrap_or_default()
}

/// Provider-local timestamp (Yelp reviews) to ISO 8601 in UTC.
///
/// Timestamps carrying their own offset are honoured; naive ones are read as
/// Pacific time. Unparseable input gives an empty string.
pub fn local_to_iso8601(timestamp: &str) -> String {
    let timestamp = timestamp.trim();
    if timestamp.is_empty() {
        return String::new();
    }

    if let Ok(time) = DateTime::parse_from_rfc3339(timestamp) {
        return time.with_timezone(&Utc).format(ISO_8601_UTC).to_string();
    }

    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(timestamp, format).ok())
        .and_then(|naive| YELP_TIMEZONE.from_local_datetime(&naive).earliest())
        .map(|time| time.with_timezone(&Utc).format(ISO_8601_UTC).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_seconds() {
        assert_eq!(unix_to_iso8601(1_577_836_800), "2020-01-01T00:00:00Z");
        assert_eq!(unix_to_iso8601(0), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn pacific_time_respects_daylight_saving() {
        assert_eq!(local_to_iso8601("2016-08-29 00:41:13"), "2016-08-29T07:41:13Z");
        assert_eq!(local_to_iso8601("2016-01-15 10:00:00"), "2016-01-15T18:00:00Z");
    }

    #[test]
    fn explicit_offsets_win() {
        assert_eq!(local_to_iso8601("2021-03-04T12:00:00+01:00"), "2021-03-04T11:00:00Z");
    }

    #[test]
    fn garbage_is_empty() {
        assert_eq!(local_to_iso8601(""), "");
        assert_eq!(local_to_iso8601("last tuesday"), "");
    }
}
