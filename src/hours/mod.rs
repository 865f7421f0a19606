//! Opening-hours normalization
//!
//! Both providers describe business hours differently. Google sends open/close
//! period pairs that may span several midnights, Yelp sends day-scoped
//! segments with its own overnight flag and a Monday-first week. Everything
//! here folds those into one [`Hours`] schedule with Sunday-first days.

mod day_segments;
mod periods;

pub use day_segments::{DaySegmentEntry, DaySegmentHours};
pub use periods::{Period, PeriodHours, PeriodPoint};

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::common::types::Provider;

/// Midnight in the four-digit `HHMM` format used by both providers
pub const MIDNIGHT: &str = "0000";

/// One open interval on a canonical weekday (0 = Sunday .. 6 = Saturday)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySegment {
    pub day: u8,
    pub start: String,
    pub end: String,
    pub is_overnight: bool,
}

/// The unified schedule handed back to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalSchedule {
    pub open_now: bool,
    pub open_days: Vec<DaySegment>,
}

/// Hours as they appear in a normalized place.
///
/// `Unavailable` serializes as an empty object so the `hours` key is always
/// present in details responses, matching what clients already parse.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Hours {
    #[default]
    Unavailable,
    Known(CanonicalSchedule),
}

impl Hours {
    pub fn schedule(&self) -> Option<&CanonicalSchedule> {
        match self {
            Hours::Unavailable => None,
            Hours::Known(schedule) => Some(schedule),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Hours::Unavailable)
    }
}

impl Serialize for Hours {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Hours::Unavailable => serializer.serialize_map(Some(0))?.end(),
            Hours::Known(schedule) => schedule.serialize(serializer),
        }
    }
}

/// Raw hours payload tagged with the shape it arrived in
#[derive(Debug, Clone, PartialEq)]
pub enum HoursSource {
    Periods(PeriodHours),
    DaySegments(DaySegmentHours),
}

impl HoursSource {
    /// Interpret `raw` as the hours shape of a known provider.
    ///
    /// Only that provider's shape is attempted, so a payload that happens to
    /// look like the other provider's is still rejected.
    pub fn from_provider(provider: Provider, raw: &Value) -> Option<Self> {
        match provider {
            Provider::Google => PeriodHours::from_value(raw).map(HoursSource::Periods),
            Provider::Yelp => DaySegmentHours::from_value(raw).map(HoursSource::DaySegments),
        }
    }

    /// Infer the shape structurally when the provider is unknown.
    pub fn detect(raw: &Value) -> Option<Self> {
        PeriodHours::from_value(raw)
            .map(HoursSource::Periods)
            .or_else(|| DaySegmentHours::from_value(raw).map(HoursSource::DaySegments))
    }

    pub fn shape(&self) -> &'static str {
        match self {
            HoursSource::Periods(_) => "periods",
            HoursSource::DaySegments(_) => "day_segments",
        }
    }

    /// Produce the canonical schedule for this payload.
    pub fn normalize(&self) -> CanonicalSchedule {
        let (open_now, mut open_days) = match self {
            HoursSource::Periods(hours) => (hours.open_now, hours.expand()),
            HoursSource::DaySegments(hours) => (hours.is_open_now, hours.remap()),
        };

        // Stable, so split shifts keep provider order on equal starts.
        open_days.sort_by(|a, b| (a.day, a.start.as_str()).cmp(&(b.day, b.start.as_str())));

        CanonicalSchedule { open_now, open_days }
    }
}

/// Normalize the hours sub-object of a provider payload.
pub fn normalize_hours(provider: Provider, raw: &Value) -> Hours {
    match HoursSource::from_provider(provider, raw) {
        Some(source) => {
            let schedule = source.normalize();
            crate::observability::hours_normalized(source.shape(), schedule.open_days.len());
            Hours::Known(schedule)
        }
        None => {
            debug!(provider = %provider, "hours payload not recognized, leaving hours empty");
            Hours::Unavailable
        }
    }
}

/// Normalize an hours payload of unknown origin by its structure alone.
pub fn normalize_untagged(raw: &Value) -> Hours {
    match HoursSource::detect(raw) {
        Some(source) => Hours::Known(source.normalize()),
        None => Hours::Unavailable,
    }
}

/// `true` for exactly four ASCII digits
pub(crate) fn is_hhmm(time: &str) -> bool {
    time.len() == 4 && time.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unavailable_serializes_as_empty_object() {
        let value = serde_json::to_value(Hours::Unavailable).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn known_serializes_flat() {
        let hours = Hours::Known(CanonicalSchedule {
            open_now: false,
            open_days: vec![DaySegment {
                day: 3,
                start: "1100".into(),
                end: "2200".into(),
                is_overnight: false,
            }],
        });

        assert_eq!(
            serde_json::to_value(hours).unwrap(),
            json!({
                "open_now": false,
                "open_days": [{ "day": 3, "start": "1100", "end": "2200", "is_overnight": false }]
            })
        );
    }

    #[test]
    fn provider_tag_does_not_fall_back_to_other_shape() {
        let yelp_shaped = json!([{ "is_open_now": true, "open": [] }]);
        assert_eq!(normalize_hours(Provider::Google, &yelp_shaped), Hours::Unavailable);

        let google_shaped = json!({ "open_now": true, "periods": [] });
        assert_eq!(normalize_hours(Provider::Yelp, &google_shaped), Hours::Unavailable);
    }

    #[test]
    fn detect_picks_shape_by_structure() {
        let google = json!({ "open_now": false, "periods": [] });
        let yelp = json!([{ "is_open_now": false, "open": [] }]);

        assert_eq!(HoursSource::detect(&google).map(|s| s.shape()), Some("periods"));
        assert_eq!(HoursSource::detect(&yelp).map(|s| s.shape()), Some("day_segments"));
        assert!(HoursSource::detect(&json!("9 to 5")).is_none());
    }

    #[test]
    fn hhmm_check() {
        assert!(is_hhmm("0000"));
        assert!(is_hhmm("2359"));
        assert!(!is_hhmm("900"));
        assert!(!is_hhmm("09:00"));
        assert!(!is_hhmm("12a0"));
    }
}
