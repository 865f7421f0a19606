use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::DaySegment;

/// First entry of Yelp's `hours` array. Days run Monday (0) to Sunday (6).
#[derive(Debug, Clone, PartialEq)]
pub struct DaySegmentHours {
    pub is_open_now: bool,
    /// Usable entries only; incomplete ones are dropped while reading.
    pub open: Vec<DaySegmentEntry>,
    pub hours_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DaySegmentEntry {
    pub is_overnight: bool,
    pub start: String,
    pub end: String,
    pub day: i64,
}

impl DaySegmentHours {
    /// Accepts an array whose first element carries a boolean `is_open_now`
    /// and an `open` array of objects.
    pub fn from_value(raw: &Value) -> Option<Self> {
        let first = raw.as_array()?.first()?;
        let is_open_now = first.get("is_open_now")?.as_bool()?;
        let items = first.get("open")?.as_array()?;
        if !items.iter().all(Value::is_object) {
            return None;
        }

        let open = items
            .iter()
            .filter_map(|item| match serde_json::from_value::<DaySegmentEntry>(item.clone()) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!(%item, error = %e, "skipping incomplete day segment");
                    None
                }
            })
            .collect();

        Some(Self {
            is_open_now,
            open,
            hours_type: first.get("hours_type").and_then(Value::as_str).map(str::to_string),
        })
    }

    /// Shift every entry onto the Sunday-first week; times and the overnight
    /// flag are already authoritative and pass through untouched.
    pub(super) fn remap(&self) -> Vec<DaySegment> {
        self.open
            .iter()
            .filter_map(|entry| {
                let Some(day) = u8::try_from(entry.day).ok().filter(|day| *day < 7) else {
                    debug!(?entry, "skipping day segment with day outside 0-6");
                    return None;
                };
                Some(DaySegment {
                    day: (day + 1) % 7,
                    start: entry.start.clone(),
                    end: entry.end.clone(),
                    is_overnight: entry.is_overnight,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sunday_moves_to_front_of_week() {
        let hours = DaySegmentHours::from_value(&json!([{
            "hours_type": "REGULAR",
            "is_open_now": false,
            "open": [{ "is_overnight": false, "start": "1000", "end": "1400", "day": 6 }]
        }]))
        .unwrap();

        assert_eq!(hours.hours_type.as_deref(), Some("REGULAR"));
        assert_eq!(hours.remap()[0].day, 0);
    }

    #[test]
    fn overnight_flag_is_not_recomputed() {
        // Provider says not overnight even though end <= start; keep its answer.
        let hours = DaySegmentHours::from_value(&json!([{
            "is_open_now": true,
            "open": [{ "is_overnight": false, "start": "0000", "end": "0000", "day": 2 }]
        }]))
        .unwrap();

        let remapped = hours.remap();
        assert_eq!(remapped.len(), 1);
        assert!(!remapped[0].is_overnight);
        assert_eq!(remapped[0].day, 3);
    }

    #[test]
    fn only_first_block_is_read() {
        let hours = DaySegmentHours::from_value(&json!([
            { "is_open_now": true, "open": [] },
            { "is_open_now": false, "open": [{ "is_overnight": false, "start": "0900", "end": "1700", "day": 0 }] }
        ]))
        .unwrap();

        assert!(hours.is_open_now);
        assert!(hours.remap().is_empty());
    }

    #[test]
    fn incomplete_entry_does_not_drop_the_rest() {
        let hours = DaySegmentHours::from_value(&json!([{
            "is_open_now": true,
            "open": [
                { "is_overnight": false, "start": "0900", "end": "1700", "day": 0 },
                { "start": "0900", "end": "1700", "day": 1 }
            ]
        }]))
        .unwrap();

        assert_eq!(hours.open.len(), 1);
        assert_eq!(hours.remap()[0].day, 1);
    }

    #[test]
    fn rejects_missing_flag_or_non_array() {
        assert!(DaySegmentHours::from_value(&json!([{ "open": [] }])).is_none());
        assert!(DaySegmentHours::from_value(&json!([])).is_none());
        assert!(DaySegmentHours::from_value(&json!([[]])).is_none());
        assert!(DaySegmentHours::from_value(&json!({ "is_open_now": true, "open": [] })).is_none());
        assert!(DaySegmentHours::from_value(&Value::Null).is_none());
        assert!(DaySegmentHours::from_value(&json!([{ "is_open_now": true, "open": [1] }])).is_none());
    }
}
