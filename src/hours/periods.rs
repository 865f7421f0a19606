use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{is_hhmm, DaySegment, MIDNIGHT};

/// Close times at or before this are folded into the previous walked day
/// instead of opening a new row on the close day.
const FOLD_THRESHOLD: &str = "0600";

/// Google `opening_hours`: Sunday-first open/close period pairs
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodHours {
    pub open_now: bool,
    pub periods: Vec<Period>,
}

/// One period as received. Points that are missing or malformed are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Period {
    pub open: Option<PeriodPoint>,
    pub close: Option<PeriodPoint>,
    /// `close` key absent altogether, as opposed to present but unusable
    pub open_ended: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PeriodPoint {
    pub day: i64,
    pub time: String,
}

impl PeriodPoint {
    fn weekday(&self) -> Option<u8> {
        u8::try_from(self.day).ok().filter(|day| *day < 7)
    }
}

impl Period {
    fn from_value(raw: &Value) -> Self {
        Self {
            open: point(raw.get("open")),
            close: point(raw.get("close")),
            open_ended: raw.get("close").is_none(),
        }
    }
}

fn point(raw: Option<&Value>) -> Option<PeriodPoint> {
    let raw = raw?;
    match serde_json::from_value(raw.clone()) {
        Ok(point) => Some(point),
        Err(e) => {
            debug!(%raw, error = %e, "unusable period point");
            None
        }
    }
}

impl PeriodHours {
    /// Accepts an object with a boolean `open_now` and a `periods` array of
    /// objects. Individual periods are checked later, during expansion.
    pub fn from_value(raw: &Value) -> Option<Self> {
        let open_now = raw.get("open_now")?.as_bool()?;
        let items = raw.get("periods")?.as_array()?;
        if !items.iter().all(Value::is_object) {
            return None;
        }

        Some(Self {
            open_now,
            periods: items.iter().map(Period::from_value).collect(),
        })
    }

    /// Round-the-clock businesses come back as a single period opening
    /// Sunday at midnight with no `close` key.
    fn is_always_open(&self) -> bool {
        match self.periods.as_slice() {
            [only] => {
                only.open_ended
                    && only
                        .open
                        .as_ref()
                        .map_or(false, |open| open.day == 0 && open.time == MIDNIGHT)
            }
            _ => false,
        }
    }

    pub(super) fn expand(&self) -> Vec<DaySegment> {
        if self.is_always_open() {
            return (0..7)
                .map(|day| DaySegment {
                    day,
                    start: MIDNIGHT.to_string(),
                    end: MIDNIGHT.to_string(),
                    is_overnight: true,
                })
                .collect();
        }

        let mut segments = Vec::new();
        for period in &self.periods {
            let (Some(open), Some(close)) = (&period.open, &period.close) else {
                debug!(?period, "skipping period without both open and close");
                continue;
            };
            let (Some(open_day), Some(close_day)) = (open.weekday(), close.weekday()) else {
                debug!(?period, "skipping period with day outside 0-6");
                continue;
            };
            if !is_hhmm(&open.time) || !is_hhmm(&close.time) {
                debug!(?period, "skipping period with malformed time");
                continue;
            }

            expand_period(open_day, &open.time, close_day, &close.time, &mut segments);
        }
        segments
    }
}

fn expand_period(open_day: u8, open_time: &str, close_day: u8, close_time: &str, out: &mut Vec<DaySegment>) {
    if open_day == close_day {
        out.push(segment(open_day, open_time, close_time));
        return;
    }

    let days_open = if close_day > open_day {
        close_day - open_day
    } else {
        close_day + 7 - open_day
    };
    let last = if close_time <= FOLD_THRESHOLD {
        days_open - 1
    } else {
        days_open
    };

    for i in 0..=last {
        let start = if i == 0 { open_time } else { MIDNIGHT };
        let end = if i == last { close_time } else { MIDNIGHT };
        out.push(segment((open_day + i) % 7, start, end));
    }
}

fn segment(day: u8, start: &str, end: &str) -> DaySegment {
    DaySegment {
        day,
        start: start.to_string(),
        end: end.to_string(),
        is_overnight: end <= start,
    }
}
