use crate::models::DateRangeValue;
use chrono::{DateTime, Datelike, Days, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Named relative time windows offered by the time facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimePreset {
    #[serde(rename = "last30min")]
    Last30Min,
    #[serde(rename = "last7hr")]
    Last7Hr,
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "yesterday")]
    Yesterday,
    #[serde(rename = "last7")]
    Last7Days,
    #[serde(rename = "last30")]
    Last30Days,
    #[serde(rename = "thisMonth")]
    ThisMonth,
    #[serde(rename = "custom")]
    Custom,
}

impl TimePreset {
    pub const ALL: [TimePreset; 8] = [
        Self::Last30Min,
        Self::Last7Hr,
        Self::Today,
        Self::Yesterday,
        Self::Last7Days,
        Self::Last30Days,
        Self::ThisMonth,
        Self::Custom,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.as_str() == value)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Last30Min => "last30min",
            Self::Last7Hr => "last7hr",
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::Last7Days => "last7",
            Self::Last30Days => "last30",
            Self::ThisMonth => "thisMonth",
            Self::Custom => "custom",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Last30Min => "Last 30 minutes",
            Self::Last7Hr => "Last 7 hours",
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::Last7Days => "Last 7 days",
            Self::Last30Days => "Last 30 days",
            Self::ThisMonth => "This month",
            Self::Custom => "Custom range",
        }
    }
}

/// Absolute window in epoch milliseconds. A missing side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<i64>,
}

impl TimeBounds {
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, timestamp_ms: i64) -> bool {
        if let Some(from) = self.from {
            if timestamp_ms < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if timestamp_ms > to {
                return false;
            }
        }
        true
    }
}

/// Resolves a preset against the local wall clock.
pub fn resolve_time_range(preset: Option<&str>, custom: Option<&DateRangeValue>) -> TimeBounds {
    resolve_time_range_at(preset, custom, Local::now())
}

/// Resolves a preset against a caller-supplied `now`; calendar boundaries
/// (midnight, first of month) are taken in `now`'s timezone.
pub fn resolve_time_range_at<Tz: TimeZone>(
    preset: Option<&str>,
    custom: Option<&DateRangeValue>,
    now: DateTime<Tz>,
) -> TimeBounds {
    let Some(preset) = preset.and_then(TimePreset::parse) else {
        return TimeBounds::default();
    };

    let now_ms = now.timestamp_millis();
    let today = now.date_naive();
    let midnight = |date: NaiveDate| start_of_day(&now, date);

    match preset {
        TimePreset::Last30Min => TimeBounds {
            from: Some(now_ms - Duration::minutes(30).num_milliseconds()),
            to: Some(now_ms),
        },
        TimePreset::Last7Hr => TimeBounds {
            from: Some(now_ms - Duration::hours(7).num_milliseconds()),
            to: Some(now_ms),
        },
        TimePreset::Today => TimeBounds {
            from: Some(midnight(today)),
            to: Some(now_ms),
        },
        TimePreset::Yesterday => {
            let start_of_today = midnight(today);
            let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
            TimeBounds {
                from: Some(midnight(yesterday)),
                to: Some(start_of_today - 1),
            }
        }
        TimePreset::Last7Days => TimeBounds {
            from: Some(midnight(today.checked_sub_days(Days::new(6)).unwrap_or(today))),
            to: Some(now_ms),
        },
        TimePreset::Last30Days => TimeBounds {
            from: Some(midnight(today.checked_sub_days(Days::new(29)).unwrap_or(today))),
            to: Some(now_ms),
        },
        TimePreset::ThisMonth => TimeBounds {
            from: Some(midnight(today.with_day(1).unwrap_or(today))),
            to: Some(now_ms),
        },
        TimePreset::Custom => {
            let Some(range) = custom else {
                return TimeBounds::default();
            };
            TimeBounds {
                from: range.from_str_opt().and_then(parse_calendar_ms),
                to: range.to_str_opt().and_then(parse_calendar_ms),
            }
        }
    }
}

/// Parses a drawer date. Date-only input is midnight UTC; full RFC 3339
/// timestamps are accepted as-is. Anything else is treated as unset.
pub fn parse_calendar_ms(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc().timestamp_millis());
    }
    if let Ok(moment) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(moment.timestamp_millis());
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|moment| moment.and_utc().timestamp_millis())
}

fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>, date: NaiveDate) -> i64 {
    let naive = date.and_time(NaiveTime::MIN);
    now.timezone()
        .from_local_datetime(&naive)
        .earliest()
        .map(|moment| moment.timestamp_millis())
        // Midnight skipped by a DST jump: fall back to the UTC reading.
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const MINUTE: i64 = 60_000;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 12, 15, 30, 0).single().expect("valid instant")
    }

    fn ms(year: i32, month: u32, day: u32) -> i64 {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
            .single()
            .expect("valid date")
            .timestamp_millis()
    }

    #[test]
    fn known_presets_are_ordered() {
        for preset in TimePreset::ALL {
            let bounds = resolve_time_range_at(Some(preset.as_str()), None, fixed_now());
            if let (Some(from), Some(to)) = (bounds.from, bounds.to) {
                assert!(from <= to, "{} produced inverted bounds", preset.as_str());
            }
        }
    }

    #[test]
    fn unknown_or_missing_preset_is_unbounded() {
        assert_eq!(resolve_time_range_at(None, None, fixed_now()), TimeBounds::default());
        assert_eq!(
            resolve_time_range_at(Some("fortnight"), None, fixed_now()),
            TimeBounds::default()
        );
        assert!(resolve_time_range(Some(""), None).is_unbounded());
    }

    #[test]
    fn relative_presets_resolve_against_now() {
        let now = fixed_now();
        let now_ms = now.timestamp_millis();
        let midnight = ms(2025, 2, 12);

        let last30min = resolve_time_range_at(Some("last30min"), None, now);
        assert_eq!(last30min, TimeBounds { from: Some(now_ms - 30 * MINUTE), to: Some(now_ms) });

        let last7hr = resolve_time_range_at(Some("last7hr"), None, now);
        assert_eq!(last7hr.from, Some(now_ms - 7 * HOUR));

        let today = resolve_time_range_at(Some("today"), None, now);
        assert_eq!(today, TimeBounds { from: Some(midnight), to: Some(now_ms) });

        let yesterday = resolve_time_range_at(Some("yesterday"), None, now);
        assert_eq!(yesterday, TimeBounds { from: Some(midnight - DAY), to: Some(midnight - 1) });

        let last7 = resolve_time_range_at(Some("last7"), None, now);
        assert_eq!(last7.from, Some(midnight - 6 * DAY));

        let last30 = resolve_time_range_at(Some("last30"), None, now);
        assert_eq!(last30.from, Some(midnight - 29 * DAY));

        let this_month = resolve_time_range_at(Some("thisMonth"), None, now);
        assert_eq!(this_month.from, Some(ms(2025, 2, 1)));
    }

    #[test]
    fn midnight_follows_the_clock_timezone() {
        let offset = chrono::FixedOffset::east_opt(5 * 3600).expect("offset");
        let now = offset.with_ymd_and_hms(2025, 2, 12, 1, 0, 0).single().expect("instant");
        let today = resolve_time_range_at(Some("today"), None, now);
        // 2025-02-12T00:00+05:00 is 2025-02-11T19:00Z
        assert_eq!(today.from, Some(ms(2025, 2, 11) + 19 * HOUR));
    }

    #[test]
    fn custom_range_parses_calendar_dates() {
        let range = DateRangeValue::new(Some("2025-02-01"), Some("2025-02-05"));
        let bounds = resolve_time_range_at(Some("custom"), Some(&range), fixed_now());
        assert_eq!(bounds, TimeBounds { from: Some(ms(2025, 2, 1)), to: Some(ms(2025, 2, 5)) });
    }

    #[test]
    fn custom_range_without_bounds_is_unbounded() {
        let empty = DateRangeValue::default();
        assert!(resolve_time_range_at(Some("custom"), Some(&empty), fixed_now()).is_unbounded());
        assert!(resolve_time_range_at(Some("custom"), None, fixed_now()).is_unbounded());

        let garbage = DateRangeValue::new(Some("not a date"), Some(""));
        assert!(resolve_time_range_at(Some("custom"), Some(&garbage), fixed_now()).is_unbounded());
    }

    #[test]
    fn custom_range_may_be_half_open() {
        let range = DateRangeValue::new(None, Some("2025-02-05"));
        let bounds = resolve_time_range_at(Some("custom"), Some(&range), fixed_now());
        assert_eq!(bounds.from, None);
        assert_eq!(bounds.to, Some(ms(2025, 2, 5)));
        assert!(bounds.contains(ms(1999, 1, 1)));
        assert!(!bounds.contains(ms(2025, 2, 6)));
    }

    #[test]
    fn parse_calendar_accepts_rfc3339() {
        assert_eq!(parse_calendar_ms("2025-02-01T00:00:00Z"), Some(ms(2025, 2, 1)));
        assert_eq!(parse_calendar_ms("2025-02-01T12:00:00"), Some(ms(2025, 2, 1) + 12 * HOUR));
        assert_eq!(parse_calendar_ms("02/01/2025"), None);
    }
}
