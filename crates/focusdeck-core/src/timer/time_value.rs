//! Normalized durations with hundredth-of-a-second resolution.
//!
//! A [`TimeValue`] is what every engine counts with. Minutes and seconds stay
//! in `0..=59` and hundredths in `0..=99`; hours are unbounded. Decrements
//! borrow from the next larger unit, increments carry into it.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned by [`TimeValue::decrement`] when the value is already zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("time value is already zero")]
pub struct Underflow;

/// How many fields a rendered [`TimeValue`] shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFormat {
    /// `HH:MM:SS:CC`
    #[default]
    Hundredths,
    /// `HH:MM:SS`
    Seconds,
}

/// Returned when a serialized [`TimeValue`] has a field outside its range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} out of range: {value} (max {max})")]
pub struct FieldOutOfRange {
    pub field: &'static str,
    pub value: u64,
    pub max: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawTimeValue")]
pub struct TimeValue {
    hours: u64,
    minutes: u8,
    seconds: u8,
    hundredths: u8,
}

#[derive(Deserialize)]
struct RawTimeValue {
    hours: u64,
    minutes: u64,
    seconds: u64,
    hundredths: u64,
}

impl TryFrom<RawTimeValue> for TimeValue {
    type Error = FieldOutOfRange;

    fn try_from(raw: RawTimeValue) -> Result<Self, Self::Error> {
        let bounded = |field: &'static str, value: u64, max: u8| {
            u8::try_from(value)
                .ok()
                .filter(|v| *v <= max)
                .ok_or(FieldOutOfRange { field, value, max })
        };
        Ok(Self {
            hours: raw.hours,
            minutes: bounded("minutes", raw.minutes, 59)?,
            seconds: bounded("seconds", raw.seconds, 59)?,
            hundredths: bounded("hundredths", raw.hundredths, 99)?,
        })
    }
}

impl TimeValue {
    pub const ZERO: TimeValue = TimeValue {
        hours: 0,
        minutes: 0,
        seconds: 0,
        hundredths: 0,
    };

    /// Build a value from hours, minutes and seconds, carrying overflowing
    /// minutes and seconds into the larger units. Hundredths start at zero.
    pub fn new(hours: u64, minutes: u64, seconds: u64) -> Self {
        let mut value = Self::ZERO;
        value.set(hours, minutes, seconds);
        value
    }

    pub fn from_minutes(minutes: u64) -> Self {
        Self::new(0, minutes, 0)
    }

    /// Parse raw text fields the way a permissive form would.
    ///
    /// See [`coerce_field`] for how each field is read.
    pub fn parse(hours: &str, minutes: &str, seconds: &str) -> Self {
        Self::new(
            coerce_field(hours),
            coerce_field(minutes),
            coerce_field(seconds),
        )
    }

    pub fn hours(&self) -> u64 {
        self.hours
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    pub fn hundredths(&self) -> u8 {
        self.hundredths
    }

    pub fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0 && self.seconds == 0 && self.hundredths == 0
    }

    /// Overwrite with the given fields, normalized. Hundredths reset to zero.
    pub fn set(&mut self, hours: u64, minutes: u64, seconds: u64) {
        let seconds_total = seconds % 60;
        let minutes = minutes.saturating_add(seconds / 60);
        let minutes_total = minutes % 60;
        let hours = hours.saturating_add(minutes / 60);

        self.hours = hours;
        self.minutes = minutes_total as u8;
        self.seconds = seconds_total as u8;
        self.hundredths = 0;
    }

    /// Count down by one hundredth, borrowing from larger units as needed.
    ///
    /// # Errors
    ///
    /// Returns [`Underflow`] and leaves the value untouched when it is
    /// already zero.
    pub fn decrement(&mut self) -> Result<(), Underflow> {
        if self.hundredths > 0 {
            self.hundredths -= 1;
        } else if self.seconds > 0 {
            self.seconds -= 1;
            self.hundredths = 99;
        } else if self.minutes > 0 {
            self.minutes -= 1;
            self.seconds = 59;
            self.hundredths = 99;
        } else if self.hours > 0 {
            self.hours -= 1;
            self.minutes = 59;
            self.seconds = 59;
            self.hundredths = 99;
        } else {
            return Err(Underflow);
        }
        Ok(())
    }

    /// Count up by one hundredth, carrying into larger units.
    pub fn increment(&mut self) {
        self.hundredths += 1;
        if self.hundredths < 100 {
            return;
        }
        self.hundredths = 0;
        self.seconds += 1;
        if self.seconds < 60 {
            return;
        }
        self.seconds = 0;
        self.minutes += 1;
        if self.minutes < 60 {
            return;
        }
        self.minutes = 0;
        self.hours = self.hours.saturating_add(1);
    }

    pub fn total_hundredths(&self) -> u64 {
        self.hours
            .saturating_mul(360_000)
            .saturating_add(self.minutes as u64 * 6_000)
            .saturating_add(self.seconds as u64 * 100)
            .saturating_add(self.hundredths as u64)
    }

    pub fn format(&self, format: TimeFormat) -> String {
        match format {
            TimeFormat::Hundredths => format!(
                "{:02}:{:02}:{:02}:{:02}",
                self.hours, self.minutes, self.seconds, self.hundredths
            ),
            TimeFormat::Seconds => {
                format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
            }
        }
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(TimeFormat::Hundredths))
    }
}

/// Read a numeric form field, never failing.
///
/// Leading whitespace is skipped and the leading run of ASCII digits is
/// taken, so `"12abc"` reads as 12. Empty, non-numeric and negative input
/// reads as 0. Values too large for `u64` saturate.
pub fn coerce_field(raw: &str) -> u64 {
    let trimmed = raw.trim_start();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    digits
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .fold(0u64, |acc, c| {
            acc.saturating_mul(10)
                .saturating_add(c.to_digit(10).unwrap_or(0) as u64)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_normalizes_overflowing_fields() {
        let value = TimeValue::new(0, 90, 75);
        assert_eq!(value.hours(), 1);
        assert_eq!(value.minutes(), 31);
        assert_eq!(value.seconds(), 15);
        assert_eq!(value.hundredths(), 0);
    }

    #[test]
    fn decrement_borrows_through_every_unit() {
        let mut value = TimeValue::new(1, 0, 0);
        value.decrement().unwrap();
        assert_eq!(value, TimeValue { hours: 0, minutes: 59, seconds: 59, hundredths: 99 });
    }

    #[test]
    fn decrement_at_zero_underflows_without_change() {
        let mut value = TimeValue::ZERO;
        assert_eq!(value.decrement(), Err(Underflow));
        assert!(value.is_zero());
    }

    #[test]
    fn increment_carries_into_hours() {
        let mut value = TimeValue { hours: 0, minutes: 59, seconds: 59, hundredths: 99 };
        value.increment();
        assert_eq!(value, TimeValue::new(1, 0, 0));
    }

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(TimeValue::new(1, 2, 3).to_string(), "01:02:03:00");
        assert_eq!(TimeValue::new(1, 2, 3).format(TimeFormat::Seconds), "01:02:03");
        assert_eq!(TimeValue::new(123, 0, 0).format(TimeFormat::Seconds), "123:00:00");
    }

    #[test]
    fn deserialize_accepts_in_range_fields() {
        let value: TimeValue = serde_json::from_str(
            r#"{"hours":2,"minutes":59,"seconds":0,"hundredths":99}"#,
        )
        .unwrap();
        assert_eq!(value.to_string(), "02:59:00:99");
        assert_eq!(serde_json::to_value(value).unwrap()["hundredths"], 99);
    }

    #[test]
    fn deserialize_rejects_out_of_range_fields() {
        let err = serde_json::from_str::<TimeValue>(
            r#"{"hours":0,"minutes":200,"seconds":99,"hundredths":250}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("minutes out of range: 200"));

        for json in [
            r#"{"hours":0,"minutes":0,"seconds":60,"hundredths":0}"#,
            r#"{"hours":0,"minutes":0,"seconds":0,"hundredths":255}"#,
            r#"{"hours":0,"minutes":0,"seconds":0,"hundredths":1000}"#,
        ] {
            assert!(serde_json::from_str::<TimeValue>(json).is_err(), "{json}");
        }
    }

    #[test]
    fn coerce_field_is_permissive() {
        assert_eq!(coerce_field("25"), 25);
        assert_eq!(coerce_field("  7"), 7);
        assert_eq!(coerce_field("12abc"), 12);
        assert_eq!(coerce_field("abc"), 0);
        assert_eq!(coerce_field(""), 0);
        assert_eq!(coerce_field("-5"), 0);
        assert_eq!(coerce_field("+4"), 4);
        assert_eq!(coerce_field("99999999999999999999999"), u64::MAX);
    }

    #[test]
    fn parse_coerces_each_field() {
        assert_eq!(TimeValue::parse("1", "x", "30"), TimeValue::new(1, 0, 30));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn decrementing_total_hundredths_reaches_exactly_zero(
            h in 0u64..2,
            m in 0u64..60,
            s in 0u64..60,
        ) {
            let mut value = TimeValue::new(h, m, s);
            let total = value.total_hundredths();
            for _ in 0..total {
                prop_assert!(value.decrement().is_ok());
                prop_assert!(value.minutes() < 60);
                prop_assert!(value.seconds() < 60);
                prop_assert!(value.hundredths() < 100);
            }
            prop_assert!(value.is_zero());
            prop_assert_eq!(value.decrement(), Err(Underflow));
        }

        #[test]
        fn increments_match_total_hundredths(n in 0u64..50_000) {
            let mut value = TimeValue::ZERO;
            for _ in 0..n {
                value.increment();
            }
            prop_assert_eq!(value.total_hundredths(), n);
            prop_assert_eq!(value.hundredths() as u64, n % 100);
        }

        #[test]
        fn set_then_format_round_trips(h in 0u64..100, m in 0u64..60, s in 0u64..60) {
            let value = TimeValue::new(h, m, s);
            prop_assert_eq!(value.to_string(), format!("{h:02}:{m:02}:{s:02}:00"));
        }
    }
}
