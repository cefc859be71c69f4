//! Calendar month arithmetic shared by the planner, statements, and checklist.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// The `(year, month)` a record is billed against, independent of its calendar
/// date. Ordered chronologically; serialized as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompetenceMonth {
    pub year: i32,
    pub month: u32,
}

impl CompetenceMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("valid competence month")
    }

    pub fn last_day(&self) -> NaiveDate {
        self.date_with_day(31)
    }

    /// Places `day` inside this month, truncating to the month's last day when
    /// the month is shorter.
    pub fn date_with_day(&self, day: u32) -> NaiveDate {
        let day = day.min(days_in_month(self.year, self.month));
        NaiveDate::from_ymd_opt(self.year, self.month, day).expect("valid truncated day")
    }

    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn pred(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Zero-based month index used for chronological distance.
    pub fn index(&self) -> i32 {
        self.year * 12 + self.month as i32 - 1
    }

    /// Whole months from `earlier` to `self` (negative when `self` precedes it).
    pub fn months_since(&self, earlier: CompetenceMonth) -> i32 {
        self.index() - earlier.index()
    }
}

impl fmt::Display for CompetenceMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for CompetenceMonth {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (year, month) = value
            .split_once('-')
            .ok_or_else(|| format!("invalid competence month `{value}`"))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid competence year in `{value}`"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("invalid competence month in `{value}`"))?;
        CompetenceMonth::new(year, month).ok_or_else(|| format!("month out of range in `{value}`"))
    }
}

impl Serialize for CompetenceMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CompetenceMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MonthVisitor;

        impl Visitor<'_> for MonthVisitor {
            type Value = CompetenceMonth;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a `YYYY-MM` competence month")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(MonthVisitor)
    }
}

/// Advances a date by whole calendar months, preserving the day-of-month and
/// truncating to the target month's last day when it does not exist there.
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    let mut day = date.day();
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    day = day.min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).expect("valid shifted date")
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).expect("fallback day"));
    let last_current = first_next - Duration::days(1);
    last_current.day()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn shift_month_truncates_to_last_day() {
        assert_eq!(shift_month(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(shift_month(date(2023, 1, 31), 1), date(2023, 2, 28));
        assert_eq!(shift_month(date(2024, 10, 31), 1), date(2024, 11, 30));
    }

    #[test]
    fn shift_month_crosses_year_boundaries() {
        assert_eq!(shift_month(date(2024, 11, 15), 3), date(2025, 2, 15));
        assert_eq!(shift_month(date(2024, 2, 15), -3), date(2023, 11, 15));
    }

    #[test]
    fn competence_ordering_is_chronological() {
        let jan = CompetenceMonth::new(2024, 1).unwrap();
        let dec_prior = CompetenceMonth::new(2023, 12).unwrap();
        assert!(dec_prior < jan);
        assert_eq!(dec_prior.succ(), jan);
        assert_eq!(jan.pred(), dec_prior);
        assert_eq!(jan.months_since(dec_prior), 1);
    }

    #[test]
    fn date_with_day_truncates() {
        let feb = CompetenceMonth::new(2024, 2).unwrap();
        assert_eq!(feb.date_with_day(31), date(2024, 2, 29));
        assert_eq!(feb.date_with_day(15), date(2024, 2, 15));
    }

    #[test]
    fn serde_roundtrip_uses_year_month_string() {
        let month = CompetenceMonth::new(2024, 7).unwrap();
        let json = serde_json::to_string(&month).unwrap();
        assert_eq!(json, "\"2024-07\"");
        let back: CompetenceMonth = serde_json::from_str(&json).unwrap();
        assert_eq!(back, month);
    }

    #[test]
    fn rejects_out_of_range_month() {
        assert!(CompetenceMonth::new(2024, 13).is_none());
        assert!("2024-00".parse::<CompetenceMonth>().is_err());
    }
}
