use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Parse a persisted `YYYY-MM-DD` day string.
pub fn parse_day(value: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(value.trim(), DAY_FORMAT).map_err(|_| ParseError::Day {
        value: value.to_string(),
    })
}

pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// One day's completion state. Records compare and order by `day` alone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Record {
    #[serde(with = "day_string")]
    pub day: NaiveDate,
    pub done: bool,
}

impl Record {
    pub fn new(day: NaiveDate, done: bool) -> Self {
        Self { day, done }
    }

    pub fn tick(&mut self, done: bool) {
        self.done = done;
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.day == other.day
    }
}

impl Eq for Record {}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Record {
    fn cmp(&self, other: &Self) -> Ordering {
        self.day.cmp(&other.day)
    }
}

mod day_string {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_day(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_day(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_compare_by_day_only() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let done = Record::new(day, true);
        let undone = Record::new(day, false);
        assert_eq!(done, undone);
        assert!(Record::new(day.succ_opt().unwrap(), false) > done);
    }

    #[test]
    fn tick_is_idempotent() {
        let mut record = Record::new(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(), false);
        record.tick(true);
        record.tick(true);
        assert!(record.done);
        record.tick(false);
        assert!(!record.done);
    }

    #[test]
    fn rejects_malformed_day() {
        assert!(matches!(parse_day("2024/01/01"), Err(ParseError::Day { .. })));
        let parsed: Result<Record, _> =
            serde_json::from_str(r#"{"day": "01-02-2024", "done": true}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn serializes_day_as_plain_date() {
        let record = Record::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), true);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"day":"2024-01-02","done":true}"#);
    }
}
