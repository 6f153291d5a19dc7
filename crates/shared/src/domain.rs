use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned event identifier.
///
/// Servers hand these out either as JSON strings or as JSON numbers; both are
/// accepted and kept in their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Signed(value) => Self(value.to_string()),
            RawId::Unsigned(value) => Self(value.to_string()),
        })
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EventId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub event_name: String,
    pub start_date: String,
    pub end_date: String,
}

impl Event {
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        end_date_passed(today, &self.end_date)
    }
}

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Parses the date forms a date input or a JSON store is likely to hand back:
/// a zero-padded `YYYY-MM-DD`, or an RFC 3339 timestamp (its calendar date is used).
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    parse_day(raw).or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

// chrono accepts unpadded fields, so "2025-07-1" only counts if it formats back unchanged.
fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DAY_FORMAT)
        .ok()
        .filter(|day| day.format(DAY_FORMAT).to_string() == raw)
}

/// True when `end_date` falls strictly before `today`. Unparseable dates never expire.
pub fn end_date_passed(today: NaiveDate, end_date: &str) -> bool {
    parse_event_date(end_date).is_some_and(|end| end < today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("date")
    }

    #[test]
    fn event_id_accepts_numbers_and_strings() {
        let from_number: EventId = serde_json::from_str("17").expect("number id");
        let from_text: EventId = serde_json::from_str("\"a1b2\"").expect("string id");
        assert_eq!(from_number, EventId::from("17"));
        assert_eq!(from_text, EventId::from("a1b2"));
        assert_eq!(serde_json::to_string(&from_number).expect("json"), "\"17\"");
    }

    #[test]
    fn event_uses_camel_case_field_names() {
        let event: Event = serde_json::from_str(
            r#"{"id":3,"eventName":"Standup","startDate":"2025-01-01","endDate":"2025-01-02"}"#,
        )
        .expect("event");
        assert_eq!(event.id, EventId::from("3"));
        assert_eq!(event.event_name, "Standup");

        let value = serde_json::to_value(&event).expect("json");
        assert_eq!(value["eventName"], "Standup");
        assert_eq!(value["endDate"], "2025-01-02");
    }

    #[test]
    fn end_date_before_today_is_expired() {
        let today = date("2025-07-15");
        assert!(end_date_passed(today, "2025-07-14"));
        assert!(end_date_passed(today, "2024-12-31"));
    }

    #[test]
    fn end_date_on_or_after_today_is_not_expired() {
        let today = date("2025-07-15");
        assert!(!end_date_passed(today, "2025-07-15"));
        assert!(!end_date_passed(today, "2025-07-16"));
    }

    #[test]
    fn unparseable_end_date_is_never_expired() {
        let today = date("2025-07-15");
        assert!(!end_date_passed(today, ""));
        assert!(!end_date_passed(today, "next tuesday"));
    }

    #[test]
    fn end_dates_must_be_zero_padded() {
        let today = date("2025-07-15");
        assert_eq!(parse_event_date("2025-07-1"), None);
        assert_eq!(parse_event_date("2025-7-01"), None);
        assert!(!end_date_passed(today, "2025-07-1"));
        assert_eq!(parse_event_date(" 2025-07-01 "), Some(date("2025-07-01")));
        assert!(end_date_passed(today, "2025-07-01"));
    }

    #[test]
    fn rfc3339_end_dates_compare_by_calendar_day() {
        let today = date("2025-07-15");
        assert!(end_date_passed(today, "2025-07-14T23:59:59Z"));
        assert!(!end_date_passed(today, "2025-07-15T00:00:00Z"));
    }
}
