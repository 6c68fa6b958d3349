//! Dates cross the storage boundary either as native timestamps (Postgres
//! `timestamptz`) or as strings written by older clients. Everything past the
//! repository rows works with the canonical string produced here.

use chrono::{DateTime, SecondsFormat, Utc};

use super::error::ForumError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDate {
    Timestamp(DateTime<Utc>),
    Text(String),
}

impl RawDate {
    /// Renders the date as RFC 3339 in UTC with millisecond precision, e.g.
    /// `2021-08-08T07:19:09.775Z`.
    pub fn normalize(&self) -> Result<String, ForumError> {
        let timestamp = match self {
            RawDate::Timestamp(ts) => *ts,
            RawDate::Text(text) => DateTime::parse_from_rfc3339(text.trim())
                .map_err(|e| ForumError::Validation(format!("invalid date `{text}`: {e}")))?
                .with_timezone(&Utc),
        };

        Ok(timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl From<DateTime<Utc>> for RawDate {
    fn from(ts: DateTime<Utc>) -> Self {
        RawDate::Timestamp(ts)
    }
}

impl From<String> for RawDate {
    fn from(text: String) -> Self {
        RawDate::Text(text)
    }
}

impl From<&str> for RawDate {
    fn from(text: &str) -> Self {
        RawDate::Text(text.to_string())
    }
}
