//! Fixed textual timestamp format used in stored records:
//! `YYYY-MM-DDTHH:MM:SS.ffffff`, no offset.
//!
//! Also usable as a `#[serde(with = "timestamp")]` module.

use chrono::{NaiveDateTime, SubsecRound, Utc};
use serde::{de, Deserialize, Deserializer, Serializer};

use crate::errors::ModelError;

pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

// `%.f` also accepts a missing fraction and any number of digits; parsed
// values are truncated to microseconds to match what `format` writes.
const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Current instant at microsecond precision, so it survives a format/parse
/// cycle unchanged.
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(6)
}

pub fn format(ts: &NaiveDateTime) -> String {
    ts.format(FORMAT).to_string()
}

pub fn parse(s: &str) -> Result<NaiveDateTime, ModelError> {
    NaiveDateTime::parse_from_str(s, PARSE_FORMAT)
        .map(|ts| ts.trunc_subsecs(6))
        .map_err(|e| ModelError::Timestamp(format!("`{s}`: {e}")))
}

pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(ts))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(de::Error::custom)
}
