//! Serde support for calendar dates as `YYYY-MM-DD` strings.

use serde::{de, Deserialize, Deserializer, Serializer};
use time::Date;

pub const FORMAT: &str = "%F";

pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
where S: Serializer {
    serializer.serialize_str(&date.format(FORMAT))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
where D: Deserializer<'de> {
    let raw: String = Deserialize::deserialize(deserializer)?;

    Date::parse(&raw, FORMAT).map_err(de::Error::custom)
}

/// Deserializes an optional date, treating a missing value or an empty
/// string (the form's placeholder option) as unset.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where D: Deserializer<'de> {
    let raw: Option<String> = Deserialize::deserialize(deserializer)?;

    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => Date::parse(s, FORMAT).map(Some).map_err(de::Error::custom),
    }
}
