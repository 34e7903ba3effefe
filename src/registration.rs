use serde::{de, Deserialize, Deserializer, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::category::Category;
use crate::normalization;

/// A submitted registration row.
///
/// `category`, `event_name` and `event_date` are copied from the catalog at
/// submission time so the row stays historically accurate even if the
/// catalog entry is altered later.
#[derive(Clone, Debug, Serialize)]
pub struct Registration {
    /// The ID of the registration.
    pub id: Uuid,

    /// The catalog event registered for. A weak reference: the row never
    /// follows later changes to the event.
    pub event_id: Uuid,

    /// The registrant's full name.
    pub name: String,

    /// The registrant's email address.
    pub email: String,

    /// The registrant's college.
    pub college: String,

    /// The registrant's department.
    pub department: String,

    /// Snapshot of the event's category.
    pub category: Category,

    /// Snapshot of the event's name.
    pub event_name: String,

    /// Snapshot of the event's date.
    #[serde(with = "crate::iso_date")]
    pub event_date: Date,

    /// The instant the registration was submitted, set by the store.
    #[serde(with = "time::serde::timestamp")]
    pub created: OffsetDateTime,
}

/// A candidate registration as submitted by the public form. Free-text
/// fields are normalized on deserialization, before validation sees them.
#[derive(Clone, Debug, Deserialize)]
pub struct NewRegistration {
    #[serde(deserialize_with = "normalization::deserialize")]
    pub full_name: String,

    #[serde(deserialize_with = "normalization::deserialize")]
    pub email: String,

    #[serde(deserialize_with = "normalization::deserialize")]
    pub college_name: String,

    #[serde(deserialize_with = "normalization::deserialize")]
    pub department: String,

    /// The selected event, if the cascade reached the final step. The form's
    /// placeholder option submits an empty string.
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub event_id: Option<Uuid>,

    /// The selected event date.
    #[serde(default, deserialize_with = "crate::iso_date::deserialize_option")]
    pub event_date: Option<Date>,
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where D: Deserializer<'de> {
    let raw: Option<String> = Deserialize::deserialize(deserializer)?;

    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => Uuid::parse_str(s).map(Some).map_err(de::Error::custom),
    }
}
