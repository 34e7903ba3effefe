use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::category::Category;
use crate::normalization;

/// A configured event in the catalog. Immutable once created; registrations
/// copy the fields they need at submission time.
#[derive(Clone, Debug, Serialize)]
pub struct EventConfiguration {
    /// The ID of the event, generated by the store.
    pub id: Uuid,

    /// The name shown in the final dropdown.
    pub event_name: String,

    /// The category it was filed under.
    pub category: Category,

    /// The day the event takes place.
    #[serde(with = "crate::iso_date")]
    pub event_date: Date,

    /// The instant public registration opens.
    #[serde(with = "time::serde::timestamp")]
    pub registration_start: OffsetDateTime,

    /// The instant public registration closes (inclusive).
    #[serde(with = "time::serde::timestamp")]
    pub registration_end: OffsetDateTime,
}

/// An event configuration as submitted by the admin form.
#[derive(Clone, Debug, Deserialize)]
pub struct NewEvent {
    #[serde(deserialize_with = "normalization::deserialize")]
    pub event_name: String,

    pub category: Category,

    #[serde(with = "crate::iso_date")]
    pub event_date: Date,

    #[serde(with = "time::serde::timestamp")]
    pub registration_start: OffsetDateTime,

    #[serde(with = "time::serde::timestamp")]
    pub registration_end: OffsetDateTime,
}

/// An open event as offered in the final dropdown of the cascade.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct EventOption {
    /// The ID of the event.
    pub id: Uuid,

    /// The name shown to the registrant.
    pub name: String,
}
