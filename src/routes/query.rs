use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DatesQuery {
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub category: String,
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct NamesQuery {
    pub date: String,
}

/// The admin filter as it arrives on the query string. Dropdown
/// placeholders submit empty strings, which count as unset.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}
