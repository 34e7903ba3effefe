use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::BackendError;

/// The closed set of categories an event can be configured under. The set is
/// part of the admin form contract, so it lives in code rather than in a
/// lookup table.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Category {
    #[serde(rename = "Online Workshop")]
    OnlineWorkshop,
    Hackathon,
    Conference,
    #[serde(rename = "One-day Workshop")]
    OneDayWorkshop,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::OnlineWorkshop,
        Category::Hackathon,
        Category::Conference,
        Category::OneDayWorkshop,
    ];

    /// The canonical label, as stored in the database and shown in dropdowns.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::OnlineWorkshop => "Online Workshop",
            Category::Hackathon => "Hackathon",
            Category::Conference => "Conference",
            Category::OneDayWorkshop => "One-day Workshop",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| BackendError::InvalidCategory(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::Category;

    #[test]
    fn labels_round_trip() {
        for category in &Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), *category);
        }
    }

    #[test]
    fn unknown_labels_are_rejected() {
        assert!("Webinar".parse::<Category>().is_err());
        // labels are matched exactly, not case-insensitively
        assert!("online workshop".parse::<Category>().is_err());
    }

    #[test]
    fn serializes_to_the_canonical_label() {
        let json = serde_json::to_string(&Category::OneDayWorkshop).unwrap();

        assert_eq!(json, "\"One-day Workshop\"");
    }
}
