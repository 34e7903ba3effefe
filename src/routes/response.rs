use serde::Serialize;

use crate::category::Category;
use crate::event::EventOption;
use crate::registration::Registration;
use crate::settings::NotificationSettings;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SuccessResponse<'a> {
    Categories {
        open: bool,
        categories: Vec<Category>,
    },
    Dates {
        dates: Vec<String>,
    },
    Events {
        events: Vec<EventOption>,
    },
    Submission {
        id: String,
        warnings: Vec<String>,
    },
    EventCreated {
        id: String,
    },
    Registrations {
        total: i64,
        registrations: Vec<Registration>,
    },
    RegistrationNames {
        names: Vec<String>,
    },
    Settings(NotificationSettings),
    Healthz {
        revision: Option<&'a str>,
        timestamp: Option<&'a str>,
        version: &'a str,
    },
}
