use serde::Serialize;
use warp::reject;

use crate::errors::BackendError;
use crate::validation::FieldError;

#[derive(Debug)]
pub struct Rejection {
    pub(crate) context: Context,
    pub(crate) error: BackendError,
}

impl Rejection {
    pub fn new(context: Context, error: BackendError) -> Self {
        Rejection { context, error }
    }

    pub fn flatten(&self) -> FlattenedRejection {
        let errors = match &self.error {
            BackendError::Validation { errors } => Some(errors.clone()),
            _ => None,
        };

        FlattenedRejection {
            context: self.context.clone(),
            message: format!("{}", self.error),
            errors,
        }
    }
}

impl reject::Reject for Rejection {}

#[derive(Debug, Serialize)]
pub struct FlattenedRejection {
    #[serde(flatten)]
    pub(crate) context: Context,
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) errors: Option<Vec<FieldError>>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Context {
    Categories,
    Dates { category: String },
    Events { category: String, date: String },
    Submit,
    CreateEvent,
    Registrations,
    RegistrationDates,
    RegistrationNames { date: String },
    Export,
    Settings,
    UpdateSettings,
}

impl Context {
    pub fn categories() -> Context {
        Context::Categories
    }

    pub fn dates(category: String) -> Context {
        Context::Dates { category }
    }

    pub fn events(category: String, date: String) -> Context {
        Context::Events { category, date }
    }

    pub fn submit() -> Context {
        Context::Submit
    }

    pub fn create_event() -> Context {
        Context::CreateEvent
    }

    pub fn registrations() -> Context {
        Context::Registrations
    }

    pub fn registration_dates() -> Context {
        Context::RegistrationDates
    }

    pub fn registration_names(date: String) -> Context {
        Context::RegistrationNames { date }
    }

    pub fn export() -> Context {
        Context::Export
    }

    pub fn settings() -> Context {
        Context::Settings
    }

    pub fn update_settings() -> Context {
        Context::UpdateSettings
    }
}
