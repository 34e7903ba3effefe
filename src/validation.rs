use serde::Serialize;

use crate::environment::SafeDb;
use crate::errors::BackendError;
use crate::registration::NewRegistration;

/// The submission fields a validation error can be attached to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FullName,
    Email,
    CollegeName,
    Department,
    Event,
    EventDate,
}

/// A single validation failure, addressed to the offending field so the
/// form can surface it inline.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: &str) -> Self {
        FieldError {
            field,
            message: message.to_owned(),
        }
    }
}

/// Checks a candidate submission and collects every failure rather than
/// stopping at the first, so the registrant can fix the whole form in one
/// pass. An empty result means the candidate may be stored.
pub async fn validate(
    db: &SafeDb,
    candidate: &NewRegistration,
) -> Result<Vec<FieldError>, BackendError> {
    let mut errors = vec![];

    if let Some(event_date) = candidate.event_date {
        if db.registration_exists(&candidate.email, &event_date).await? {
            errors.push(FieldError::new(
                Field::Email,
                "You have already registered for an event on this date.",
            ));
        }
    }

    for &(field, value, label) in &[
        (Field::FullName, &candidate.full_name, "Full name"),
        (Field::CollegeName, &candidate.college_name, "College name"),
        (Field::Department, &candidate.department, "Department"),
    ] {
        if contains_invalid_characters(value) {
            errors.push(FieldError::new(
                field,
                &format!("{} contains invalid characters.", label),
            ));
        }
    }

    if candidate.event_id.is_none() {
        errors.push(FieldError::new(Field::Event, "Please select an event."));
    }

    // the duplicate rule keys on the date, so an event selection without its
    // date is incomplete, not merely unchecked
    if candidate.event_id.is_some() && candidate.event_date.is_none() {
        errors.push(FieldError::new(
            Field::EventDate,
            "Please select an event date.",
        ));
    }

    Ok(errors)
}

fn contains_invalid_characters(value: &str) -> bool {
    !value.chars().all(is_allowed)
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || c == '.' || c == '-' || c == ','
}
