use futures::future::BoxFuture;

use crate::errors::BackendError;
use crate::registration::Registration;

pub mod smtp;

#[cfg(test)]
pub(crate) mod mock;

/// The messages the module sends.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Template {
    /// Sent to the registrant after a successful submission.
    RegistrationConfirmation,
    /// Sent to the administrator when notifications are enabled.
    AdminNotification,
}

/// The values interpolated into a message body.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MailParams {
    pub name: String,
    pub email: String,
    pub event_name: String,
    pub event_date: String,
    pub category: String,
    pub college: String,
    pub department: String,
}

impl MailParams {
    pub fn from_registration(registration: &Registration) -> Self {
        MailParams {
            name: registration.name.clone(),
            email: registration.email.clone(),
            event_name: registration.event_name.clone(),
            event_date: registration.event_date.format("%F"),
            category: registration.category.to_string(),
            college: registration.college.clone(),
            department: registration.department.clone(),
        }
    }
}

/// Sends rendered messages. Failures are reported to the caller, which
/// decides whether they abort the surrounding operation.
// NOTE: these can be simplified once async functions in traits are stabilized
pub trait Mailer {
    fn send(
        &self,
        template: Template,
        recipient: &str,
        locale: &str,
        params: &MailParams,
    ) -> BoxFuture<Result<(), BackendError>>;
}

/// Renders the subject and plain-text body for a template. Unknown locales
/// fall back to English.
pub fn render(template: Template, locale: &str, params: &MailParams) -> (String, String) {
    // only "en" is shipped for now
    let _ = locale;

    match template {
        Template::RegistrationConfirmation => (
            format!("Registration confirmed: {}", params.event_name),
            format!(
                "Dear {},\n\n\
                 Your registration for \"{}\" ({}) on {} has been received.\n\n\
                 College: {}\n\
                 Department: {}\n\n\
                 We look forward to seeing you there.\n",
                params.name,
                params.event_name,
                params.category,
                params.event_date,
                params.college,
                params.department,
            ),
        ),
        Template::AdminNotification => (
            format!("New registration: {}", params.event_name),
            format!(
                "A new registration has been received.\n\n\
                 Name: {}\n\
                 Email: {}\n\
                 College: {}\n\
                 Department: {}\n\
                 Category: {}\n\
                 Event: {}\n\
                 Date: {}\n",
                params.name,
                params.email,
                params.college,
                params.department,
                params.category,
                params.event_name,
                params.event_date,
            ),
        ),
    }
}
