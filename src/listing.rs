use time::Date;

use crate::environment::SafeDb;
use crate::errors::BackendError;
use crate::registration::Registration;

/// The admin screen's filter. Both criteria are conjunctive; an empty
/// filter matches everything.
#[derive(Clone, Debug, Default)]
pub struct RegistrationFilter {
    pub event_date: Option<Date>,
    pub event_name: Option<String>,
}

/// A page of registrations together with the matching total, so the list
/// and its count always describe the same filter.
#[derive(Debug)]
pub struct FilteredRegistrations {
    pub total: i64,
    pub registrations: Vec<Registration>,
}

/// Runs the admin filter, returning the matching rows in submission order.
pub async fn query(
    db: &SafeDb,
    filter: &RegistrationFilter,
) -> Result<FilteredRegistrations, BackendError> {
    let total = db.count_registrations(filter).await?;
    let registrations = db.list_registrations(filter).await?;

    Ok(FilteredRegistrations {
        total,
        registrations,
    })
}

/// The distinct event dates any registration has been stored for,
/// populating the admin date dropdown.
pub async fn dates(db: &SafeDb) -> Result<Vec<Date>, BackendError> {
    db.registration_dates().await
}

/// The distinct event names registered on the given date, populating the
/// dependent name dropdown.
pub async fn names(db: &SafeDb, date: &Date) -> Result<Vec<String>, BackendError> {
    db.registration_names(date).await
}
