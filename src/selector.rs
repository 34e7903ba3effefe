use time::{Date, OffsetDateTime};

use crate::category::Category;
use crate::environment::SafeDb;
use crate::errors::BackendError;
use crate::event::EventOption;

/// The registrant's partial progress through the cascading form.
#[derive(Clone, Copy, Debug, Default)]
pub struct Selection {
    pub category: Option<Category>,
    pub date: Option<Date>,
}

/// The option sets backing the three cascading dropdowns.
#[derive(Clone, Debug, Default)]
pub struct OptionSets {
    pub categories: Vec<Category>,
    pub dates: Vec<Date>,
    pub events: Vec<EventOption>,
}

impl OptionSets {
    /// Whether any registration window is currently open. When this is
    /// false the caller must suppress the rest of the form.
    pub fn is_open(&self) -> bool {
        !self.categories.is_empty()
    }
}

/// Computes the valid options for each dropdown given the current time and
/// the registrant's partial selection. Dates are only offered within the
/// selected category, events only within the selected category and date,
/// and every set is restricted to events whose registration window
/// contains `now`. Read-only; the UI re-invokes this on every change.
pub async fn options(
    db: &SafeDb,
    now: OffsetDateTime,
    selection: Selection,
) -> Result<OptionSets, BackendError> {
    let categories = db.open_categories(&now).await?;

    if categories.is_empty() {
        return Ok(OptionSets::default());
    }

    let dates = match selection.category {
        Some(category) => db.open_dates(&now, &category).await?,
        None => vec![],
    };

    let events = match (selection.category, selection.date) {
        (Some(category), Some(date)) => db.open_events(&now, &category, &date).await?,
        _ => vec![],
    };

    Ok(OptionSets {
        categories,
        dates,
        events,
    })
}
