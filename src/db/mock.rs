use std::sync::RwLock;

use futures::future::BoxFuture;
use futures::FutureExt;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::Db;
use crate::category::Category;
use crate::errors::BackendError;
use crate::event::{EventConfiguration, EventOption, NewEvent};
use crate::listing::RegistrationFilter;
use crate::registration::{NewRegistration, Registration};
use crate::settings::NotificationSettings;

/// An in-memory [`Db`] for tests.
#[derive(Default)]
pub(crate) struct MockDb {
    pub(crate) events: RwLock<Vec<EventConfiguration>>,
    pub(crate) registrations: RwLock<Vec<Registration>>,
    pub(crate) settings: RwLock<Option<NotificationSettings>>,
}

impl MockDb {
    pub(crate) fn with_events(events: Vec<EventConfiguration>) -> Self {
        MockDb {
            events: RwLock::new(events),
            ..Default::default()
        }
    }

    fn open(&self, now: &OffsetDateTime) -> Vec<EventConfiguration> {
        self.events
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.registration_start <= *now && *now <= e.registration_end)
            .cloned()
            .collect()
    }

    fn matches(registration: &Registration, filter: &RegistrationFilter) -> bool {
        filter
            .event_date
            .map_or(true, |date| registration.event_date == date)
            && filter
                .event_name
                .as_deref()
                .map_or(true, |name| registration.event_name == name)
    }
}

impl Db for MockDb {
    fn insert_event(&self, event: NewEvent) -> BoxFuture<Result<Uuid, BackendError>> {
        let id = Uuid::new_v4();

        self.events.write().unwrap().push(EventConfiguration {
            id,
            event_name: event.event_name,
            category: event.category,
            event_date: event.event_date,
            registration_start: event.registration_start,
            registration_end: event.registration_end,
        });

        async move { Ok(id) }.boxed()
    }

    fn retrieve_event(
        &self,
        id: &Uuid,
    ) -> BoxFuture<Result<Option<EventConfiguration>, BackendError>> {
        let event = self
            .events
            .read()
            .unwrap()
            .iter()
            .find(|e| e.id == *id)
            .cloned();

        async move { Ok(event) }.boxed()
    }

    fn open_categories(
        &self,
        now: &OffsetDateTime,
    ) -> BoxFuture<Result<Vec<Category>, BackendError>> {
        let mut categories: Vec<Category> = self.open(now).into_iter().map(|e| e.category).collect();
        // label order, matching ORDER BY category in the store
        categories.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        categories.dedup();

        async move { Ok(categories) }.boxed()
    }

    fn open_dates(
        &self,
        now: &OffsetDateTime,
        category: &Category,
    ) -> BoxFuture<Result<Vec<Date>, BackendError>> {
        let mut dates: Vec<Date> = self
            .open(now)
            .into_iter()
            .filter(|e| e.category == *category)
            .map(|e| e.event_date)
            .collect();
        dates.sort();
        dates.dedup();

        async move { Ok(dates) }.boxed()
    }

    fn open_events(
        &self,
        now: &OffsetDateTime,
        category: &Category,
        date: &Date,
    ) -> BoxFuture<Result<Vec<EventOption>, BackendError>> {
        let mut events: Vec<EventOption> = self
            .open(now)
            .into_iter()
            .filter(|e| e.category == *category && e.event_date == *date)
            .map(|e| EventOption {
                id: e.id,
                name: e.event_name,
            })
            .collect();
        events.sort_by(|a, b| a.name.cmp(&b.name));

        async move { Ok(events) }.boxed()
    }

    fn registration_exists(
        &self,
        email: &str,
        event_date: &Date,
    ) -> BoxFuture<Result<bool, BackendError>> {
        let exists = self
            .registrations
            .read()
            .unwrap()
            .iter()
            .any(|r| r.email == email && r.event_date == *event_date);

        async move { Ok(exists) }.boxed()
    }

    fn insert_registration(
        &self,
        candidate: &NewRegistration,
        event: &EventConfiguration,
    ) -> BoxFuture<Result<Registration, BackendError>> {
        let registration = Registration {
            id: Uuid::new_v4(),
            event_id: event.id,
            name: candidate.full_name.clone(),
            email: candidate.email.clone(),
            college: candidate.college_name.clone(),
            department: candidate.department.clone(),
            category: event.category,
            event_name: event.event_name.clone(),
            event_date: event.event_date,
            created: OffsetDateTime::now_utc(),
        };

        self.registrations
            .write()
            .unwrap()
            .push(registration.clone());

        async move { Ok(registration) }.boxed()
    }

    fn list_registrations(
        &self,
        filter: &RegistrationFilter,
    ) -> BoxFuture<Result<Vec<Registration>, BackendError>> {
        let registrations: Vec<Registration> = self
            .registrations
            .read()
            .unwrap()
            .iter()
            .filter(|r| MockDb::matches(r, filter))
            .cloned()
            .collect();

        async move { Ok(registrations) }.boxed()
    }

    fn count_registrations(
        &self,
        filter: &RegistrationFilter,
    ) -> BoxFuture<Result<i64, BackendError>> {
        let count = self
            .registrations
            .read()
            .unwrap()
            .iter()
            .filter(|r| MockDb::matches(r, filter))
            .count() as i64;

        async move { Ok(count) }.boxed()
    }

    fn registration_dates(&self) -> BoxFuture<Result<Vec<Date>, BackendError>> {
        let mut dates: Vec<Date> = self
            .registrations
            .read()
            .unwrap()
            .iter()
            .map(|r| r.event_date)
            .collect();
        dates.sort();
        dates.dedup();

        async move { Ok(dates) }.boxed()
    }

    fn registration_names(&self, date: &Date) -> BoxFuture<Result<Vec<String>, BackendError>> {
        let mut names: Vec<String> = self
            .registrations
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.event_date == *date)
            .map(|r| r.event_name.clone())
            .collect();
        names.sort();
        names.dedup();

        async move { Ok(names) }.boxed()
    }

    fn retrieve_settings(&self) -> BoxFuture<Result<Option<NotificationSettings>, BackendError>> {
        let settings = self.settings.read().unwrap().clone();

        async move { Ok(settings) }.boxed()
    }

    fn update_settings(
        &self,
        settings: &NotificationSettings,
    ) -> BoxFuture<Result<(), BackendError>> {
        *self.settings.write().unwrap() = Some(settings.clone());

        async move { Ok(()) }.boxed()
    }
}
