use futures::future::BoxFuture;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::category::Category;
use crate::errors::BackendError;
use crate::event::{EventConfiguration, EventOption, NewEvent};
use crate::listing::RegistrationFilter;
use crate::registration::{NewRegistration, Registration};
use crate::settings::NotificationSettings;

pub trait Db {
    /// Inserts an event configuration and returns its generated ID.
    fn insert_event(&self, event: NewEvent) -> BoxFuture<Result<Uuid, BackendError>>;

    fn retrieve_event(
        &self,
        id: &Uuid,
    ) -> BoxFuture<Result<Option<EventConfiguration>, BackendError>>;

    /// Distinct categories with a registration window containing `now`.
    fn open_categories(&self, now: &OffsetDateTime) -> BoxFuture<Result<Vec<Category>, BackendError>>;

    /// Distinct open event dates within the given category.
    fn open_dates(
        &self,
        now: &OffsetDateTime,
        category: &Category,
    ) -> BoxFuture<Result<Vec<Date>, BackendError>>;

    /// Open events within the given category and date.
    fn open_events(
        &self,
        now: &OffsetDateTime,
        category: &Category,
        date: &Date,
    ) -> BoxFuture<Result<Vec<EventOption>, BackendError>>;

    /// Whether a registration with this email already exists for this event
    /// date. Not atomic with the subsequent insert; see the duplicate-race
    /// note in DESIGN.md.
    fn registration_exists(
        &self,
        email: &str,
        event_date: &Date,
    ) -> BoxFuture<Result<bool, BackendError>>;

    /// Inserts a registration combining the candidate's fields with the
    /// event snapshot and returns the persisted row.
    fn insert_registration(
        &self,
        candidate: &NewRegistration,
        event: &EventConfiguration,
    ) -> BoxFuture<Result<Registration, BackendError>>;

    fn list_registrations(
        &self,
        filter: &RegistrationFilter,
    ) -> BoxFuture<Result<Vec<Registration>, BackendError>>;

    fn count_registrations(
        &self,
        filter: &RegistrationFilter,
    ) -> BoxFuture<Result<i64, BackendError>>;

    /// Distinct event dates across all registrations.
    fn registration_dates(&self) -> BoxFuture<Result<Vec<Date>, BackendError>>;

    /// Distinct event names across registrations on the given date.
    fn registration_names(&self, date: &Date) -> BoxFuture<Result<Vec<String>, BackendError>>;

    fn retrieve_settings(&self) -> BoxFuture<Result<Option<NotificationSettings>, BackendError>>;

    fn update_settings(
        &self,
        settings: &NotificationSettings,
    ) -> BoxFuture<Result<(), BackendError>>;
}

#[cfg(test)]
pub(crate) mod mock;

pub use self::postgres::*;

mod postgres {
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use sqlx::{
        self,
        postgres::{PgPool, PgRow},
    };
    use time::{Date, OffsetDateTime};
    use uuid::Uuid;

    use crate::category::Category;
    use crate::errors::BackendError;
    use crate::event::{EventConfiguration, EventOption, NewEvent};
    use crate::listing::RegistrationFilter;
    use crate::registration::{NewRegistration, Registration};
    use crate::settings::NotificationSettings;

    pub struct PgDb {
        pool: PgPool,
    }

    impl PgDb {
        pub fn new(pool: PgPool) -> Self {
            PgDb { pool }
        }
    }

    // these can be simplified once async functions in traits are stabilized
    impl super::Db for PgDb {
        fn insert_event(&self, event: NewEvent) -> BoxFuture<Result<Uuid, BackendError>> {
            async move {
                let query = sqlx::query_as(include_str!("queries/create_event.sql"));

                let (id,): (Uuid,) = query
                    .bind(&event.event_name)
                    .bind(event.category.as_str())
                    .bind(event.event_date)
                    .bind(event.registration_start)
                    .bind(event.registration_end)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(id)
            }
            .boxed()
        }

        fn retrieve_event(
            &self,
            id: &Uuid,
        ) -> BoxFuture<Result<Option<EventConfiguration>, BackendError>> {
            let id = *id;

            async move {
                let query = sqlx::query(include_str!("queries/retrieve_event.sql"));

                let event: Option<EventConfiguration> = query
                    .bind(id)
                    .try_map(|row: PgRow| new_event_configuration(&row))
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(event)
            }
            .boxed()
        }

        fn open_categories(
            &self,
            now: &OffsetDateTime,
        ) -> BoxFuture<Result<Vec<Category>, BackendError>> {
            let now = *now;

            async move {
                let query = sqlx::query(include_str!("queries/open_categories.sql"));

                let categories: Vec<Category> = query
                    .bind(now)
                    .try_map(|row: PgRow| parse_category(&row))
                    .fetch_all(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(categories)
            }
            .boxed()
        }

        fn open_dates(
            &self,
            now: &OffsetDateTime,
            category: &Category,
        ) -> BoxFuture<Result<Vec<Date>, BackendError>> {
            let now = *now;
            let category = *category;

            async move {
                let query = sqlx::query_as(include_str!("queries/open_dates.sql"));

                let dates: Vec<(Date,)> = query
                    .bind(now)
                    .bind(category.as_str())
                    .fetch_all(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(dates.into_iter().map(|(date,)| date).collect())
            }
            .boxed()
        }

        fn open_events(
            &self,
            now: &OffsetDateTime,
            category: &Category,
            date: &Date,
        ) -> BoxFuture<Result<Vec<EventOption>, BackendError>> {
            let now = *now;
            let category = *category;
            let date = *date;

            async move {
                let query = sqlx::query(include_str!("queries/open_events.sql"));

                let events: Vec<EventOption> = query
                    .bind(now)
                    .bind(category.as_str())
                    .bind(date)
                    .try_map(|row: PgRow| {
                        Ok(EventOption {
                            id: try_get(&row, "id")?,
                            name: try_get(&row, "event_name")?,
                        })
                    })
                    .fetch_all(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(events)
            }
            .boxed()
        }

        fn registration_exists(
            &self,
            email: &str,
            event_date: &Date,
        ) -> BoxFuture<Result<bool, BackendError>> {
            let email = email.to_owned();
            let event_date = *event_date;

            async move {
                let query = sqlx::query_as(include_str!("queries/registration_exists.sql"));

                let (exists,): (bool,) = query
                    .bind(&email)
                    .bind(event_date)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(exists)
            }
            .boxed()
        }

        fn insert_registration(
            &self,
            candidate: &NewRegistration,
            event: &EventConfiguration,
        ) -> BoxFuture<Result<Registration, BackendError>> {
            let candidate = candidate.clone();
            let event = event.clone();

            async move {
                let query = sqlx::query_as(include_str!("queries/create_registration.sql"));

                let (id, created): (Uuid, OffsetDateTime) = query
                    .bind(event.id)
                    .bind(&candidate.full_name)
                    .bind(&candidate.email)
                    .bind(&candidate.college_name)
                    .bind(&candidate.department)
                    .bind(event.category.as_str())
                    .bind(&event.event_name)
                    .bind(event.event_date)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(Registration {
                    id,
                    event_id: event.id,
                    name: candidate.full_name,
                    email: candidate.email,
                    college: candidate.college_name,
                    department: candidate.department,
                    category: event.category,
                    event_name: event.event_name,
                    event_date: event.event_date,
                    created,
                })
            }
            .boxed()
        }

        fn list_registrations(
            &self,
            filter: &RegistrationFilter,
        ) -> BoxFuture<Result<Vec<Registration>, BackendError>> {
            let filter = filter.clone();

            async move {
                let query = sqlx::query(include_str!("queries/list_registrations.sql"));

                let registrations: Vec<Registration> = query
                    .bind(filter.event_date)
                    .bind(filter.event_name)
                    .try_map(|row: PgRow| new_registration(&row))
                    .fetch_all(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(registrations)
            }
            .boxed()
        }

        fn count_registrations(
            &self,
            filter: &RegistrationFilter,
        ) -> BoxFuture<Result<i64, BackendError>> {
            let filter = filter.clone();

            async move {
                let query = sqlx::query_as(include_str!("queries/count_registrations.sql"));

                let (count,): (i64,) = query
                    .bind(filter.event_date)
                    .bind(filter.event_name)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(count)
            }
            .boxed()
        }

        fn registration_dates(&self) -> BoxFuture<Result<Vec<Date>, BackendError>> {
            async move {
                let query = sqlx::query_as(include_str!("queries/registration_dates.sql"));

                let dates: Vec<(Date,)> = query
                    .fetch_all(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(dates.into_iter().map(|(date,)| date).collect())
            }
            .boxed()
        }

        fn registration_names(&self, date: &Date) -> BoxFuture<Result<Vec<String>, BackendError>> {
            let date = *date;

            async move {
                let query = sqlx::query_as(include_str!("queries/registration_names.sql"));

                let names: Vec<(String,)> = query
                    .bind(date)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(names.into_iter().map(|(name,)| name).collect())
            }
            .boxed()
        }

        fn retrieve_settings(
            &self,
        ) -> BoxFuture<Result<Option<NotificationSettings>, BackendError>> {
            async move {
                let query = sqlx::query_as(include_str!("queries/retrieve_settings.sql"));

                let settings: Option<(String, bool)> = query
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(
                    settings.map(|(admin_email, enable_admin_notifications)| {
                        NotificationSettings {
                            admin_email,
                            enable_admin_notifications,
                        }
                    }),
                )
            }
            .boxed()
        }

        fn update_settings(
            &self,
            settings: &NotificationSettings,
        ) -> BoxFuture<Result<(), BackendError>> {
            let settings = settings.clone();

            async move {
                let query = sqlx::query(include_str!("queries/update_settings.sql"));

                query
                    .bind(&settings.admin_email)
                    .bind(settings.enable_admin_notifications)
                    .execute(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(())
            }
            .boxed()
        }
    }

    fn new_event_configuration(row: &PgRow) -> Result<EventConfiguration, sqlx::Error> {
        Ok(EventConfiguration {
            id: try_get(row, "id")?,
            event_name: try_get(row, "event_name")?,
            category: parse_category(row)?,
            event_date: try_get(row, "event_date")?,
            registration_start: try_get(row, "registration_start")?,
            registration_end: try_get(row, "registration_end")?,
        })
    }

    fn new_registration(row: &PgRow) -> Result<Registration, sqlx::Error> {
        Ok(Registration {
            id: try_get(row, "id")?,
            event_id: try_get(row, "event_id")?,
            name: try_get(row, "name")?,
            email: try_get(row, "email")?,
            college: try_get(row, "college")?,
            department: try_get(row, "department")?,
            category: parse_category(row)?,
            event_name: try_get(row, "event_name")?,
            event_date: try_get(row, "event_date")?,
            created: try_get(row, "created")?,
        })
    }

    // categories are stored as their canonical label; a value outside the
    // configured set is a decoding error
    fn parse_category(row: &PgRow) -> Result<Category, sqlx::Error> {
        let raw: String = try_get(row, "category")?;

        raw.parse::<Category>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))
    }

    fn try_get<'a, T: sqlx::Type<sqlx::Postgres> + sqlx::decode::Decode<'a, sqlx::Postgres>>(
        row: &'a PgRow,
        column: &str,
    ) -> Result<T, sqlx::Error> {
        use sqlx::prelude::*;

        row.try_get(column)
    }

    fn map_sqlx_error(error: sqlx::Error) -> BackendError {
        // no constraint mapping yet: duplicate prevention is a validation
        // rule, not a store-level uniqueness constraint
        BackendError::Sqlx { source: error }
    }
}
