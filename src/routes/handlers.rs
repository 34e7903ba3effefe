use std::time::{Duration, Instant};

use time::{Date, OffsetDateTime};
use warp::{
    http::StatusCode,
    reject,
    reply::{json, with_header, with_status, Reply},
};

use crate::environment::Environment;
use crate::errors::BackendError;
use crate::event::NewEvent;
use crate::export;
use crate::listing::{self, RegistrationFilter};
use crate::log::{debug, warn};
use crate::registration::NewRegistration;
use crate::routes::{
    query::{DatesQuery, EventsQuery, FilterQuery, NamesQuery},
    rejection::{Context, Rejection},
    response::SuccessResponse,
};
use crate::selector::{self, Selection};
use crate::settings::NotificationSettings;
use crate::submission;
use crate::validation;

const SERVER_TIMING_HEADER: &str = "server-timing";
type RouteResult = Result<Box<dyn Reply>, reject::Rejection>;

macro_rules! timed {
    ($($expression:stmt);+) => {
        let start = Instant::now();

        // TODO when `try` blocks are stabilized, we can wrap the body
        // and return the headers even on errors
        let result = { $($expression)+ };

        Ok(Box::new(with_header(
            result,
            SERVER_TIMING_HEADER,
            format_server_timing(start.elapsed()),
        )) as Box<dyn Reply>)
    };
}

pub async fn categories(environment: Environment) -> RouteResult {
    timed! {
        let sets = selector::options(
            &environment.db,
            OffsetDateTime::now_utc(),
            Selection::default(),
        )
        .await
        .map_err(|e: BackendError| Rejection::new(Context::categories(), e))?;

        json(&SuccessResponse::Categories {
            open: sets.is_open(),
            categories: sets.categories,
        })
    }
}

pub async fn dates(environment: Environment, query: DatesQuery) -> RouteResult {
    timed! {
        let DatesQuery { category } = query;
        let error_handler = |e: BackendError| Rejection::new(Context::dates(category.clone()), e);

        let selection = Selection {
            category: Some(category.parse().map_err(error_handler)?),
            date: None,
        };
        let sets = selector::options(&environment.db, OffsetDateTime::now_utc(), selection)
            .await
            .map_err(error_handler)?;

        json(&SuccessResponse::Dates {
            dates: format_dates(&sets.dates),
        })
    }
}

pub async fn events(environment: Environment, query: EventsQuery) -> RouteResult {
    timed! {
        let EventsQuery { category, date } = query;
        let error_handler =
            |e: BackendError| Rejection::new(Context::events(category.clone(), date.clone()), e);

        let selection = Selection {
            category: Some(category.parse().map_err(error_handler)?),
            date: Some(parse_date(&date).map_err(error_handler)?),
        };
        let sets = selector::options(&environment.db, OffsetDateTime::now_utc(), selection)
            .await
            .map_err(error_handler)?;

        json(&SuccessResponse::Events {
            events: sets.events,
        })
    }
}

pub async fn submit(environment: Environment, candidate: NewRegistration) -> RouteResult {
    timed! {
        let Environment {
            logger,
            db,
            mailer,
            config,
        } = environment.clone();

        let error_handler = |e: BackendError| Rejection::new(Context::submit(), e);

        debug!(logger, "Validating submission...");
        let errors = validation::validate(&db, &candidate)
            .await
            .map_err(error_handler)?;

        if !errors.is_empty() {
            return Err(error_handler(BackendError::Validation { errors }).into());
        };

        debug!(logger, "Reading notification settings...");
        let settings = notification_settings(&environment)
            .await
            .map_err(error_handler)?;

        debug!(logger, "Storing registration...");
        let outcome = submission::submit(&db, &mailer, &settings, &config.locale, candidate)
            .await
            .map_err(error_handler)?;

        for warning in &outcome.warnings {
            warn!(logger, "Submission stored with warning"; "id" => %outcome.registration.id, "warning" => warning.as_str());
        };

        with_status(
            json(&SuccessResponse::Submission {
                id: outcome.registration.id.to_string(),
                warnings: outcome.warnings,
            }),
            StatusCode::CREATED,
        )
    }
}

pub async fn create_event(environment: Environment, event: NewEvent) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::create_event(), e);

        if event.registration_end < event.registration_start {
            return Err(error_handler(BackendError::InvalidWindow).into());
        };

        debug!(environment.logger, "Creating event..."; "name" => event.event_name.as_str());
        let id = environment
            .db
            .insert_event(event)
            .await
            .map_err(error_handler)?;

        with_status(
            json(&SuccessResponse::EventCreated {
                id: id.to_string(),
            }),
            StatusCode::CREATED,
        )
    }
}

pub async fn registrations(environment: Environment, query: FilterQuery) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::registrations(), e);

        let filter = parse_filter(query).map_err(error_handler)?;
        let result = listing::query(&environment.db, &filter)
            .await
            .map_err(error_handler)?;

        json(&SuccessResponse::Registrations {
            total: result.total,
            registrations: result.registrations,
        })
    }
}

pub async fn registration_dates(environment: Environment) -> RouteResult {
    timed! {
        let dates = listing::dates(&environment.db)
            .await
            .map_err(|e: BackendError| Rejection::new(Context::registration_dates(), e))?;

        json(&SuccessResponse::Dates {
            dates: format_dates(&dates),
        })
    }
}

pub async fn registration_names(environment: Environment, query: NamesQuery) -> RouteResult {
    timed! {
        let NamesQuery { date } = query;
        let error_handler =
            |e: BackendError| Rejection::new(Context::registration_names(date.clone()), e);

        let parsed = parse_date(&date).map_err(error_handler)?;
        let names = listing::names(&environment.db, &parsed)
            .await
            .map_err(error_handler)?;

        json(&SuccessResponse::RegistrationNames { names })
    }
}

pub async fn export(environment: Environment, query: FilterQuery) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::export(), e);

        let filter = parse_filter(query).map_err(error_handler)?;
        let result = listing::query(&environment.db, &filter)
            .await
            .map_err(error_handler)?;

        let csv = export::to_csv(&result.registrations);

        with_header(
            with_header(csv, "content-type", mime::TEXT_CSV.as_ref()),
            "content-disposition",
            format!("attachment; filename=\"{}\"", export::EXPORT_FILENAME),
        )
    }
}

pub async fn settings(environment: Environment) -> RouteResult {
    timed! {
        let settings = notification_settings(&environment)
            .await
            .map_err(|e: BackendError| Rejection::new(Context::settings(), e))?;

        json(&SuccessResponse::Settings(settings))
    }
}

pub async fn update_settings(
    environment: Environment,
    settings: NotificationSettings,
) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::update_settings(), e);

        debug!(environment.logger, "Updating notification settings..."; "admin_email" => settings.admin_email.as_str());
        environment
            .db
            .update_settings(&settings)
            .await
            .map_err(error_handler)?;

        json(&SuccessResponse::Settings(settings))
    }
}

/// The stored settings, or the site defaults if none have been saved yet.
async fn notification_settings(
    environment: &Environment,
) -> Result<NotificationSettings, BackendError> {
    let settings = environment.db.retrieve_settings().await?;

    Ok(settings
        .unwrap_or_else(|| NotificationSettings::site_default(&environment.config.site_email)))
}

fn parse_date(value: &str) -> Result<Date, BackendError> {
    Date::parse(value, "%F").map_err(|_| BackendError::InvalidDate(value.to_owned()))
}

fn format_dates(dates: &[Date]) -> Vec<String> {
    dates.iter().map(|date| date.format("%F")).collect()
}

fn parse_filter(query: FilterQuery) -> Result<RegistrationFilter, BackendError> {
    let event_date = match query.date.as_deref() {
        None | Some("") => None,
        Some(value) => Some(parse_date(value)?),
    };

    let event_name = query.name.filter(|name| !name.is_empty());

    Ok(RegistrationFilter {
        event_date,
        event_name,
    })
}

fn format_server_timing(seconds: Duration) -> String {
    format!("handler;dur={}", seconds.as_secs_f64() * 1000.0)
}
