use std::sync::Arc;

use warp::http::StatusCode;
use warp::reject;
use warp::reply::{json, with_status, Json, WithStatus};

use crate::errors::BackendError;
use crate::log::{error, Logger};

pub mod admin;
mod handlers;
mod query;
mod rejection;
mod response;

pub use internal::*;

pub async fn format_rejection(
    logger: Arc<Logger>,
    rej: reject::Rejection,
) -> Result<WithStatus<Json>, reject::Rejection> {
    if let Some(r) = rej.find::<rejection::Rejection>() {
        let e = &r.error;
        error!(logger, "Backend error"; "context" => ?r.context, "error" => ?r.error, "status" => %status_code_for(e), "message" => %r.error);
        let flattened = r.flatten();

        return Ok(with_status(json(&flattened), status_code_for(e)));
    }

    Err(rej)
}

fn status_code_for(e: &BackendError) -> StatusCode {
    use BackendError::*;

    match e {
        Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        NonExistentEvent(..) => StatusCode::NOT_FOUND,
        MissingEventSelection | InvalidDate(..) | InvalidCategory(..) | InvalidWindow => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

mod internal {
    use warp::filters::BoxedFilter;
    use warp::path::end;
    use warp::Filter;
    use warp::Reply;
    use warp::{get as g, path as p, post, put, query};

    use super::{handlers, query as q};
    use crate::environment::Environment;

    type Route = BoxedFilter<(Box<dyn Reply>,)>;

    macro_rules! route_filter {
    ($route_variable:ident; $first:expr) => (let $route_variable = $route_variable.and($first););
    ($route_variable:ident; $first:expr, $($rest:expr),+) => (
        let $route_variable = $route_variable.and($first);
        route_filter!($route_variable; $($rest),+);
    )
}

    macro_rules! route {
    ($name:ident => $handler:ident, $route_variable:ident; $($filters:expr),+) => (
        pub fn $name(environment: Environment) -> Route {
            let $route_variable = warp::any().map(move || environment.clone());

            route_filter!($route_variable; $($filters),+);

            $route_variable.and_then(handlers::$handler)
                .boxed()
        }
    );
}

    route!(make_categories_route => categories, rt; p("registration"), p("categories"), end(), g());
    route!(make_dates_route => dates, rt; p("registration"), p("dates"), query::<q::DatesQuery>(), end(), g());
    route!(make_events_route => events, rt; p("registration"), p("events"), query::<q::EventsQuery>(), end(), g());
    route!(make_submit_route => submit, rt; p("registration"), end(), post(), warp::body::json());
    route!(make_create_event_route => create_event, rt; p("events"), end(), post(), warp::body::json());
    route!(make_registrations_route => registrations, rt; p("registrations"), query::<q::FilterQuery>(), end(), g());
    route!(make_registration_dates_route => registration_dates, rt; p("registrations"), p("dates"), end(), g());
    route!(make_registration_names_route => registration_names, rt; p("registrations"), p("names"), query::<q::NamesQuery>(), end(), g());
    route!(make_export_route => export, rt; p("registrations"), p("export"), query::<q::FilterQuery>(), end(), g());
    route!(make_settings_route => settings, rt; p("settings"), end(), g());
    route!(make_update_settings_route => update_settings, rt; p("settings"), end(), put(), warp::body::json());
}
