use std::env;
use std::error::Error;
use std::sync::Arc;

use futures::future::FutureExt;
use tokio::sync::mpsc;
use warp::Filter;

use event_registration::config::get_variable;
use event_registration::db::PgDb;
use event_registration::environment::{Config, Environment};
use event_registration::log::{info, initialize_logger};
use event_registration::mailer::smtp::SmtpMailer;
use event_registration::routes;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    let logger = initialize_logger();

    let main_port: u16 = get_variable("REGISTRATION_PORT")
        .parse()
        .expect("parse REGISTRATION_PORT as u16");
    let admin_port: u16 = get_variable("REGISTRATION_ADMIN_PORT")
        .parse()
        .expect("parse REGISTRATION_ADMIN_PORT as u16");

    info!(logger, "Starting..."; "main_port" => main_port, "admin_port" => admin_port);
    let logger = Arc::new(logger);

    info!(logger, "Creating database pool...");
    let connection_string = get_variable("REGISTRATION_DB_CONNECTION_STRING");
    let pool = sqlx::Pool::connect(&connection_string)
        .await
        .expect("create database pool from REGISTRATION_DB_CONNECTION_STRING");
    let db = Arc::new(PgDb::new(pool));

    let mailer = Arc::new(SmtpMailer::from_env());

    let config = Config::new(
        get_variable("REGISTRATION_SITE_EMAIL"),
        env::var("REGISTRATION_LOCALE").unwrap_or_else(|_| "en".to_owned()),
    );
    let environment = Environment::new(logger.clone(), db, mailer, config);

    let (termination_sender, mut termination_receiver) = mpsc::channel::<()>(1);

    let terminate = Arc::new(move || {
        let termination_sender = termination_sender.clone();

        async move {
            let termination_sender = termination_sender.clone();
            termination_sender.send(()).await.unwrap();
        }
        .boxed()
    });

    let should_terminate = async move {
        termination_receiver.recv().await;
    }
    .shared();

    let ctrlc = {
        let should_terminate = should_terminate.clone();
        let terminate = terminate.clone();

        let signal = tokio::signal::ctrl_c();

        async move {
            let terminate = terminate.clone();

            tokio::select! {
                _ = should_terminate => {},
                _ = signal => {
                    terminate().await;
                }
            }
        }
    };

    let main_server = {
        let should_terminate = should_terminate.clone();

        let logger2 = logger.clone();

        let categories_route = routes::make_categories_route(environment.clone());
        let dates_route = routes::make_dates_route(environment.clone());
        let events_route = routes::make_events_route(environment.clone());
        let submit_route = routes::make_submit_route(environment.clone());
        let create_event_route = routes::make_create_event_route(environment.clone());
        let registrations_route = routes::make_registrations_route(environment.clone());
        let registration_dates_route = routes::make_registration_dates_route(environment.clone());
        let registration_names_route = routes::make_registration_names_route(environment.clone());
        let export_route = routes::make_export_route(environment.clone());
        let settings_route = routes::make_settings_route(environment.clone());
        let update_settings_route = routes::make_update_settings_route(environment.clone());

        let routes = categories_route
            .or(dates_route)
            .or(events_route)
            .or(submit_route)
            .or(create_event_route)
            .or(registration_dates_route)
            .or(registration_names_route)
            .or(export_route)
            .or(registrations_route)
            .or(settings_route)
            .or(update_settings_route)
            .recover(move |r| routes::format_rejection(logger2.clone(), r));

        let (_, main_server) =
            warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], main_port), async {
                should_terminate.await;
            });

        main_server
    };

    let admin_server = {
        let should_terminate = should_terminate.clone();
        let terminate = terminate.clone();

        let routes = routes::admin::make_healthz_route(environment.clone()).or(
            routes::admin::make_termination_route(environment.clone(), terminate),
        );

        let (_, admin_server) =
            warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], admin_port), async {
                should_terminate.await;
            });

        admin_server
    };

    tokio::join!(ctrlc, main_server, admin_server);

    info!(logger, "Exiting gracefully...");

    Ok(())
}
