use std::error::Error;

use dotenv::dotenv;
use structopt::StructOpt;
use time::{Date, OffsetDateTime};

use event_registration::category::Category;
use event_registration::config::get_variable;
use event_registration::db::{Db, PgDb};
use event_registration::errors::BackendError;
use event_registration::event::NewEvent;
use event_registration::log::{info, initialize_logger};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "seed-event",
    about = "Create an event configuration with an open registration window"
)]
struct Opt {
    /// The name shown in the event dropdown
    event_name: String,

    /// One of the configured categories, e.g. "Online Workshop"
    #[structopt(parse(try_from_str = parse_category))]
    category: Category,

    /// The day the event takes place, as YYYY-MM-DD
    #[structopt(parse(try_from_str = parse_date))]
    event_date: Date,

    /// When registration opens, as a Unix timestamp
    registration_start: i64,

    /// When registration closes (inclusive), as a Unix timestamp
    registration_end: i64,
}

fn parse_category(value: &str) -> Result<Category, BackendError> {
    value.parse()
}

fn parse_date(value: &str) -> Result<Date, BackendError> {
    Date::parse(value, "%F").map_err(|_| BackendError::InvalidDate(value.to_owned()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    let opt = Opt::from_args();

    let logger = initialize_logger();

    let registration_start = OffsetDateTime::from_unix_timestamp(opt.registration_start);
    let registration_end = OffsetDateTime::from_unix_timestamp(opt.registration_end);

    if registration_end < registration_start {
        return Err(Box::new(BackendError::InvalidWindow));
    }

    let connection_string = get_variable("REGISTRATION_DB_CONNECTION_STRING");
    let pool = sqlx::Pool::connect(&connection_string)
        .await
        .expect("create database pool from REGISTRATION_DB_CONNECTION_STRING");
    let db = PgDb::new(pool);

    info!(
        logger,
        "Creating event {} ({}) on {}...",
        opt.event_name,
        opt.category,
        opt.event_date.format("%F")
    );

    let id = db
        .insert_event(NewEvent {
            event_name: opt.event_name,
            category: opt.category,
            event_date: opt.event_date,
            registration_start,
            registration_end,
        })
        .await
        .expect("create event");

    info!(logger, "Created event: {}", id);

    Ok(())
}
