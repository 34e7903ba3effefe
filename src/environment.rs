use std::sync::Arc;

use slog::Logger;

use crate::db::Db;
use crate::mailer::Mailer;

pub type SafeDb = Arc<dyn Db + Send + Sync>;
pub type SafeMailer = Arc<dyn Mailer + Send + Sync>;

/// The shared collaborators handed to every request handler.
#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub db: SafeDb,
    pub mailer: SafeMailer,
    pub config: Config,
}

impl Environment {
    pub fn new(logger: Arc<Logger>, db: SafeDb, mailer: SafeMailer, config: Config) -> Self {
        Self {
            logger,
            db,
            mailer,
            config,
        }
    }
}

/// Static configuration read from the environment at startup. Mutable
/// notification settings live in the store instead (see
/// [`crate::settings`]).
#[derive(Clone, Debug)]
pub struct Config {
    /// The site-wide email address, used as the default admin recipient.
    pub(crate) site_email: String,

    /// The locale outgoing mail is rendered in.
    pub(crate) locale: String,
}

impl Config {
    pub fn new(site_email: String, locale: String) -> Self {
        Self { site_email, locale }
    }
}
