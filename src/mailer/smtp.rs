use std::env;

use futures::future::BoxFuture;
use futures::FutureExt;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use super::{render, MailParams, Mailer, Template};
use crate::config::get_variable;
use crate::errors::BackendError;

/// A [`Mailer`] that delivers over SMTP with TLS. Transports are built per
/// message; `lettre` pools connections internally if the relay allows it.
pub struct SmtpMailer {
    host: String,
    port: u16,
    credentials: Credentials,
    from: String,
}

impl SmtpMailer {
    pub fn new(
        host: String,
        port: u16,
        username: String,
        password: String,
        from: String,
    ) -> Self {
        SmtpMailer {
            host,
            port,
            credentials: Credentials::new(username, password),
            from,
        }
    }

    /// Reads the `REGISTRATION_SMTP_*` and `REGISTRATION_FROM_*` variables.
    pub fn from_env() -> Self {
        let port = get_variable("REGISTRATION_SMTP_PORT")
            .parse()
            .expect("parse REGISTRATION_SMTP_PORT as a port number");
        let from_name = env::var("REGISTRATION_FROM_NAME")
            .unwrap_or_else(|_| "Event Registration".to_owned());
        let from = format!("{} <{}>", from_name, get_variable("REGISTRATION_FROM_EMAIL"));

        SmtpMailer::new(
            get_variable("REGISTRATION_SMTP_HOST"),
            port,
            get_variable("REGISTRATION_SMTP_USERNAME"),
            get_variable("REGISTRATION_SMTP_PASSWORD"),
            from,
        )
    }

    fn build_transport(&self) -> Result<SmtpTransport, BackendError> {
        Ok(SmtpTransport::relay(&self.host)
            .map_err(mail_error)?
            .port(self.port)
            .credentials(self.credentials.clone())
            .build())
    }
}

impl Mailer for SmtpMailer {
    fn send(
        &self,
        template: Template,
        recipient: &str,
        locale: &str,
        params: &MailParams,
    ) -> BoxFuture<Result<(), BackendError>> {
        let (subject, body) = render(template, locale, params);
        let from = self.from.clone();
        let recipient = recipient.to_owned();
        let transport = self.build_transport();

        async move {
            let transport = transport?;
            let message = Message::builder()
                .from(from.parse().map_err(mail_error)?)
                .to(recipient.parse().map_err(mail_error)?)
                .subject(subject)
                .header(ContentType::TEXT_PLAIN)
                .body(body)
                .map_err(mail_error)?;

            // lettre's SMTP transport is blocking
            tokio::task::spawn_blocking(move || transport.send(&message))
                .await
                .map_err(mail_error)?
                .map_err(mail_error)?;

            Ok(())
        }
        .boxed()
    }
}

fn mail_error(error: impl std::fmt::Display) -> BackendError {
    BackendError::MailDispatchFailed {
        message: error.to_string(),
    }
}
