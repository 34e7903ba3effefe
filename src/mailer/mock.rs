use std::sync::RwLock;

use futures::future::BoxFuture;
use futures::FutureExt;

use super::{MailParams, Mailer, Template};
use crate::errors::BackendError;

/// A sent message as recorded by [`MockMailer`].
#[derive(Clone, Debug)]
pub(crate) struct SentMail {
    pub(crate) template: Template,
    pub(crate) recipient: String,
    pub(crate) params: MailParams,
}

/// A [`Mailer`] for tests that records every send, optionally failing them
/// all to exercise the degraded path.
#[derive(Default)]
pub(crate) struct MockMailer {
    pub(crate) sent: RwLock<Vec<SentMail>>,
    fail: bool,
}

impl MockMailer {
    pub(crate) fn failing() -> Self {
        MockMailer {
            fail: true,
            ..Default::default()
        }
    }
}

impl Mailer for MockMailer {
    fn send(
        &self,
        template: Template,
        recipient: &str,
        _locale: &str,
        params: &MailParams,
    ) -> BoxFuture<Result<(), BackendError>> {
        let result = if self.fail {
            Err(BackendError::MailDispatchFailed {
                message: "mock mailer configured to fail".to_owned(),
            })
        } else {
            self.sent.write().unwrap().push(SentMail {
                template,
                recipient: recipient.to_owned(),
                params: params.clone(),
            });

            Ok(())
        };

        async move { result }.boxed()
    }
}
