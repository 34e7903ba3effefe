use crate::environment::{SafeDb, SafeMailer};
use crate::errors::BackendError;
use crate::mailer::{MailParams, Template};
use crate::registration::{NewRegistration, Registration};
use crate::settings::NotificationSettings;

/// The result of a stored submission. Mail failures never unwind the
/// stored row; they surface here as warnings instead.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub registration: Registration,
    pub warnings: Vec<String>,
}

/// Stores a validated submission and dispatches the notification mail.
///
/// The registration row snapshots the event's name, category and date at
/// this moment, so later edits to the event configuration leave existing
/// registrations untouched. The confirmation goes to the registrant, and
/// when enabled, exactly one copy of the admin notification goes to the
/// configured address.
pub async fn submit(
    db: &SafeDb,
    mailer: &SafeMailer,
    settings: &NotificationSettings,
    locale: &str,
    candidate: NewRegistration,
) -> Result<SubmissionOutcome, BackendError> {
    let event_id = candidate.event_id.ok_or(BackendError::MissingEventSelection)?;

    let event = db
        .retrieve_event(&event_id)
        .await?
        .ok_or(BackendError::NonExistentEvent(event_id))?;

    let registration = db.insert_registration(&candidate, &event).await?;

    let params = MailParams::from_registration(&registration);
    let mut warnings = vec![];

    if let Err(error) = mailer
        .send(
            Template::RegistrationConfirmation,
            &registration.email,
            locale,
            &params,
        )
        .await
    {
        warnings.push(format!("Could not send confirmation email: {}", error));
    }

    if settings.enable_admin_notifications {
        if let Err(error) = mailer
            .send(
                Template::AdminNotification,
                &settings.admin_email,
                locale,
                &params,
            )
            .await
        {
            warnings.push(format!("Could not send admin notification: {}", error));
        }
    }

    Ok(SubmissionOutcome {
        registration,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use time::Date;
    use uuid::Uuid;

    use super::submit;
    use crate::category::Category;
    use crate::db::mock::MockDb;
    use crate::environment::{SafeDb, SafeMailer};
    use crate::errors::BackendError;
    use crate::event::EventConfiguration;
    use crate::mailer::mock::MockMailer;
    use crate::mailer::Template;
    use crate::registration::NewRegistration;
    use crate::settings::NotificationSettings;

    fn date(year: i32, month: u8, day: u8) -> Date {
        Date::try_from_ymd(year, month, day).unwrap()
    }

    fn event() -> EventConfiguration {
        EventConfiguration {
            id: Uuid::new_v4(),
            event_name: "AI Workshop".to_owned(),
            category: Category::OnlineWorkshop,
            event_date: date(2024, 5, 1),
            registration_start: date(2024, 4, 1).midnight().assume_utc(),
            registration_end: date(2024, 4, 30).midnight().assume_utc(),
        }
    }

    fn candidate(event_id: Option<Uuid>) -> NewRegistration {
        NewRegistration {
            full_name: "Asha Rao".to_owned(),
            email: "asha@example.com".to_owned(),
            college_name: "NIT Trichy".to_owned(),
            department: "CSE".to_owned(),
            event_id,
            event_date: Some(date(2024, 5, 1)),
        }
    }

    fn settings() -> NotificationSettings {
        NotificationSettings {
            admin_email: "admin@example.com".to_owned(),
            enable_admin_notifications: true,
        }
    }

    #[tokio::test]
    async fn a_submission_is_stored_and_both_mails_go_out() {
        let event = event();
        let db = Arc::new(MockDb::with_events(vec![event.clone()]));
        let mailer = Arc::new(MockMailer::default());
        let safe_db: SafeDb = db.clone();
        let safe_mailer: SafeMailer = mailer.clone();

        let outcome = submit(
            &safe_db,
            &safe_mailer,
            &settings(),
            "en",
            candidate(Some(event.id)),
        )
        .await
        .unwrap();

        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.registration.event_name, "AI Workshop");
        assert_eq!(db.registrations.read().unwrap().len(), 1);

        let sent = mailer.sent.read().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].template, Template::RegistrationConfirmation);
        assert_eq!(sent[0].recipient, "asha@example.com");
        assert_eq!(sent[1].template, Template::AdminNotification);
        assert_eq!(sent[1].recipient, "admin@example.com");
    }

    #[tokio::test]
    async fn the_admin_is_notified_exactly_once() {
        let event = event();
        let db: SafeDb = Arc::new(MockDb::with_events(vec![event.clone()]));
        let mailer = Arc::new(MockMailer::default());
        let safe_mailer: SafeMailer = mailer.clone();

        submit(&db, &safe_mailer, &settings(), "en", candidate(Some(event.id)))
            .await
            .unwrap();

        let admin_copies = mailer
            .sent
            .read()
            .unwrap()
            .iter()
            .filter(|m| m.template == Template::AdminNotification)
            .count();
        assert_eq!(admin_copies, 1);
    }

    #[tokio::test]
    async fn disabled_notifications_skip_the_admin_copy() {
        let event = event();
        let db: SafeDb = Arc::new(MockDb::with_events(vec![event.clone()]));
        let mailer = Arc::new(MockMailer::default());
        let safe_mailer: SafeMailer = mailer.clone();

        let settings = NotificationSettings {
            admin_email: "admin@example.com".to_owned(),
            enable_admin_notifications: false,
        };

        let outcome = submit(&db, &safe_mailer, &settings, "en", candidate(Some(event.id)))
            .await
            .unwrap();

        assert!(outcome.warnings.is_empty());
        let sent = mailer.sent.read().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].template, Template::RegistrationConfirmation);
    }

    #[tokio::test]
    async fn mail_failures_do_not_lose_the_registration() {
        let event = event();
        let db = Arc::new(MockDb::with_events(vec![event.clone()]));
        let mailer: SafeMailer = Arc::new(MockMailer::failing());
        let safe_db: SafeDb = db.clone();

        let outcome = submit(&safe_db, &mailer, &settings(), "en", candidate(Some(event.id)))
            .await
            .unwrap();

        assert_eq!(db.registrations.read().unwrap().len(), 1);
        assert_eq!(outcome.warnings.len(), 2);
    }

    #[tokio::test]
    async fn an_unknown_event_stores_nothing() {
        let db = Arc::new(MockDb::default());
        let mailer: SafeMailer = Arc::new(MockMailer::default());
        let safe_db: SafeDb = db.clone();

        let missing = Uuid::new_v4();
        let result = submit(&safe_db, &mailer, &settings(), "en", candidate(Some(missing))).await;

        assert!(matches!(
            result,
            Err(BackendError::NonExistentEvent(id)) if id == missing
        ));
        assert!(db.registrations.read().unwrap().is_empty());
    }

    #[tokio::test]
    async fn the_stored_row_snapshots_the_event() {
        let event = event();
        let db = Arc::new(MockDb::with_events(vec![event.clone()]));
        let mailer: SafeMailer = Arc::new(MockMailer::default());
        let safe_db: SafeDb = db.clone();

        let outcome = submit(&safe_db, &mailer, &settings(), "en", candidate(Some(event.id)))
            .await
            .unwrap();

        // renaming the event afterwards must not rewrite history
        db.events.write().unwrap()[0].event_name = "Renamed Workshop".to_owned();

        let stored = db.registrations.read().unwrap()[0].clone();
        assert_eq!(stored.event_name, "AI Workshop");
        assert_eq!(stored.id, outcome.registration.id);
        assert_eq!(stored.category, Category::OnlineWorkshop);
        assert_eq!(stored.event_date, date(2024, 5, 1));
    }
}
