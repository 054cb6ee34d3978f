use std::sync::Arc;

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;

use super::models::{Email, Notification};
use crate::config::{Config, MailConfig};

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("e-mail is not configured")]
    MailDisabled,

    #[error("invalid address {0}")]
    Address(String),

    #[error("failed to build a message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp failure: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("mail task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub async fn send_email(
    notification: Notification,
    config: Arc<Config>,
) -> Result<(), NotificationError> {
    tracing::debug!(?notification, "sending notification e-mail");

    let mail = config.mail.clone().ok_or(NotificationError::MailDisabled)?;
    let message = build_email(&mail, notification.to_email())?;

    tokio::task::spawn_blocking(move || {
        let mailer = SmtpTransport::relay(&mail.relay)?
            .credentials(Credentials::new(mail.username, mail.password))
            .build();

        mailer.send(&message).map(|_| ())
    })
    .await??;

    tracing::info!("email has been sent");

    Ok(())
}

fn mailbox(name: &str, address: &str) -> Result<Mailbox, NotificationError> {
    let address = address
        .parse()
        .map_err(|_| NotificationError::Address(address.to_owned()))?;

    Ok(Mailbox::new(Some(name.to_owned()), address))
}

fn build_email(mail: &MailConfig, email: Email) -> Result<Message, NotificationError> {
    let message = Message::builder()
        .from(mailbox("Storefront", &mail.from)?)
        .reply_to(mailbox("no-reply", &mail.from)?)
        .to(mailbox(&email.receiver_name, &email.receiver_email)?)
        .subject(email.subject)
        .header(ContentType::TEXT_PLAIN)
        .body(email.body)?;

    Ok(message)
}
