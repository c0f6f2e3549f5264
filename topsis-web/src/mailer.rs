//! Delivery of finished result tables. The handler layer depends on the
//! [`ResultMailer`] trait; the SMTP transport lives behind it.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::config::SmtpConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid sender address: {0}")]
    Sender(#[from] lettre::address::AddressError),

    #[error("failed to reach smtp relay: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("failed to compose result email: {0}")]
    Compose(#[from] lettre::error::Error),

    #[error("failed to send result email: {0}")]
    Send(String),
}

/// Sends a ranked result table, as CSV, to a recipient.
#[async_trait]
pub trait ResultMailer: Send + Sync {
    async fn send_result(&self, to: Mailbox, csv: String) -> Result<(), MailError>;
}

/// SMTP adapter: STARTTLS relay with username/password authentication.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        let from: Mailbox = config.from_header().parse()?;
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl ResultMailer for SmtpMailer {
    async fn send_result(&self, to: Mailbox, csv: String) -> Result<(), MailError> {
        let attachment = Attachment::new("topsis_result.csv".to_string())
            .body(csv, ContentType::parse("text/csv").expect("valid mime type"));
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject("TOPSIS result")
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(
                        "Attached is the ranked result table, with Topsis Score and Rank \
                         columns appended to the uploaded data."
                            .to_string(),
                    ))
                    .singlepart(attachment),
            )?;
        self.transport
            .send(message)
            .await
            .map_err(|source| MailError::Send(source.to_string()))?;
        Ok(())
    }
}
