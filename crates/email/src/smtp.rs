use {
    async_trait::async_trait,
    herald_config::SmtpConfig,
    lettre::{
        Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
        address::Envelope,
        transport::smtp::{
            authentication::{Credentials, Mechanism},
            client::{Tls, TlsParameters},
        },
    },
    secrecy::ExposeSecret,
    tracing::debug,
};

use crate::error::{Error, Result};

/// Submits a fully composed message.
#[async_trait]
pub trait MailSubmitter: Send + Sync {
    /// Deliver `message` to all `recipients` in a single submission, with
    /// `smtp.from` as the envelope sender.
    async fn submit(&self, smtp: &SmtpConfig, recipients: &[String], message: &[u8])
    -> Result<()>;
}

/// SMTP submission through lettre.
///
/// Authenticates with the LOGIN mechanism: the `Username:` challenge is
/// answered with the user and `Password:` with the password; any other
/// challenge fails the submission. STARTTLS is used when the server offers
/// it. No timeout is applied.
#[derive(Debug, Default, Clone, Copy)]
pub struct SmtpSubmitter;

#[async_trait]
impl MailSubmitter for SmtpSubmitter {
    async fn submit(
        &self,
        smtp: &SmtpConfig,
        recipients: &[String],
        message: &[u8],
    ) -> Result<()> {
        let envelope = envelope(&smtp.from, recipients)?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp.server)
            .port(smtp.port)
            .tls(Tls::Opportunistic(TlsParameters::new(smtp.server.clone())?))
            .timeout(None);
        if !smtp.user.is_empty() {
            builder = builder
                .credentials(Credentials::new(
                    smtp.user.clone(),
                    smtp.password.expose_secret().clone(),
                ))
                .authentication(vec![Mechanism::Login]);
        }
        let transport = builder.build();

        debug!(
            server = %smtp.server,
            port = smtp.port,
            recipients = recipients.len(),
            "submitting email"
        );
        transport.send_raw(&envelope, message).await?;
        Ok(())
    }
}

/// Envelope from the configured sender to every recipient.
pub fn envelope(from: &str, recipients: &[String]) -> Result<Envelope> {
    if recipients.is_empty() {
        return Err(Error::NoRecipients);
    }
    let from: Address = from.parse()?;
    let to = recipients
        .iter()
        .map(|r| r.parse::<Address>())
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Envelope::new(Some(from), to)?)
}
