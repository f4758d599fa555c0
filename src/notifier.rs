use crate::config::SmtpConfig;
use crate::error::NotifyError;
use crate::models::Offer;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

/// Delivers the summary of newly found offers.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, offers: &[Offer]) -> Result<(), NotifyError>;
}

/// Subject and plain-text body for one batch of offers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub subject: String,
    pub body: String,
}

impl Summary {
    pub fn new(offers: &[Offer], threshold: u32) -> Self {
        let subject = format!("Nuevas ofertas imoova ({})", offers.len());

        let mut body = format!(
            "Se han detectado nuevas ofertas con más de {} noches:\n\n",
            threshold
        );
        for offer in offers {
            body.push_str(&summary_line(offer));
            body.push('\n');
        }

        Self { subject, body }
    }
}

/// `- origin → destination (n noches) | Fechas: dates | Link: link`
pub fn summary_line(offer: &Offer) -> String {
    format!(
        "- {} → {} ({} noches) | Fechas: {} | Link: {}",
        offer.origin.as_deref().unwrap_or("?"),
        offer.destination.as_deref().unwrap_or("?"),
        offer
            .nights
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string()),
        offer.dates.as_deref().unwrap_or("?"),
        offer.link
    )
}

/// Sends the summary by mail over STARTTLS.
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
    threshold: u32,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig, threshold: u32) -> Result<Self, NotifyError> {
        let from = parse_mailbox(&config.user)?;
        let to = parse_mailbox(&config.to)?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)?
            .port(config.port)
            .credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            mailer,
            from,
            to,
            threshold,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, offers: &[Offer]) -> Result<(), NotifyError> {
        let summary = Summary::new(offers, self.threshold);

        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(summary.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(summary.body)?;

        self.mailer.send(message).await?;
        info!("📧 Email sent to {}", self.to);
        Ok(())
    }
}

/// Writes the summary to the log instead of sending it.
pub struct LogNotifier {
    threshold: u32,
}

impl LogNotifier {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, offers: &[Offer]) -> Result<(), NotifyError> {
        let summary = Summary::new(offers, self.threshold);
        info!("{}", summary.subject);
        for line in summary.body.lines().filter(|l| !l.is_empty()) {
            info!("{}", line);
        }
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse()
        .map_err(|_| NotifyError::Address(address.to_string()))
}
