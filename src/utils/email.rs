use async_trait::async_trait;
use lettre::address::AddressError;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{info, instrument, warn};

use modart_config::EmailConfig;
use modart_core::AppError;

/// A plain-text email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub text_body: String,
}

/// Outbound email transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError>;
}

/// Builds the welcome email sent to a newly provisioned student.
pub fn welcome_email(
    to_email: &str,
    first_name: &str,
    last_name: &str,
    temporary_password: &str,
    login_url: &str,
) -> OutgoingEmail {
    let text_body = format!(
        "Hello {first_name} {last_name},\n\n\
         Welcome to Mod'Art International! An account has been created for you.\n\n\
         Your login details:\n\
         Email: {to_email}\n\
         Temporary password: {temporary_password}\n\n\
         Sign in at {login_url}\n\n\
         You will be asked to choose a new password after your first login.\n\n\
         Best regards,\n\
         The Mod'Art Team"
    );

    OutgoingEmail {
        to_email: to_email.to_string(),
        to_name: format!("{first_name} {last_name}"),
        subject: "Welcome to Mod'Art - your account details".to_string(),
        text_body,
    }
}

/// Display names are kept out of the address syntax, so commas or quotes in a
/// student's name cannot break the header.
fn mailbox(name: &str, address: &str) -> Result<Mailbox, AddressError> {
    let name = name.trim();
    let name = (!name.is_empty()).then(|| name.to_string());
    Ok(Mailbox::new(name, address.parse()?))
}

/// SMTP delivery through `lettre`.
pub struct SmtpMailer {
    config: EmailConfig,
}

impl SmtpMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn transport(&self) -> Result<SmtpTransport, AppError> {
        if self.config.smtp_username.is_empty() {
            return Ok(SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build());
        }

        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        Ok(SmtpTransport::relay(&self.config.smtp_host)
            .map_err(|e| AppError::internal_error(format!("Failed to create SMTP relay: {}", e)))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build())
    }

    fn build_message(&self, email: OutgoingEmail) -> Result<Message, AppError> {
        let from = mailbox(&self.config.from_name, &self.config.from_email)
            .map_err(|e| AppError::internal_error(format!("Invalid from email: {}", e)))?;
        let to = mailbox(&email.to_name, &email.to_email)
            .map_err(|e| AppError::internal_error(format!("Invalid to email: {}", e)))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.text_body)
            .map_err(|e| AppError::internal_error(format!("Failed to build email: {}", e)))
    }

    /// Checks that the SMTP server is reachable and logs the outcome.
    pub async fn verify_connection(&self) -> bool {
        if !self.config.enabled {
            info!("Email delivery disabled, skipping SMTP check");
            return false;
        }

        let mailer = match self.transport() {
            Ok(mailer) => mailer,
            Err(e) => {
                warn!(error = %e, "SMTP transport misconfigured");
                return false;
            }
        };

        match tokio::task::spawn_blocking(move || mailer.test_connection()).await {
            Ok(Ok(true)) => {
                info!(host = %self.config.smtp_host, "SMTP server is ready");
                true
            }
            Ok(Ok(false)) => {
                warn!(host = %self.config.smtp_host, "SMTP server did not accept the connection");
                false
            }
            Ok(Err(e)) => {
                warn!(host = %self.config.smtp_host, error = %e, "SMTP connection check failed");
                false
            }
            Err(e) => {
                warn!(error = %e, "SMTP connection check panicked");
                false
            }
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, email), fields(to = %email.to_email, subject = %email.subject))]
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError> {
        if !self.config.enabled {
            return Err(AppError::internal_error(
                "Email delivery is disabled".to_string(),
            ));
        }

        let message = self.build_message(email)?;

        let mailer = self.transport()?;

        tokio::task::spawn_blocking(move || mailer.send(&message))
            .await
            .map_err(|e| AppError::internal_error(format!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal_error(format!("Failed to send email: {}", e)))?;

        info!("Email sent");
        Ok(())
    }
}

/// Mailer that records outgoing emails instead of delivering them.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: tokio::sync::Mutex<Vec<OutgoingEmail>>,
    failing: bool,
}

#[cfg(any(test, feature = "test-utils"))]
impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every delivery fails.
    pub fn failing() -> Self {
        Self {
            sent: Default::default(),
            failing: true,
        }
    }

    pub async fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().await.clone()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError> {
        if self.failing {
            return Err(AppError::internal_error(
                "SMTP connection refused".to_string(),
            ));
        }
        self.sent.lock().await.push(email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_email_contains_credentials_and_login_url() {
        let email = welcome_email(
            "jeanne@modart.fr",
            "Jeanne",
            "Lanvin",
            "Mod2026!A37",
            "https://app.modart.fr/login",
        );
        assert_eq!(email.to_email, "jeanne@modart.fr");
        assert_eq!(email.to_name, "Jeanne Lanvin");
        assert!(email.text_body.contains("Temporary password: Mod2026!A37"));
        assert!(email.text_body.contains("https://app.modart.fr/login"));
        assert_eq!(email.text_body.matches("Mod2026!A37").count(), 1);
    }

    fn smtp_config() -> EmailConfig {
        EmailConfig {
            enabled: false,
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@modart.fr".to_string(),
            from_name: "Mod'Art International".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
        }
    }

    #[test]
    fn test_names_with_punctuation_build_valid_messages() {
        let mailer = SmtpMailer::new(smtp_config());
        let email = welcome_email(
            "jeanne@modart.fr",
            "Jeanne, \"JL\"",
            "O'Lanvin <Paris>",
            "Mod2026!A37",
            "https://app.modart.fr/login",
        );

        let message = mailer.build_message(email).unwrap();
        let recipients = message.envelope().to();
        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients[0].to_string(), "jeanne@modart.fr");
        assert_eq!(
            message.envelope().from().map(ToString::to_string).as_deref(),
            Some("noreply@modart.fr")
        );
    }

    #[test]
    fn test_invalid_recipient_address_is_an_error() {
        let mailer = SmtpMailer::new(smtp_config());
        let email = welcome_email("not an address", "Ab", "Cd", "pw", "http://x/login");
        assert!(mailer.build_message(email).is_err());
        assert!(mailbox("", "jeanne@modart.fr").unwrap().name.is_none());
    }

    #[tokio::test]
    async fn test_disabled_smtp_mailer_reports_error() {
        let mailer = SmtpMailer::new(smtp_config());
        let email = welcome_email("a@b.co", "Ab", "Cd", "pw", "http://x/login");
        assert!(mailer.send(email).await.is_err());
    }

    #[tokio::test]
    async fn test_recording_mailer() {
        let mailer = RecordingMailer::new();
        mailer
            .send(welcome_email("a@b.co", "Ab", "Cd", "pw", "http://x/login"))
            .await
            .unwrap();
        assert_eq!(mailer.sent().await.len(), 1);

        let failing = RecordingMailer::failing();
        assert!(
            failing
                .send(welcome_email("a@b.co", "Ab", "Cd", "pw", "http://x/login"))
                .await
                .is_err()
        );
        assert!(failing.sent().await.is_empty());
    }
}
