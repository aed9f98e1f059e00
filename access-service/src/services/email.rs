use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, Message,
    SmtpTransport, Transport,
};
use std::sync::Mutex;
use std::time::Duration;

use super::ServiceError;
use crate::config::SmtpConfig;

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send_activation_email(
        &self,
        to_email: &str,
        activation_code: &str,
    ) -> Result<(), ServiceError>;
}

/// SMTP-backed mailer.
#[derive(Clone)]
pub struct SmtpMailer {
    mailer: SmtpTransport,
    from_address: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, ServiceError> {
        let creds = Credentials::new(config.user.clone(), config.password.clone());

        let mailer = SmtpTransport::relay(&config.host)
            .map_err(|e| ServiceError::Email(e.to_string()))?
            .credentials(creds)
            .port(587)
            .timeout(Some(Duration::from_secs(10)))
            .build();

        tracing::info!(host = %config.host, "Email service initialized");

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl EmailProvider for SmtpMailer {
    async fn send_activation_email(
        &self,
        to_email: &str,
        activation_code: &str,
    ) -> Result<(), ServiceError> {
        let body = format!(
            "Welcome!\n\n\
             Activate your account with the code below:\n\n\
             {}\n\n\
             If you did not register, you can ignore this message.",
            activation_code
        );

        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e: lettre::address::AddressError| ServiceError::Email(e.to_string()))?,
            )
            .to(to_email
                .parse()
                .map_err(|e: lettre::address::AddressError| ServiceError::Email(e.to_string()))?)
            .subject("Activate your account")
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| ServiceError::Email(e.to_string()))?;

        // Send on the blocking pool; the SMTP transport is synchronous.
        let mailer = self.mailer.clone();
        let result = tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| ServiceError::Email(e.to_string()))?;

        match result {
            Ok(_) => {
                tracing::info!(to = %to_email, "Activation email sent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(to = %to_email, error = %e, "Failed to send activation email");
                Err(ServiceError::Email(e.to_string()))
            }
        }
    }
}

/// Mailer that records instead of sending. Tests read the activation code
/// back out of `sent`.
#[derive(Default)]
pub struct MockMailer {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_activation_code(&self) -> Option<String> {
        self.sent
            .lock()
            .expect("mock mailer poisoned")
            .last()
            .map(|(_, code)| code.clone())
    }
}

#[async_trait]
impl EmailProvider for MockMailer {
    async fn send_activation_email(
        &self,
        to_email: &str,
        activation_code: &str,
    ) -> Result<(), ServiceError> {
        self.sent
            .lock()
            .expect("mock mailer poisoned")
            .push((to_email.to_string(), activation_code.to_string()));
        Ok(())
    }
}
