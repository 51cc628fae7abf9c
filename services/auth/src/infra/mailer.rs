use std::time::Duration;

use anyhow::{Context as _, bail};
use serde::Serialize;

use crate::domain::repository::Notifier;
use crate::error::AuthServiceError;

/// Request body of a Resend-compatible `POST /emails`.
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Delivers mail through an HTTP mail API authenticated with a bearer key.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(api_url: String, api_key: String, from: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("build mail HTTP client")?;
        Ok(Self {
            client,
            api_url,
            api_key,
            from,
        })
    }
}

impl Notifier for HttpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), AuthServiceError> {
        let payload = SendEmailRequest {
            from: &self.from,
            to: [to],
            subject,
            html: html_body,
        };
        self.client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("mail API request")?
            .error_for_status()
            .context("mail API rejected message")?;
        tracing::debug!(subject, "mail accepted by API");
        Ok(())
    }
}

/// Development sender: nothing leaves the process. The body carries the
/// recovery code and is never logged.
#[derive(Clone, Default)]
pub struct LogMailer;

impl Notifier for LogMailer {
    async fn send(&self, to: &str, subject: &str, _html_body: &str) -> Result<(), AuthServiceError> {
        tracing::info!(to, subject, "mail delivery disabled, message not sent");
        Ok(())
    }
}

/// The sender selected at startup.
#[derive(Clone)]
pub enum Mailer {
    Http(HttpMailer),
    Log(LogMailer),
}

impl Mailer {
    /// HTTP delivery when an API key is configured. Without one, only an
    /// explicit log-only opt-in is accepted.
    pub fn select(
        api_url: String,
        api_key: Option<String>,
        from: String,
        log_only: bool,
    ) -> anyhow::Result<Self> {
        match api_key {
            Some(key) => Ok(Self::Http(HttpMailer::new(api_url, key, from)?)),
            None if log_only => Ok(Self::Log(LogMailer)),
            None => bail!("MAIL_API_KEY must be set unless MAIL_LOG_ONLY=true"),
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Self::Http(_) => "http",
            Self::Log(_) => "log",
        }
    }
}

impl Notifier for Mailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), AuthServiceError> {
        match self {
            Self::Http(mailer) => mailer.send(to, subject, html_body).await,
            Self::Log(mailer) => mailer.send(to, subject, html_body).await,
        }
    }
}
