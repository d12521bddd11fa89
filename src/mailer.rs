//! Brevo transactional-email client.
//!
//! Submits the rendered report as a single message through the Brevo
//! `smtp/email` endpoint. One POST, no retry: a rejected or failed send
//! aborts the run and the external scheduler owns re-running it.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ReportConfig;

const BREVO_API_URL: &str = "https://api.brevo.com/v3/smtp/email";

/// Display name shown next to the sender address.
const SENDER_NAME: &str = "Marty vs Winslow";

/// Deadline for the one outbound call.
const SEND_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Brevo request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Brevo rejected the message ({status}): {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Anything that can deliver a rendered report.
///
/// The binary wires in `BrevoClient`; integration tests substitute an
/// in-memory implementation.
#[async_trait]
pub trait ReportMailer {
    async fn send_report(&self, subject: &str, html: &str) -> Result<(), MailerError>;
}

// ---------------------------------------------------------------------------
// API types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    sender: EmailSender<'a>,
    to: Vec<EmailRecipient<'a>>,
    subject: &'a str,
    #[serde(rename = "htmlContent")]
    html_content: &'a str,
}

#[derive(Debug, Serialize)]
struct EmailSender<'a> {
    email: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct EmailRecipient<'a> {
    email: &'a str,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct BrevoClient {
    http: Client,
    api_key: SecretString,
    to_email: String,
    from_email: String,
}

impl BrevoClient {
    pub fn new(cfg: &ReportConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()
            .context("Failed to build Brevo HTTP client")?;

        Ok(Self {
            http,
            api_key: cfg.api_key.clone(),
            to_email: cfg.to_email.clone(),
            from_email: cfg.from_email.clone(),
        })
    }
}

/// Subject line for a report generated on `today`.
pub fn subject_line(today: NaiveDate) -> String {
    format!("Marty vs Winslow — Weekly Update ({today})")
}

#[async_trait]
impl ReportMailer for BrevoClient {
    async fn send_report(&self, subject: &str, html: &str) -> Result<(), MailerError> {
        let request = SendEmailRequest {
            sender: EmailSender {
                email: &self.from_email,
                name: SENDER_NAME,
            },
            to: vec![EmailRecipient {
                email: &self.to_email,
            }],
            subject,
            html_content: html,
        };

        debug!(to = %self.to_email, subject, bytes = html.len(), "Submitting report to Brevo");

        let response = self
            .http
            .post(BREVO_API_URL)
            .header("accept", "application/json")
            .header("content-type", "application/json")
            .header("api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to decode error response".to_string());
            return Err(MailerError::Rejected { status, body });
        }

        let ack = response.text().await?;
        info!(ack = %ack, "Brevo accepted the message");

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
