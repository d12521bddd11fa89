//! Configuration resolved from the process environment.
//!
//! All settings arrive as environment variables (a `.env` file is loaded
//! by the binary before resolution). The config is built exactly once at
//! startup and passed by reference into the mailer — no module reads the
//! environment after this point.

use anyhow::{Context, Result};
use secrecy::SecretString;

/// Brevo API key. Required.
const API_KEY_VAR: &str = "BREVO_API_KEY";
/// Report recipient address. Required.
const TO_EMAIL_VAR: &str = "REPORT_TO_EMAIL";
/// Sender address. Required; must be a verified Brevo sender.
const FROM_EMAIL_VAR: &str = "REPORT_FROM_EMAIL";
/// Public URL of the companion dashboard. Optional; empty disables the link.
const SITE_URL_VAR: &str = "SITE_URL";

/// Everything one report run needs from the outside world.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub api_key: SecretString,
    pub to_email: String,
    pub from_email: String,
    pub site_url: Option<String>,
}

impl ReportConfig {
    /// Resolve the full configuration from the environment.
    ///
    /// Fails on the first missing required variable, before any file or
    /// network I/O has happened.
    pub fn from_env() -> Result<Self> {
        Ok(ReportConfig {
            api_key: SecretString::new(required(API_KEY_VAR)?),
            to_email: required(TO_EMAIL_VAR)?,
            from_email: required(FROM_EMAIL_VAR)?,
            site_url: optional(SITE_URL_VAR),
        })
    }
}

/// Resolve a required environment variable.
fn required(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("Environment variable not set: {name}"))
}

/// Resolve an optional environment variable. Unset or empty means absent.
fn optional(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => Some(v),
        _ => None,
    }
}
