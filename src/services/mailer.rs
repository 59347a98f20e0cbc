use hmac::{Hmac, Mac};
use reqwest::Client;
use serde_json::json;
use sha2::Sha256;

use crate::config::MailerConfig;
use crate::error::{AppError, Result};
use crate::models::{report::MonthlyReport, user::User};

type HmacSha256 = Hmac<Sha256>;

pub const MONTHLY_REPORT_TEMPLATE: &str = "monthly-spending-report";

/// Delivers monthly digests to users.
#[allow(async_fn_in_trait)]
pub trait ReportMailer {
    async fn send_monthly_report(&self, recipient: &User, report: &MonthlyReport) -> Result<()>;
}

/// Posts reports as JSON to an email-delivery service.
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    config: MailerConfig,
}

impl HttpMailer {
    pub fn new(config: MailerConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn payload(&self, recipient: &User, report: &MonthlyReport) -> Result<Vec<u8>> {
        let payload = json!({
            "from": self.config.from_address,
            "to": { "email": recipient.email, "name": recipient.name },
            "subject": format!("Your {} {} subscription spending report", report.month_name, report.year),
            "template": MONTHLY_REPORT_TEMPLATE,
            "data": report,
        });
        serde_json::to_vec(&payload).map_err(|e| AppError::Mailer(format!("Failed to encode report: {}", e)))
    }

    /// Hex HMAC-SHA256 of the request body.
    pub fn sign(secret: &str, body: &[u8]) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| AppError::Mailer(format!("Invalid signing secret: {}", e)))?;
        mac.update(body);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl ReportMailer for HttpMailer {
    async fn send_monthly_report(&self, recipient: &User, report: &MonthlyReport) -> Result<()> {
        let body = self.payload(recipient, report)?;

        let Some(endpoint) = &self.config.endpoint else {
            log::info!(
                "No mailer endpoint configured; report for {}: {}",
                recipient.email,
                String::from_utf8_lossy(&body)
            );
            return Ok(());
        };

        let mut request = self.client
            .post(endpoint)
            .header("Content-Type", "application/json");

        if let Some(api_key) = &self.config.api_key {
            request = request.header("Authorization", format!("Bearer {}", api_key));
        }
        if let Some(secret) = &self.config.signing_secret {
            request = request.header("X-Signature", Self::sign(secret, &body)?);
        }

        let response = request.body(body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(AppError::Mailer(format!("Email service returned {}: {}", status, error_text)));
        }

        log::info!("Sent monthly report to {}", recipient.email);
        Ok(())
    }
}
