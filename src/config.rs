use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub port: u16,
    pub cron_secret_token: String,
    pub mailer: MailerConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailerConfig {
    /// When unset, reports are written to the log instead of sent.
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub signing_secret: Option<String>,
    pub from_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub top_subscriptions_limit: usize,
    pub upcoming_window_days: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,

            cron_secret_token: env::var("CRON_SECRET_TOKEN")
                .map_err(|_| anyhow::anyhow!("CRON_SECRET_TOKEN must be set"))?,

            mailer: MailerConfig {
                endpoint: env::var("MAILER_ENDPOINT").ok(),
                api_key: env::var("MAILER_API_KEY").ok(),
                signing_secret: env::var("MAILER_SIGNING_SECRET").ok(),
                from_address: env::var("MAILER_FROM")
                    .unwrap_or_else(|_| MailerConfig::default().from_address),
            },

            report: ReportConfig {
                top_subscriptions_limit: env::var("REPORT_TOP_LIMIT")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
                upcoming_window_days: env::var("REPORT_UPCOMING_WINDOW_DAYS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .unwrap_or(30),
            },
        })
    }
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            signing_secret: None,
            from_address: "reports@subscription-tracker.local".to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_subscriptions_limit: 5,
            upcoming_window_days: 30,
        }
    }
}
