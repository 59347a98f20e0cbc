use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{report::ReportRunSummary, user::User};
use crate::services::{database::DatabaseService, mailer::ReportMailer, report::ReportBuilder};

enum UserOutcome {
    Sent,
    NoSubscriptions,
}

/// Emails every opted-in user their monthly spending digest.
pub struct MonthlyReportJob<'a, M> {
    db: &'a DatabaseService,
    mailer: &'a M,
    builder: &'a ReportBuilder,
}

impl<'a, M: ReportMailer> MonthlyReportJob<'a, M> {
    pub fn new(db: &'a DatabaseService, mailer: &'a M, builder: &'a ReportBuilder) -> Self {
        Self { db, mailer, builder }
    }

    /// Users are processed one at a time. A failure for one user is logged
    /// and counted; only failing to list the recipients aborts the run.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<ReportRunSummary> {
        log::info!("Starting monthly spending report generation");

        let users = self.db.users_with_monthly_reports().await?;
        log::info!("Found {} users with monthly reports enabled", users.len());

        let mut summary = ReportRunSummary::default();
        for user in &users {
            match self.process_user(user, now).await {
                Ok(UserOutcome::Sent) => summary.emails_sent += 1,
                Ok(UserOutcome::NoSubscriptions) => {
                    log::info!("No subscriptions found for user {}", user.email);
                    summary.skipped += 1;
                }
                Err(e) => {
                    log::error!("Error processing user {}: {}", user.email, e);
                    summary.errors += 1;
                }
            }
        }

        summary.success = true;
        summary.message = format!(
            "Monthly spending reports generated successfully. Sent {} emails. Errors: {}.",
            summary.emails_sent, summary.errors
        );
        log::info!("{}", summary.message);
        Ok(summary)
    }

    async fn process_user(&self, user: &User, now: DateTime<Utc>) -> Result<UserOutcome> {
        let subscriptions = self.db.get_subscriptions_by_user(&user.id).await?;
        if subscriptions.is_empty() {
            return Ok(UserOutcome::NoSubscriptions);
        }

        log::debug!("Found {} subscriptions for {}", subscriptions.len(), user.email);
        let report = self.builder.build(&subscriptions, now);
        self.mailer.send_monthly_report(user, &report).await?;
        Ok(UserOutcome::Sent)
    }
}
