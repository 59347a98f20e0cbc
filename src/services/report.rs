use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::config::ReportConfig;
use crate::models::report::{MonthlyReport, SpendingSummary, TopSubscription, UpcomingRenewal};
use crate::models::subscription::Subscription;
use crate::services::normalizer::MonthlyNormalizer;

#[derive(Debug, Clone)]
pub struct ReportBuilder {
    config: ReportConfig,
}

impl ReportBuilder {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Digest for the month containing `now`.
    pub fn build(&self, subscriptions: &[Subscription], now: DateTime<Utc>) -> MonthlyReport {
        let today = now.date_naive();
        MonthlyReport {
            month_name: now.format("%B").to_string(),
            year: now.year(),
            total_spent: MonthlyNormalizer::total_monthly(subscriptions),
            categories: MonthlyNormalizer::category_breakdown(subscriptions),
            top_subscriptions: self.top_subscriptions(subscriptions),
            upcoming_renewals: self.upcoming_renewals(subscriptions, today),
        }
    }

    pub fn summary(&self, subscriptions: &[Subscription], today: NaiveDate) -> SpendingSummary {
        let monthly_total = MonthlyNormalizer::total_monthly(subscriptions);
        SpendingSummary {
            subscription_count: subscriptions.len(),
            monthly_total,
            yearly_total: monthly_total * Decimal::from(12),
            categories: MonthlyNormalizer::category_breakdown(subscriptions),
            top_subscriptions: self.top_subscriptions(subscriptions),
            upcoming_renewals: self.upcoming_renewals(subscriptions, today),
        }
    }

    fn top_subscriptions(&self, subscriptions: &[Subscription]) -> Vec<TopSubscription> {
        MonthlyNormalizer::top_n(subscriptions, self.config.top_subscriptions_limit)
            .into_iter()
            .map(|sub| TopSubscription {
                name: sub.name.clone(),
                amount: sub.monthly_amount(),
                category: sub.category.clone(),
            })
            .collect()
    }

    fn upcoming_renewals(&self, subscriptions: &[Subscription], today: NaiveDate) -> Vec<UpcomingRenewal> {
        MonthlyNormalizer::upcoming_within_days(subscriptions, self.config.upcoming_window_days, today)
            .into_iter()
            .map(|(sub, days_until)| UpcomingRenewal {
                name: sub.name.clone(),
                date: sub.next_payment,
                amount: sub.amount,
                days_until,
            })
            .collect()
    }
}
