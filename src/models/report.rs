use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub name: String,
    pub amount: Decimal,
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopSubscription {
    pub name: String,
    /// Monthly equivalent.
    pub amount: Decimal,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingRenewal {
    pub name: String,
    pub date: NaiveDate,
    /// Charged amount in the subscription's own cycle.
    pub amount: Decimal,
    pub days_until: i64,
}

/// Payload handed to the email collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub month_name: String,
    pub year: i32,
    pub total_spent: Decimal,
    pub categories: Vec<CategoryBreakdown>,
    pub top_subscriptions: Vec<TopSubscription>,
    pub upcoming_renewals: Vec<UpcomingRenewal>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingSummary {
    pub subscription_count: usize,
    pub monthly_total: Decimal,
    pub yearly_total: Decimal,
    pub categories: Vec<CategoryBreakdown>,
    pub top_subscriptions: Vec<TopSubscription>,
    pub upcoming_renewals: Vec<UpcomingRenewal>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportRunSummary {
    pub success: bool,
    pub message: String,
    pub emails_sent: u32,
    pub skipped: u32,
    pub errors: u32,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSummary {
    pub updated: u32,
    pub errors: u32,
}
