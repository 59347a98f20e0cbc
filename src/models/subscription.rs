use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;
use rust_decimal::Decimal;
use regex::Regex;
use validator::{Validate, ValidationError};

use crate::error::Result;
use crate::models::common::{normalize_category, BillingCycle, DEFAULT_CURRENCY};
use crate::services::{normalizer::MonthlyNormalizer, scheduler::RenewalScheduler};

/// Largest accepted charge. Keeps every monthly, yearly and summed figure far
/// inside `Decimal`'s range, so report arithmetic cannot overflow.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub billing_cycle: BillingCycle,
    pub category: String,
    pub start_date: NaiveDate,
    pub next_payment: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description cannot be more than 500 characters"))]
    pub description: Option<String>,

    #[validate(custom = "validate_amount")]
    pub amount: Decimal,

    #[validate(custom = "validate_currency")]
    pub currency: Option<String>,

    pub billing_cycle: BillingCycle,
    pub category: Option<String>,
    pub start_date: NaiveDate,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubscriptionRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Description cannot be more than 500 characters"))]
    pub description: Option<String>,

    #[validate(custom = "validate_amount")]
    pub amount: Option<Decimal>,

    #[validate(custom = "validate_currency")]
    pub currency: Option<String>,

    pub billing_cycle: Option<BillingCycle>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
}

impl Subscription {
    /// Builds a subscription registered on `today`, deriving its first
    /// `next_payment`.
    pub fn new(user_id: Uuid, request: CreateSubscriptionRequest, today: NaiveDate) -> Result<Self> {
        request.validate()?;
        let next_payment =
            RenewalScheduler::compute_initial_next_payment(request.start_date, request.billing_cycle, today)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            name: request.name.trim().to_string(),
            description: request.description,
            amount: request.amount,
            currency: request.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            billing_cycle: request.billing_cycle,
            category: normalize_category(request.category.as_deref()),
            start_date: request.start_date,
            next_payment,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies an update. A changed start date or billing cycle re-derives
    /// `next_payment` against `today`.
    pub fn update(&mut self, request: UpdateSubscriptionRequest, today: NaiveDate) -> Result<()> {
        request.validate()?;
        let mut reschedule = false;

        if let Some(start_date) = request.start_date {
            reschedule |= start_date != self.start_date;
            self.start_date = start_date;
        }
        if let Some(cycle) = request.billing_cycle {
            reschedule |= cycle != self.billing_cycle;
            self.billing_cycle = cycle;
        }
        if reschedule {
            self.next_payment =
                RenewalScheduler::compute_initial_next_payment(self.start_date, self.billing_cycle, today)?;
        }

        if let Some(name) = request.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = request.description {
            self.description = Some(description);
        }
        if let Some(amount) = request.amount {
            self.amount = amount;
        }
        if let Some(currency) = request.currency {
            self.currency = currency;
        }
        if let Some(category) = request.category {
            self.category = normalize_category(Some(&category));
        }

        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn monthly_amount(&self) -> Decimal {
        MonthlyNormalizer::normalize_to_monthly(self.amount, self.billing_cycle)
    }

    /// Rolls a stale `next_payment` forward to on-or-after `today`.
    /// Returns whether anything changed.
    pub fn refresh_next_payment(&mut self, today: NaiveDate) -> Result<bool> {
        match RenewalScheduler::roll_forward(self.start_date, self.billing_cycle, self.next_payment, today)? {
            Some(next_payment) => {
                self.next_payment = next_payment;
                self.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn days_until_payment(&self, today: NaiveDate) -> i64 {
        (self.next_payment - today).num_days()
    }
}

fn validate_amount(amount: &Decimal) -> std::result::Result<(), ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::new("negative_amount"));
    }
    if *amount > MAX_AMOUNT {
        return Err(ValidationError::new("amount_too_large"));
    }
    Ok(())
}

fn validate_currency(code: &str) -> std::result::Result<(), ValidationError> {
    let pattern = Regex::new(r"^[A-Z]{3}$").map_err(|_| ValidationError::new("currency_pattern"))?;
    if !pattern.is_match(code) {
        return Err(ValidationError::new("invalid_currency"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn request(cycle: BillingCycle, start: &str) -> CreateSubscriptionRequest {
        CreateSubscriptionRequest {
            name: "Netflix".to_string(),
            description: Some("Premium plan with 4K streaming".to_string()),
            amount: Decimal::new(1599, 2),
            currency: None,
            billing_cycle: cycle,
            category: Some("Entertainment".to_string()),
            start_date: date(start),
        }
    }

    #[test]
    fn test_subscription_creation() {
        let sub = Subscription::new(Uuid::new_v4(), request(BillingCycle::Monthly, "2024-01-15"), date("2024-03-20"))
            .unwrap();
        assert_eq!(sub.next_payment, date("2024-04-15"));
        assert_eq!(sub.currency, "USD");
        assert_eq!(sub.category, "Entertainment");
        assert_eq!(sub.monthly_amount(), Decimal::new(1599, 2));
    }

    #[test]
    fn test_missing_category_defaults() {
        let mut req = request(BillingCycle::Yearly, "2024-01-15");
        req.category = None;
        let sub = Subscription::new(Uuid::new_v4(), req, date("2024-01-10")).unwrap();
        assert_eq!(sub.category, "Uncategorized");
        assert_eq!(sub.next_payment, date("2024-01-15"));
    }

    #[test]
    fn test_update_reschedules_on_cycle_change() {
        let today = date("2024-03-20");
        let mut sub = Subscription::new(Uuid::new_v4(), request(BillingCycle::Monthly, "2024-01-15"), today).unwrap();

        sub.update(
            UpdateSubscriptionRequest {
                billing_cycle: Some(BillingCycle::Yearly),
                ..Default::default()
            },
            today,
        )
        .unwrap();
        assert_eq!(sub.next_payment, date("2025-01-15"));

        sub.update(
            UpdateSubscriptionRequest {
                amount: Some(Decimal::new(2000, 2)),
                category: Some("".to_string()),
                ..Default::default()
            },
            today,
        )
        .unwrap();
        assert_eq!(sub.next_payment, date("2025-01-15"));
        assert_eq!(sub.amount, Decimal::new(2000, 2));
        assert_eq!(sub.category, "Uncategorized");
    }

    #[test]
    fn test_refresh_next_payment() {
        let mut sub = Subscription::new(Uuid::new_v4(), request(BillingCycle::Weekly, "2024-01-01"), date("2024-01-01"))
            .unwrap();
        assert_eq!(sub.next_payment, date("2024-01-08"));

        assert!(!sub.refresh_next_payment(date("2024-01-08")).unwrap());
        assert!(sub.refresh_next_payment(date("2024-01-20")).unwrap());
        assert_eq!(sub.next_payment, date("2024-01-22"));
        assert_eq!(sub.days_until_payment(date("2024-01-20")), 2);
    }

    #[test]
    fn test_request_validation() {
        let mut req = request(BillingCycle::Monthly, "2024-01-15");
        assert!(req.validate().is_ok());

        req.amount = Decimal::new(-100, 2);
        assert!(req.validate().is_err());

        let mut req = request(BillingCycle::Monthly, "2024-01-15");
        req.currency = Some("usd".to_string());
        assert!(req.validate().is_err());

        let mut req = request(BillingCycle::Monthly, "2024-01-15");
        req.name = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_amount_upper_bound() {
        assert_eq!(MAX_AMOUNT, Decimal::new(1_000_000_000_000, 0));

        let mut req = request(BillingCycle::Weekly, "2024-01-15");
        req.amount = MAX_AMOUNT;
        assert!(req.validate().is_ok());
        let sub = Subscription::new(Uuid::new_v4(), req, date("2024-01-15")).unwrap();
        assert_eq!(sub.monthly_amount(), Decimal::new(4_330_000_000_000, 0));

        let json = r#"{
            "name": "Overflow",
            "amount": 5e28,
            "billingCycle": "Weekly",
            "startDate": "2024-01-15"
        }"#;
        let req: CreateSubscriptionRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_err());
        assert!(matches!(
            Subscription::new(Uuid::new_v4(), req, date("2024-01-15")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_update_rejects_oversized_amount() {
        let today = date("2024-01-15");
        let mut sub = Subscription::new(Uuid::new_v4(), request(BillingCycle::Monthly, "2024-01-15"), today).unwrap();
        let result = sub.update(
            UpdateSubscriptionRequest {
                amount: Some(MAX_AMOUNT + Decimal::ONE),
                ..Default::default()
            },
            today,
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(sub.amount, Decimal::new(1599, 2));
    }

    #[test]
    fn test_wire_format() {
        let json = r#"{
            "name": "Spotify",
            "amount": 9.99,
            "billingCycle": "Biweekly-ish",
            "startDate": "2022-05-10"
        }"#;
        let req: CreateSubscriptionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.billing_cycle, BillingCycle::Custom);

        let sub = Subscription::new(Uuid::new_v4(), req, date("2022-05-10")).unwrap();
        let value = serde_json::to_value(&sub).unwrap();
        assert_eq!(value["nextPayment"], "2022-06-10");
        assert_eq!(value["billingCycle"], "Custom");
    }
}
