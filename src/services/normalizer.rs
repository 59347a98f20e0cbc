use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::common::{normalize_category, BillingCycle};
use crate::models::report::CategoryBreakdown;
use crate::models::subscription::Subscription;

/// Most renewals listed by `upcoming_within_days`.
pub const UPCOMING_RENEWALS_CAP: usize = 5;

/// Monthly-equivalent cost reporting over a set of subscriptions.
pub struct MonthlyNormalizer;

impl MonthlyNormalizer {
    /// Custom and unrecognised cycles are treated as monthly.
    pub fn normalize_to_monthly(amount: Decimal, cycle: BillingCycle) -> Decimal {
        cycle.to_monthly(amount)
    }

    pub fn total_monthly(subscriptions: &[Subscription]) -> Decimal {
        subscriptions.iter().map(Subscription::monthly_amount).sum()
    }

    pub fn aggregate_by_category(subscriptions: &[Subscription]) -> HashMap<String, Decimal> {
        let mut totals: HashMap<String, Decimal> = HashMap::new();
        for sub in subscriptions {
            let category = normalize_category(Some(&sub.category));
            *totals.entry(category).or_insert(Decimal::ZERO) += sub.monthly_amount();
        }
        totals
    }

    /// Per-category totals with their share of the grand total, largest first.
    pub fn category_breakdown(subscriptions: &[Subscription]) -> Vec<CategoryBreakdown> {
        let grand_total = Self::total_monthly(subscriptions);
        let mut categories: Vec<CategoryBreakdown> = Self::aggregate_by_category(subscriptions)
            .into_iter()
            .map(|(name, amount)| CategoryBreakdown {
                percentage: Self::percentage_of(amount, grand_total),
                name,
                amount,
            })
            .collect();
        categories.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.name.cmp(&b.name)));
        categories
    }

    /// `part / total * 100` rounded half-up; 0 when `total` is zero.
    pub fn percentage_of(part: Decimal, total: Decimal) -> u32 {
        if total.is_zero() {
            return 0;
        }
        (part / total * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or(0)
    }

    /// The `n` most expensive subscriptions by monthly equivalent. Ties keep
    /// their input order.
    pub fn top_n(subscriptions: &[Subscription], n: usize) -> Vec<&Subscription> {
        let mut sorted: Vec<&Subscription> = subscriptions.iter().collect();
        sorted.sort_by(|a, b| b.monthly_amount().cmp(&a.monthly_amount()));
        sorted.truncate(n);
        sorted
    }

    /// Subscriptions due within `[reference, reference + days]`, soonest
    /// first, paired with their days-until-due. At most
    /// [`UPCOMING_RENEWALS_CAP`] entries.
    pub fn upcoming_within_days(
        subscriptions: &[Subscription],
        days: i64,
        reference: NaiveDate,
    ) -> Vec<(&Subscription, i64)> {
        let mut upcoming: Vec<(&Subscription, i64)> = subscriptions
            .iter()
            .map(|sub| (sub, sub.days_until_payment(reference)))
            .filter(|(_, days_until)| (0..=days).contains(days_until))
            .collect();
        upcoming.sort_by_key(|(_, days_until)| *days_until);
        upcoming.truncate(UPCOMING_RENEWALS_CAP);
        upcoming
    }
}
