use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;
use std::str::FromStr;

pub const DEFAULT_CATEGORY: &str = "Uncategorized";
pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message),
            error: None,
        }
    }

    pub fn error(error: String) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error),
        }
    }
}

/// How often a subscription charges.
///
/// Deserialization never fails: only the exact capitalised names are
/// recognised, anything else becomes `Custom`, which is billed and advanced
/// like `Monthly`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String")]
pub enum BillingCycle {
    Monthly,
    Yearly,
    Weekly,
    Quarterly,
    Biweekly,
    Custom,
}

/// One step of a billing cycle on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStep {
    Days(u32),
    Months(u32),
}

impl BillingCycle {
    #[cfg(test)]
    pub const ALL: [BillingCycle; 6] = [
        BillingCycle::Monthly,
        BillingCycle::Quarterly,
        BillingCycle::Yearly,
        BillingCycle::Weekly,
        BillingCycle::Biweekly,
        BillingCycle::Custom,
    ];

    /// Converts one charge of `amount` into its monthly equivalent.
    pub fn to_monthly(&self, amount: Decimal) -> Decimal {
        match self {
            BillingCycle::Monthly => amount,
            BillingCycle::Yearly => amount / Decimal::from(12),
            BillingCycle::Weekly => amount * Decimal::new(433, 2),
            BillingCycle::Quarterly => amount / Decimal::from(3),
            BillingCycle::Biweekly => amount * Decimal::new(217, 2),
            BillingCycle::Custom => amount,
        }
    }

    pub fn step(&self) -> CycleStep {
        match self {
            BillingCycle::Weekly => CycleStep::Days(7),
            BillingCycle::Biweekly => CycleStep::Days(14),
            BillingCycle::Monthly | BillingCycle::Custom => CycleStep::Months(1),
            BillingCycle::Quarterly => CycleStep::Months(3),
            BillingCycle::Yearly => CycleStep::Months(12),
        }
    }
}

impl FromStr for BillingCycle {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cycle = match s {
            "Monthly" => BillingCycle::Monthly,
            "Yearly" => BillingCycle::Yearly,
            "Weekly" => BillingCycle::Weekly,
            "Quarterly" => BillingCycle::Quarterly,
            "Biweekly" => BillingCycle::Biweekly,
            _ => BillingCycle::Custom,
        };
        Ok(cycle)
    }
}

impl From<String> for BillingCycle {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(cycle) => cycle,
            Err(never) => match never {},
        }
    }
}

impl std::fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillingCycle::Monthly => write!(f, "Monthly"),
            BillingCycle::Yearly => write!(f, "Yearly"),
            BillingCycle::Weekly => write!(f, "Weekly"),
            BillingCycle::Quarterly => write!(f, "Quarterly"),
            BillingCycle::Biweekly => write!(f, "Biweekly"),
            BillingCycle::Custom => write!(f, "Custom"),
        }
    }
}

/// Falls back to the default category for missing or blank labels.
pub fn normalize_category(category: Option<&str>) -> String {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => DEFAULT_CATEGORY.to_string(),
    }
}
