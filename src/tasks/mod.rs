pub mod monthly_report;
pub mod renewal_refresh;
