use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::error::{AppError, Result};
use crate::models::common::{BillingCycle, CycleStep};

/// Renewal date arithmetic.
///
/// Occurrences are anchored on the start date: the k-th charge falls on
/// `start + k * step`. Month steps clamp to the last day of shorter months,
/// so a subscription started on Jan 31 renews Feb 29, Mar 31, Apr 30, ...
pub struct RenewalScheduler;

impl RenewalScheduler {
    /// Next payment for a subscription being registered on `reference`.
    ///
    /// A start date in the future is its own first payment. Otherwise the
    /// result is the first occurrence strictly after `reference`.
    pub fn compute_initial_next_payment(
        start_date: NaiveDate,
        cycle: BillingCycle,
        reference: NaiveDate,
    ) -> Result<NaiveDate> {
        if start_date > reference {
            return Ok(start_date);
        }
        Self::first_occurrence_after(start_date, cycle, reference)
    }

    /// Moves a stale `next_payment` to the first occurrence on or after
    /// `reference`. Returns `None` when nothing needs to change.
    pub fn roll_forward(
        start_date: NaiveDate,
        cycle: BillingCycle,
        next_payment: NaiveDate,
        reference: NaiveDate,
    ) -> Result<Option<NaiveDate>> {
        if next_payment >= reference {
            return Ok(None);
        }
        if start_date >= reference {
            return Ok(Some(start_date));
        }
        let yesterday = reference
            .pred_opt()
            .ok_or_else(|| out_of_range(reference))?;
        Self::first_occurrence_after(start_date, cycle, yesterday).map(Some)
    }

    /// The k-th occurrence of `cycle` counted from `start_date`.
    pub fn occurrence(start_date: NaiveDate, cycle: BillingCycle, k: u32) -> Result<NaiveDate> {
        let next = match cycle.step() {
            CycleStep::Days(days) => {
                start_date.checked_add_signed(Duration::days(i64::from(days) * i64::from(k)))
            }
            CycleStep::Months(months) => months
                .checked_mul(k)
                .and_then(|total| start_date.checked_add_months(Months::new(total))),
        };
        next.ok_or_else(|| out_of_range(start_date))
    }

    /// First occurrence (k >= 1) strictly after `bound`, for `start_date <= bound`.
    fn first_occurrence_after(
        start_date: NaiveDate,
        cycle: BillingCycle,
        bound: NaiveDate,
    ) -> Result<NaiveDate> {
        let mut k = Self::estimate_steps(start_date, cycle, bound).max(1);
        loop {
            let candidate = Self::occurrence(start_date, cycle, k)?;
            if candidate > bound {
                return Ok(candidate);
            }
            k = k.checked_add(1).ok_or_else(|| out_of_range(start_date))?;
        }
    }

    /// Lower bound on the number of steps needed to pass `bound`. The
    /// occurrence at the returned k is never past the answer.
    fn estimate_steps(start_date: NaiveDate, cycle: BillingCycle, bound: NaiveDate) -> u32 {
        match cycle.step() {
            CycleStep::Days(days) => {
                let elapsed = (bound - start_date).num_days().max(0);
                u32::try_from(elapsed / i64::from(days)).unwrap_or(u32::MAX)
            }
            CycleStep::Months(months) => {
                let elapsed = (bound.year() - start_date.year()) * 12
                    + bound.month() as i32
                    - start_date.month() as i32;
                elapsed.max(0) as u32 / months
            }
        }
    }
}

fn out_of_range(date: NaiveDate) -> AppError {
    AppError::Validation(format!("renewal date out of range for start date {}", date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_future_start_is_used_as_is() {
        let next = RenewalScheduler::compute_initial_next_payment(
            date("2024-01-15"),
            BillingCycle::Monthly,
            date("2024-01-10"),
        )
        .unwrap();
        assert_eq!(next, date("2024-01-15"));
    }

    #[test]
    fn test_monthly_advances_past_reference() {
        let next = RenewalScheduler::compute_initial_next_payment(
            date("2024-01-15"),
            BillingCycle::Monthly,
            date("2024-03-20"),
        )
        .unwrap();
        assert_eq!(next, date("2024-04-15"));
    }

    #[test]
    fn test_start_today_moves_one_cycle() {
        let today = date("2024-05-01");
        let next = RenewalScheduler::compute_initial_next_payment(today, BillingCycle::Weekly, today)
            .unwrap();
        assert_eq!(next, date("2024-05-08"));
    }

    #[test]
    fn test_occurrence_on_reference_is_skipped() {
        let next = RenewalScheduler::compute_initial_next_payment(
            date("2024-01-15"),
            BillingCycle::Monthly,
            date("2024-03-15"),
        )
        .unwrap();
        assert_eq!(next, date("2024-04-15"));
    }

    #[test]
    fn test_each_cycle_increment() {
        let start = date("2023-06-10");
        let reference = date("2023-06-10");
        let cases = [
            (BillingCycle::Weekly, "2023-06-17"),
            (BillingCycle::Biweekly, "2023-06-24"),
            (BillingCycle::Monthly, "2023-07-10"),
            (BillingCycle::Quarterly, "2023-09-10"),
            (BillingCycle::Yearly, "2024-06-10"),
            (BillingCycle::Custom, "2023-07-10"),
        ];
        for (cycle, expected) in cases {
            let next = RenewalScheduler::compute_initial_next_payment(start, cycle, reference).unwrap();
            assert_eq!(next, date(expected), "cycle {}", cycle);
        }
    }

    #[test]
    fn test_month_end_clamps_without_drift() {
        let start = date("2024-01-31");
        assert_eq!(RenewalScheduler::occurrence(start, BillingCycle::Monthly, 1).unwrap(), date("2024-02-29"));
        assert_eq!(RenewalScheduler::occurrence(start, BillingCycle::Monthly, 2).unwrap(), date("2024-03-31"));
        assert_eq!(RenewalScheduler::occurrence(start, BillingCycle::Monthly, 3).unwrap(), date("2024-04-30"));

        let next = RenewalScheduler::compute_initial_next_payment(start, BillingCycle::Monthly, date("2024-03-01"))
            .unwrap();
        assert_eq!(next, date("2024-03-31"));
    }

    #[test]
    fn test_leap_day_yearly() {
        let next = RenewalScheduler::compute_initial_next_payment(
            date("2020-02-29"),
            BillingCycle::Yearly,
            date("2021-01-01"),
        )
        .unwrap();
        assert_eq!(next, date("2021-02-28"));
    }

    #[test]
    fn test_result_always_after_reference() {
        let reference = date("2026-10-16");
        let starts = ["2001-01-31", "2019-12-31", "2024-02-29", "2026-10-16", "2026-09-30"];
        for start in starts {
            for cycle in BillingCycle::ALL {
                let next = RenewalScheduler::compute_initial_next_payment(date(start), cycle, reference).unwrap();
                assert!(next > reference, "{} {} -> {}", start, cycle, next);

                // Nothing is skipped: the previous occurrence is on or before the reference.
                let mut k = 1;
                while RenewalScheduler::occurrence(date(start), cycle, k).unwrap() < next {
                    k += 1;
                }
                assert_eq!(RenewalScheduler::occurrence(date(start), cycle, k).unwrap(), next);
                if k > 1 {
                    assert!(RenewalScheduler::occurrence(date(start), cycle, k - 1).unwrap() <= reference);
                }
            }
        }
    }

    #[test]
    fn test_roll_forward() {
        let start = date("2024-01-15");
        // Still current.
        assert_eq!(
            RenewalScheduler::roll_forward(start, BillingCycle::Monthly, date("2024-02-15"), date("2024-02-15")).unwrap(),
            None
        );
        // Stale by two months; an occurrence that falls on the reference is kept.
        assert_eq!(
            RenewalScheduler::roll_forward(start, BillingCycle::Monthly, date("2024-02-15"), date("2024-04-15")).unwrap(),
            Some(date("2024-04-15"))
        );
        assert_eq!(
            RenewalScheduler::roll_forward(start, BillingCycle::Weekly, date("2024-01-22"), date("2024-02-01")).unwrap(),
            Some(date("2024-02-05"))
        );
    }

    #[test]
    fn test_out_of_range_is_an_error() {
        let result = RenewalScheduler::compute_initial_next_payment(NaiveDate::MAX, BillingCycle::Yearly, NaiveDate::MAX);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
