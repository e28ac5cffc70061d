use chrono::{Months, NaiveDate};
use thiserror::Error;

use crate::models::BillingCycle;

/// Flat discount on the annual billing cycle, in percent.
pub const YEARLY_DISCOUNT_PERCENT: i64 = 10;

#[derive(Error, Debug)]
pub enum TermsError {
    #[error("Date arithmetic out of range for {0} plus {1} months")]
    OutOfRange(NaiveDate, u32),
}

/// Contract end date: start date plus the minimum term in calendar months.
///
/// Month arithmetic clamps to the last day of the target month, so
/// 2025-01-31 plus one month is 2025-02-28, never a rollover into March.
pub fn end_date(start: NaiveDate, minimum_term_months: u32) -> Result<NaiveDate, TermsError> {
    start
        .checked_add_months(Months::new(minimum_term_months))
        .ok_or(TermsError::OutOfRange(start, minimum_term_months))
}

/// Latest date a cancellation must arrive: end date minus the notice period.
pub fn cancellation_deadline(
    end: NaiveDate,
    notice_period_months: u32,
) -> Result<NaiveDate, TermsError> {
    end.checked_sub_months(Months::new(notice_period_months))
        .ok_or(TermsError::OutOfRange(end, notice_period_months))
}

/// Amount collected per billing cycle, in cents, from the monthly price.
///
/// Yearly billing carries a flat 10% discount; the result is rounded
/// half-up to whole cents.
pub fn amount_per_cycle_cents(monthly_price_cents: i64, cycle: BillingCycle) -> i64 {
    match cycle {
        BillingCycle::Monthly => monthly_price_cents,
        BillingCycle::Quarterly => monthly_price_cents * 3,
        BillingCycle::Yearly => {
            let yearly = monthly_price_cents * 12;
            round_half_up(yearly * (100 - YEARLY_DISCOUNT_PERCENT), 100)
        }
    }
}

/// Formats a cent amount as a major-unit string with two decimals, for
/// display only. Amounts are stored in cents everywhere.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!("{}{}.{:02}", sign, cents / 100, cents % 100)
}

fn round_half_up(numerator: i64, denominator: i64) -> i64 {
    (numerator + denominator / 2) / denominator
}
