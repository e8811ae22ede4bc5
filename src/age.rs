//! Age at pension start from dates of birth

use chrono::{Datelike, Months, NaiveDate};

use crate::error::{ValuationError, ValuationResult};

/// Whole months from `birth` to `reference` plus the remaining days
///
/// Month steps clip to the end of shorter months, so Jan 31 + 1 month is the
/// last day of February.
fn calendar_difference(birth: NaiveDate, reference: NaiveDate) -> (u32, i64) {
    let span = (reference.year() - birth.year()) * 12 + reference.month() as i32 - birth.month() as i32;
    let mut months = span.max(0) as u32;

    loop {
        match birth.checked_add_months(Months::new(months)) {
            Some(anchor) if anchor <= reference => {
                return (months, (reference - anchor).num_days());
            }
            _ if months > 0 => months -= 1,
            _ => return (0, (reference - birth).num_days()),
        }
    }
}

/// Fractional age: years + months / 12 + days / 365.25
pub fn fractional_age(birth: NaiveDate, reference: NaiveDate) -> ValuationResult<f64> {
    if reference < birth {
        return Err(ValuationError::InvalidDates { birth, reference });
    }
    let (months, days) = calendar_difference(birth, reference);
    let years = months / 12;
    let months = months % 12;
    Ok(years as f64 + months as f64 / 12.0 + days as f64 / 365.25)
}

/// Completed years of age at `reference`, the age used for table lookups
pub fn completed_age(birth: NaiveDate, reference: NaiveDate) -> ValuationResult<u32> {
    Ok(fractional_age(birth, reference)?.trunc() as u32)
}
