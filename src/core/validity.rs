use crate::domain::model::PassStatus;
use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// A pass is valid strictly before its expiry instant.
pub fn is_valid(valid_till: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    valid_till.is_some_and(|till| till > now)
}

/// Whole days left, rounded up. Zero when there is no pass; non-positive
/// once the pass has lapsed.
pub fn days_remaining(valid_till: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    let Some(till) = valid_till else {
        return 0;
    };
    let millis = (till - now).num_milliseconds();
    // Integer division truncates toward zero, which is already the ceiling
    // for negative spans.
    let days = millis / MILLIS_PER_DAY;
    if millis % MILLIS_PER_DAY > 0 {
        days + 1
    } else {
        days
    }
}

pub fn pass_status(valid_till: Option<DateTime<Utc>>, now: DateTime<Utc>) -> PassStatus {
    match valid_till {
        None => PassStatus::Inactive,
        Some(_) if is_valid(valid_till, now) => PassStatus::Active,
        Some(_) => PassStatus::Expired,
    }
}
