//! Admission rules evaluated under the tab row lock.

use tabaudit_core::error::RuleViolation;

/// Decide whether `quantity` more units may be logged.
///
/// `taken_today` is the sum of the user's positive entries for the tab
/// since the start of the local day.
pub fn check_log(
    stock_remaining: i32,
    taken_today: i64,
    daily_limit: i32,
    quantity: i32,
) -> Result<(), RuleViolation> {
    if stock_remaining < quantity {
        return Err(RuleViolation::InsufficientStock);
    }
    if taken_today + i64::from(quantity) > i64::from(daily_limit) {
        return Err(RuleViolation::DailyLimitExceeded { limit: daily_limit });
    }
    Ok(())
}

/// Decide whether `quantity` units may be handed back against `balance`.
pub fn check_return(balance: i64, quantity: i32) -> Result<(), RuleViolation> {
    if balance < i64::from(quantity) {
        return Err(RuleViolation::NothingToReturn);
    }
    Ok(())
}

/// Decide whether one more device handover fits the daily limit.
pub fn check_assignment_quota(issued_today: i64, daily_limit: i32) -> Result<(), RuleViolation> {
    if issued_today >= i64::from(daily_limit) {
        return Err(RuleViolation::DailyLimitExceeded { limit: daily_limit });
    }
    Ok(())
}
