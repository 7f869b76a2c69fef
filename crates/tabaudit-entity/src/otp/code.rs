//! Validity rules shared by every kind of one-time code.

use chrono::{DateTime, Utc};

use tabaudit_core::error::OtpRejection;

/// A single-use code with an expiry.
pub trait OneTimeCode {
    /// The instant after which the code is dead.
    fn expires_at(&self) -> DateTime<Utc>;

    /// Whether the code has been consumed.
    fn is_consumed(&self) -> bool;

    /// Check whether the code may be consumed at `now`.
    ///
    /// Expiry is checked first: an expired code reports `Expired` even
    /// when it was also consumed.
    fn check(&self, now: DateTime<Utc>) -> Result<(), OtpRejection> {
        if now >= self.expires_at() {
            return Err(OtpRejection::Expired);
        }
        if self.is_consumed() {
            return Err(OtpRejection::AlreadyUsed);
        }
        Ok(())
    }
}

/// Whether `code` consists of exactly `length` ASCII digits.
pub fn is_well_formed(code: &str, length: u32) -> bool {
    code.len() == length as usize && code.bytes().all(|b| b.is_ascii_digit())
}
