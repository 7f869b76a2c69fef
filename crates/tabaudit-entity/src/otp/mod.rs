//! One-time code entities.

pub mod code;
pub mod model;

pub use code::{OneTimeCode, is_well_formed};
pub use model::{AssignmentOtp, PendingReturn, ReturnVerification};
pub use tabaudit_core::error::OtpRejection;
