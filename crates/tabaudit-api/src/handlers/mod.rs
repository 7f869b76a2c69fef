//! Route handlers organized by domain.

pub mod admin;
pub mod check_in;
pub mod device;
pub mod health;
pub mod user;
