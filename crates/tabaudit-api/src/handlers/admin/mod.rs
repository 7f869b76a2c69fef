//! Admin-only handlers.

pub mod audit;
pub mod devices;
pub mod inventory;
pub mod reports;
