//! Admin inventory operations.

pub mod service;

pub use service::{InventoryService, IssuedOtp, ProvisionDevice, StockUpdate};
