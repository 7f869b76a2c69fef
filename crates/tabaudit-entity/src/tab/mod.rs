//! Tab type (lendable category) entities.

pub mod model;

pub use model::{CreateTabType, DEFAULT_LOW_STOCK_THRESHOLD, TabType};
