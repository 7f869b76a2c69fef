//! Physical device entities and their lifecycle.

pub mod condition;
pub mod model;
pub mod status;

pub use condition::{DEFAULT_CONDITION, ReturnCondition};
pub use model::{CreateDevice, TabletDevice};
pub use status::DeviceStatus;
