//! User (principal) domain entities.

pub mod model;
pub mod role;
pub mod status;

pub use model::{CreateUser, User};
pub use role::UserRole;
pub use status::UserStatus;
