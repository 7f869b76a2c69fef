//! Principal resolution and user administration.

pub mod service;

pub use service::UserService;
