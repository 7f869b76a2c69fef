//! One-time code generation and consumption.

pub mod generator;
pub mod issuer;

pub use generator::generate_code;
pub use issuer::OtpIssuer;
