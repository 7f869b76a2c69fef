//! Repository implementations for all TabAudit entities.

pub mod assignment;
pub mod audit;
pub mod device;
pub mod otp;
pub mod tab;
pub mod usage;
pub mod user;

pub use assignment::AssignmentRepository;
pub use audit::AuditLogRepository;
pub use device::DeviceRepository;
pub use otp::OtpRepository;
pub use tab::TabRepository;
pub use usage::{ClientInfo, UsageRepository};
pub use user::UserRepository;
