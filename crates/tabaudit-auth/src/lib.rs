//! # tabaudit-auth
//!
//! Authentication and authorization for TabAudit.
//!
//! Identity issuance happens elsewhere; this crate only verifies the
//! signed bearer token an authenticated principal presents and decides
//! which ledger operations its role may perform.
//!
//! ## Modules
//!
//! - `jwt`: claims, token verification, and development token minting
//! - `rbac`: role-to-permission policies and enforcement

pub mod jwt;
pub mod rbac;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use rbac::{RbacEnforcer, RbacPolicies, SystemPermission};
