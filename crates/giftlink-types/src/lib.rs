//! Giftlink Types - Shared domain types
//!
//! This crate contains domain types used across Giftlink services:
//! - User and session identity
//! - Entitlement tiers and grant kinds
//! - Gift-link template selection

pub mod entitlement;
pub mod session;
pub mod template;
pub mod tier;
pub mod user;

pub use entitlement::*;
pub use session::*;
pub use template::*;
pub use tier::*;
pub use user::*;
