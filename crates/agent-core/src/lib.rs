//! Core abstractions for the investment analyst
//!
//! This crate defines the narrow contract every reasoning stage is called
//! through: a single [`ReasoningCapability`] parameterized by a
//! [`RoleConfig`], plus the shared error type.

pub mod capability;
pub mod error;
pub mod role;

pub use capability::ReasoningCapability;
pub use error::{Error, Result};
pub use role::RoleConfig;
