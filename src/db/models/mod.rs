//! Database models split into domain-specific modules.

pub mod class;
pub mod user;

pub use class::*;
pub use user::*;
