//! User-specific domain logic: profiles and their contact bundles.

pub mod entity;
pub mod error;

pub use error::*;
