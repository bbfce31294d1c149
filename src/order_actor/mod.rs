//! Order-specific domain logic: the backend side of the lifecycle, where
//! every transition is re-validated regardless of what the client offered.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
