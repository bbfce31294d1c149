//! The order/response lifecycle contract.
//!
//! Everything in here is pure: status enums with their wire codes and
//! transition rules, the contact visibility predicate, and the action
//! eligibility table that screens consume. No I/O, no actors.

pub mod eligibility;
pub mod error;
pub mod order_status;
pub mod response_status;
pub mod visibility;

pub use eligibility::*;
pub use error::*;
pub use order_status::*;
pub use response_status::*;
pub use visibility::*;
