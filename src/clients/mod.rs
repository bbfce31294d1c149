//! Typed clients over the resource actors.

#[macro_use]
mod macros;

pub mod order_client;
pub mod user_client;

pub use order_client::OrderClient;
pub use user_client::UserClient;
