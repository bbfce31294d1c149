//! Order and response lifecycle for a services marketplace.
//!
//! The [`lifecycle`] module holds the pure contract (statuses, transitions,
//! contact visibility, action eligibility). Everything else wires it to an
//! in-process backend built on resource actors and to typed clients that
//! gate every action against that contract.

pub mod actor_framework;
pub mod app_system;
pub mod clients;
pub mod domain;
pub mod lifecycle;
pub mod order_actor;
pub mod scope;
pub mod session;
pub mod user_actor;
pub mod view;

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
mod mock_framework;
