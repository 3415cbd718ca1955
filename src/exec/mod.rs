// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the task runner in each
//! task directory, using `tokio::process::Command`, and forwarding its
//! output to the console.
//!
//! - [`backend`] provides the `ProcessBackend` trait and the
//!   `RealProcessBackend` used in production; tests replace it with a
//!   scripted fake.
//! - [`child`] runs a single runner process to completion or cancellation.
//! - [`registry`] keeps the cancel handles of every live child.

pub mod backend;
pub mod child;
pub mod registry;

pub use backend::{ChildSpec, ChildStatus, ProcessBackend, RealProcessBackend};
pub use registry::ChildRegistry;
