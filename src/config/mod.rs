// src/config/mod.rs

//! Settings for a `treerun` invocation.
//!
//! Values come from built-in defaults, an optional `Treerun.toml`, and CLI
//! overrides, in increasing order of priority.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{DEFAULT_CONFIG_FILE, load_settings};
pub use model::{RawSettings, RunnerSettings, Settings};
