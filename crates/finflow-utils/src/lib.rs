//! Shared utilities for FinFlow
//!
//! This crate provides common functionality used across the FinFlow workspace:
//! tracing setup and helpers for reading configuration from the environment.

pub mod config;
pub mod logging;

pub use config::{ConfigError, env_parse, env_var};
pub use logging::{LogFormat, init_tracing};
