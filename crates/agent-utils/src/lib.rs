//! Shared utilities for the investment analyst workspace
//!
//! This crate provides the ambient pieces every other crate leans on:
//! tracing setup and environment-driven configuration helpers.

pub mod config;
pub mod logging;

pub use config::{ConfigError, env_parse, env_var, load_dotenv};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
