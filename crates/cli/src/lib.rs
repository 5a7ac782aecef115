//! Cache node binary support.
//!
//! Provides:
//! - Command-line configuration
//! - Logging bootstrap
//! - The demo source of truth
//! - The user-facing API server
//! - Node startup wiring

pub mod api;
pub mod config;
pub mod demo;
pub mod logging;
pub mod node;

pub use config::CliConfig;
