//! Input helpers.
//!
//! - TOML configuration file (`config`)

pub mod config;

pub use config::*;
