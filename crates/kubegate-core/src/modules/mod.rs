//! Process-level helpers: configuration file loading and logging setup.

pub mod config;
pub mod logger;
